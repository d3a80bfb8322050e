//! List page: rows, a cascade filter bar, and permission-gated actions.

use std::sync::Arc;

use propdesk_cascade::{Chain, HierarchyIndex, Level, NodeId, SelectOutcome, SelectionState, SelectionView};
use propdesk_client::CrudApi;
use propdesk_core::{Capability, ListParams, PermissionCheck, ServiceError, merge_patch};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::feature::{ActionSet, Feature};

/// Serializable list snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub rows: Vec<Value>,
    pub total: usize,
    pub filter: SelectionView,
    pub actions: ActionSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ListPage<F: Feature> {
    rows: Vec<Value>,
    total: usize,
    filter: SelectionState<F::Tier>,
    actions: ActionSet,
    error: Option<String>,
}

impl<F: Feature> ListPage<F> {
    /// Empty page. Needs the View capability.
    pub fn new(index: Arc<HierarchyIndex<F::Tier>>, perms: &dyn PermissionCheck) -> Result<Self, ServiceError> {
        perms.require(&F::permission(Capability::View))?;
        Ok(Self {
            rows: Vec::new(),
            total: 0,
            filter: SelectionState::new(index),
            actions: ActionSet::for_feature::<F>(perms),
            error: None,
        })
    }

    /// Replace the rows with one page from the server. On failure the old
    /// rows stay and the error is kept for display.
    pub async fn load(&mut self, api: &dyn CrudApi, params: &ListParams) -> Result<(), ServiceError> {
        match api.list(F::RESOURCE, params).await {
            Ok(page) => {
                info!(resource = %F::RESOURCE, rows = page.items.len(), total = page.total, "list: loaded");
                self.total = page.total.max(page.items.len());
                self.rows = page.items;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(resource = %F::RESOURCE, error = %e, "list: load failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn actions(&self) -> ActionSet {
        self.actions
    }

    pub fn filter(&self) -> &SelectionState<F::Tier> {
        &self.filter
    }

    pub fn select_filter(&mut self, level: F::Tier, id: Option<NodeId>) -> SelectOutcome {
        self.filter.select(level, id)
    }

    pub fn clear_filter(&mut self) {
        self.filter.reset();
    }

    /// Rows under every selected filter tier.
    pub fn filtered(&self) -> Vec<&Value> {
        let wanted = self.filter.chain();
        if wanted.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|row| {
                let chain = self.row_chain(row);
                wanted.iter().all(|(level, id)| chain.get(level) == Some(id))
            })
            .collect()
    }

    /// A row's tier ids: the ones it carries, plus the ancestors of its
    /// deepest one looked up in the hierarchy.
    fn row_chain(&self, row: &Value) -> Chain<F::Tier> {
        let mut chain: Chain<F::Tier> = F::Tier::ALL
            .iter()
            .filter_map(|&l| row.get(l.payload_key()).and_then(NodeId::from_json).map(|id| (l, id)))
            .collect();
        let deepest = chain.iter().next_back().map(|(l, id)| (*l, id.clone()));
        if let Some((level, id)) = deepest {
            for (l, ancestor) in self.filter.index().find_ancestor_chain(level, &id) {
                chain.entry(l).or_insert(ancestor);
            }
        }
        chain
    }

    /// Delete a record. Needs the Delete capability; the row goes away
    /// only once the server confirms.
    pub async fn delete(&mut self, api: &dyn CrudApi, id: &str) -> Result<(), ServiceError> {
        if !self.actions.delete {
            return Err(ServiceError::PermissionDenied(format!(
                "missing permission {}",
                F::permission(Capability::Delete)
            )));
        }
        api.delete(F::RESOURCE, id).await.inspect_err(|e| {
            warn!(resource = %F::RESOURCE, id, error = %e, "list: delete failed");
        })?;
        let before = self.rows.len();
        self.rows.retain(|r| !row_has_id(r, id));
        if self.rows.len() < before {
            self.total = self.total.saturating_sub(1);
        }
        info!(resource = %F::RESOURCE, id, "list: deleted");
        Ok(())
    }

    /// Put a saved record into the list: patch the row with the same id,
    /// or insert it at the top.
    pub fn apply_saved(&mut self, record: Value) {
        let id = record.get("id").and_then(NodeId::from_json);
        let existing = id
            .as_ref()
            .and_then(|id| self.rows.iter_mut().find(|r| r.get("id").and_then(NodeId::from_json).as_ref() == Some(id)));
        match existing {
            Some(row) => {
                merge_patch(row, &record);
                debug!(resource = %F::RESOURCE, "list: row updated");
            }
            None => {
                self.rows.insert(0, record);
                self.total += 1;
                debug!(resource = %F::RESOURCE, "list: row inserted");
            }
        }
    }

    pub fn view(&self) -> ListView {
        ListView {
            rows: self.filtered().into_iter().cloned().collect(),
            total: self.total,
            filter: self.filter.view(),
            actions: self.actions,
            error: self.error.clone(),
        }
    }
}

fn row_has_id(row: &Value, id: &str) -> bool {
    row.get("id").and_then(NodeId::from_json) == Some(NodeId::parse(id))
}
