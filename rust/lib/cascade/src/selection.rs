//! Cascading selection state.
//!
//! Invariant: if tier `i` has a selection then either `i == 0` or tier
//! `i - 1` has one too, and the selected node's parent is that selection.
//! Any change at tier `i` clears every deeper tier, even when the old
//! descendant would still be valid under the new parent.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::id::NodeId;
use crate::index::{Chain, HierarchyIndex};
use crate::level::Level;
use crate::node::Node;

/// Result of a [`SelectionState::select`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The tier changed and every deeper tier was reset.
    Changed,
    /// Same value as before; nothing was touched.
    Unchanged,
    /// The id is not among the tier's current options; nothing was touched.
    Rejected,
}

/// Selected id and available options per tier, owned by one open drawer
/// or filter bar.
#[derive(Debug, Clone)]
pub struct SelectionState<L: Level> {
    index: Arc<HierarchyIndex<L>>,
    selected: Vec<Option<NodeId>>,
    options: Vec<Vec<Node>>,
}

impl<L: Level> SelectionState<L> {
    /// Empty selection; only the root tier has options.
    pub fn new(index: Arc<HierarchyIndex<L>>) -> Self {
        let tiers = L::ALL.len();
        let mut options = vec![Vec::new(); tiers];
        options[0] = index.roots().to_vec();
        Self {
            index,
            selected: vec![None; tiers],
            options,
        }
    }

    /// Selection seeded from an ancestor chain, e.g. one returned by
    /// [`HierarchyIndex::find_ancestor_chain`].
    pub fn from_chain(index: Arc<HierarchyIndex<L>>, chain: &Chain<L>) -> Self {
        let mut state = Self::new(index);
        state.apply_chain(chain);
        state
    }

    pub fn index(&self) -> &Arc<HierarchyIndex<L>> {
        &self.index
    }

    /// Set (or clear, with `None`) the selection at `level`.
    pub fn select(&mut self, level: L, id: Option<NodeId>) -> SelectOutcome {
        let i = level.index();
        match id {
            Some(id) => {
                if self.selected[i].as_ref() == Some(&id) {
                    return SelectOutcome::Unchanged;
                }
                if !self.options[i].iter().any(|n| n.id == id) {
                    debug!(tier = level.key(), id = %id, "selection: rejected id outside current options");
                    return SelectOutcome::Rejected;
                }
                self.clear_below(i);
                if let Some(child) = level.child() {
                    self.options[child.index()] = self.index.children_of(level, &id).to_vec();
                }
                self.selected[i] = Some(id);
                SelectOutcome::Changed
            }
            None => {
                if self.selected[i].is_none() {
                    return SelectOutcome::Unchanged;
                }
                self.selected[i] = None;
                self.clear_below(i);
                SelectOutcome::Changed
            }
        }
    }

    /// Builder-style [`select`](Self::select).
    pub fn selecting(mut self, level: L, id: impl Into<Option<NodeId>>) -> Self {
        self.select(level, id.into());
        self
    }

    /// Clear selections and options strictly below tier index `i`.
    fn clear_below(&mut self, i: usize) {
        for j in (i + 1)..self.selected.len() {
            self.selected[j] = None;
            self.options[j].clear();
        }
    }

    /// Select a chain tier by tier from the root. Stops at the first tier
    /// that is missing from the chain or rejected. Returns how many tiers
    /// ended up selected.
    pub fn apply_chain(&mut self, chain: &Chain<L>) -> usize {
        self.reset();
        let mut applied = 0;
        for &level in L::ALL {
            let Some(id) = chain.get(&level) else { break };
            if self.select(level, Some(id.clone())) == SelectOutcome::Rejected {
                break;
            }
            applied += 1;
        }
        applied
    }

    /// Clear every tier.
    pub fn reset(&mut self) {
        self.select(L::root(), None);
    }

    pub fn selected(&self, level: L) -> Option<&NodeId> {
        self.selected[level.index()].as_ref()
    }

    /// The selected node itself, with its label.
    pub fn selected_node(&self, level: L) -> Option<&Node> {
        let id = self.selected(level)?;
        self.options[level.index()].iter().find(|n| &n.id == id)
    }

    /// Options currently available at `level`.
    pub fn options(&self, level: L) -> &[Node] {
        &self.options[level.index()]
    }

    /// Selected ids as a chain, root first.
    pub fn chain(&self) -> Chain<L> {
        L::ALL
            .iter()
            .filter_map(|&l| self.selected(l).map(|id| (l, id.clone())))
            .collect()
    }

    /// Deepest tier with a selection.
    pub fn leaf(&self) -> Option<(L, &NodeId)> {
        L::ALL
            .iter()
            .rev()
            .find_map(|&l| self.selected(l).map(|id| (l, id)))
    }

    /// True iff every required tier has a selection.
    pub fn is_complete(&self, required: &[L]) -> bool {
        required.iter().all(|&l| self.selected(l).is_some())
    }

    /// Serializable snapshot for the rendering host.
    pub fn view(&self) -> SelectionView {
        SelectionView {
            tiers: L::ALL
                .iter()
                .map(|&l| TierView {
                    key: l.key(),
                    label: l.label(),
                    selected: self.selected(l).cloned(),
                    options: self.options(l).to_vec(),
                })
                .collect(),
        }
    }
}

/// One tier of a [`SelectionView`].
#[derive(Debug, Clone, Serialize)]
pub struct TierView {
    pub key: &'static str,
    pub label: &'static str,
    pub selected: Option<NodeId>,
    pub options: Vec<Node>,
}

/// Snapshot of a selection, tiers root first.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub tiers: Vec<TierView>,
}
