//! Page state handlers: the create/edit drawer and the list page.

pub mod drawer;
pub mod list;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use propdesk_cascade::HierarchyIndex;
use propdesk_client::CrudApi;
use tracing::{info, warn};

use crate::feature::Feature;

/// Fetch and index the hierarchy a feature cascades over.
///
/// A failed fetch is logged and yields an empty index: the page still
/// opens, with nothing to pick.
pub async fn load_index<F: Feature>(api: &dyn CrudApi) -> Arc<HierarchyIndex<F::Tier>> {
    match api.hierarchy(F::HIERARCHY).await {
        Ok(body) => {
            let index = HierarchyIndex::from_value(body);
            info!(hierarchy = F::HIERARCHY, nodes = index.len(), "hierarchy loaded");
            Arc::new(index)
        }
        Err(e) => {
            warn!(hierarchy = F::HIERARCHY, error = %e, "hierarchy fetch failed, using empty index");
            Arc::new(HierarchyIndex::empty())
        }
    }
}
