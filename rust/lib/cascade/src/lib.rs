//! Cascading selection engine.
//!
//! Drives the dependent dropdowns of the back-office drawers
//! (city → property → unit → tenant/vendor). Four pieces, leaves first:
//!
//! - [`HierarchyIndex`]: read-only lookup built once per drawer from the
//!   server's nested tree or per-parent maps.
//! - [`SelectionState`]: one selected id per tier plus the available
//!   options; changing a tier resets every deeper tier.
//! - [`validate`]: required-tier check that also reports which field
//!   should receive focus.
//! - [`FormBridge`]: maps the final selection and the other form fields
//!   into the flat payload the remote create/update call expects.
//!
//! ```ignore
//! use propdesk_cascade::{HierarchyIndex, SelectionState, TenantTier};
//!
//! let index = Arc::new(HierarchyIndex::<TenantTier>::from_json(&body));
//! let mut state = SelectionState::new(index);
//! state.select(TenantTier::City, Some(1.into()));
//! state.options(TenantTier::Property); // children of city 1
//! ```

pub mod bridge;
pub mod id;
pub mod index;
pub mod level;
pub mod node;
pub mod selection;
pub mod validation;

#[doc(hidden)]
pub use serde;

pub use bridge::FormBridge;
pub use id::NodeId;
pub use index::{Chain, HierarchyIndex};
pub use level::{Level, TenantTier, VendorTier};
pub use node::{Node, ParentMaps, TreeNode};
pub use selection::{SelectOutcome, SelectionState, SelectionView, TierView};
pub use validation::{ValidationResult, validate};
