pub mod error;
pub mod permission;
pub mod types;

pub use error::{ErrorBody, FieldErrors, ServiceError};
pub use permission::{AllowAll, Capability, DenyAll, PermissionCheck, PolicySet, permission};
pub use types::{ListParams, ListResult, merge_patch, normalize_date_only};
