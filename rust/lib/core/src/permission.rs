//! Capability lookup for back-office actions.
//!
//! The drawers and list pages do NOT know where permissions come from.
//! They only know this trait; the host injects the concrete predicate
//! when it opens a page.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// An action a user may take on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    View,
    Create,
    Edit,
    Delete,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::Create => "create",
            Capability::Edit => "edit",
            Capability::Delete => "delete",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the permission string `module:resource:action`.
pub fn permission(module: &str, resource: &str, capability: Capability) -> String {
    format!("{}:{}:{}", module, resource, capability)
}

/// Pluggable permission predicate.
pub trait PermissionCheck: Send + Sync {
    /// Whether the permission string (`module:resource:action`) is granted.
    fn allows(&self, permission: &str) -> bool;

    /// Like [`allows`](Self::allows), but as a `Result` for `?` chains.
    fn require(&self, permission: &str) -> Result<(), ServiceError> {
        if self.allows(permission) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "missing permission {}",
                permission
            )))
        }
    }
}

/// Grants everything. Used for testing and single-user setups.
pub struct AllowAll;

impl PermissionCheck for AllowAll {
    fn allows(&self, _permission: &str) -> bool {
        true
    }
}

/// Denies everything. Used for testing.
pub struct DenyAll;

impl PermissionCheck for DenyAll {
    fn allows(&self, _permission: &str) -> bool {
        false
    }
}

/// A flat list of granted permission patterns.
///
/// Each pattern has the same three segments as a permission string; a
/// segment of `*` matches anything. `leasing:*:view` grants view on every
/// leasing resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySet {
    pub grants: Vec<String>,
}

impl PolicySet {
    pub fn new<I, S>(grants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            grants: grants.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(pattern: &str, permission: &str) -> bool {
        if pattern == "*" {
            return true;
        }
        let want: Vec<&str> = pattern.split(':').collect();
        let have: Vec<&str> = permission.split(':').collect();
        want.len() == have.len()
            && want.iter().zip(&have).all(|(w, h)| *w == "*" || w == h)
    }
}

impl PermissionCheck for PolicySet {
    fn allows(&self, permission: &str) -> bool {
        self.grants.iter().any(|g| Self::matches(g, permission))
    }
}
