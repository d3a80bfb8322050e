//! Submit-time completeness check.
//!
//! Pure: focusing or scrolling to `first_invalid` is the caller's job.

use std::collections::BTreeMap;

use propdesk_core::FieldErrors;
use serde::Serialize;

use crate::level::Level;
use crate::selection::SelectionState;

/// Per-tier error messages plus the tier that should receive focus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult<L: Level> {
    pub errors: BTreeMap<L, String>,
    pub first_invalid: Option<L>,
}

impl<L: Level> Default for ValidationResult<L> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
            first_invalid: None,
        }
    }
}

impl<L: Level> ValidationResult<L> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold server field errors into the tier errors.
    ///
    /// Fields named after a tier payload key (`unit_id`) or tier key
    /// (`unit`) land on that tier, replacing any local message. The rest
    /// are returned for the caller to show next to their own fields.
    pub fn merge_remote(&mut self, fields: &FieldErrors) -> FieldErrors {
        let mut rest = FieldErrors::new();
        for (field, message) in fields {
            match L::from_key(field) {
                Some(level) => {
                    self.errors.insert(level, message.clone());
                }
                None => {
                    rest.insert(field.clone(), message.clone());
                }
            }
        }
        self.first_invalid = self.errors.keys().next().copied();
        rest
    }

    /// Errors keyed by payload key, for merging with form field errors.
    pub fn to_field_errors(&self) -> FieldErrors {
        self.errors
            .iter()
            .map(|(l, m)| (l.payload_key().to_string(), m.clone()))
            .collect()
    }
}

/// Check that every required tier has a selection.
///
/// Tiers are checked in tier order whatever order `required` lists them
/// in. Every missing tier gets a message; the shallowest one becomes
/// `first_invalid`.
pub fn validate<L: Level>(state: &SelectionState<L>, required: &[L]) -> ValidationResult<L> {
    let mut result = ValidationResult::default();
    for &level in L::ALL {
        if !required.contains(&level) || state.selected(level).is_some() {
            continue;
        }
        result
            .errors
            .insert(level, format!("Please select a {}", level.label()));
        if result.first_invalid.is_none() {
            result.first_invalid = Some(level);
        }
    }
    result
}
