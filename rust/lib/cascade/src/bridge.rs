//! Selection → request payload.

use propdesk_core::normalize_date_only;
use serde_json::{Map, Value};
use tracing::debug;

use crate::level::Level;
use crate::selection::SelectionState;

/// Maps a committed selection plus the other form fields into the flat
/// object the remote create/update call expects.
///
/// Only the leaf tier id goes on the wire by default. Intermediate tiers
/// are UI-only unless the endpoint asks for them through
/// [`passthrough`](Self::passthrough), or the caller lists them in the
/// other fields.
#[derive(Debug, Clone)]
pub struct FormBridge<L: Level> {
    leaf: L,
    passthrough: Vec<L>,
    date_fields: Vec<&'static str>,
}

impl<L: Level> FormBridge<L> {
    pub fn new(leaf: L) -> Self {
        Self {
            leaf,
            passthrough: Vec::new(),
            date_fields: Vec::new(),
        }
    }

    /// Also send this tier's id.
    pub fn passthrough(mut self, level: L) -> Self {
        if level != self.leaf && !self.passthrough.contains(&level) {
            self.passthrough.push(level);
        }
        self
    }

    /// Normalize these fields to `YYYY-MM-DD`.
    pub fn date_fields(mut self, fields: &[&'static str]) -> Self {
        self.date_fields.extend_from_slice(fields);
        self
    }

    pub fn leaf(&self) -> L {
        self.leaf
    }

    /// Build the payload. A selected tier id overwrites a same-named key
    /// in `other_fields`; an unselected leaf adds no key.
    pub fn to_payload(&self, state: &SelectionState<L>, other_fields: Map<String, Value>) -> Map<String, Value> {
        let mut payload = other_fields;

        for field in &self.date_fields {
            if let Some(Value::String(raw)) = payload.get(*field) {
                let normalized = if raw.trim().is_empty() {
                    Value::Null
                } else {
                    match normalize_date_only(raw) {
                        Some(date) => Value::String(date),
                        None => continue,
                    }
                };
                payload.insert((*field).to_string(), normalized);
            }
        }

        for &level in L::ALL {
            if level != self.leaf && !self.passthrough.contains(&level) {
                continue;
            }
            if let Some(id) = state.selected(level) {
                if payload.insert(level.payload_key().to_string(), id.to_json()).is_some() {
                    debug!(field = level.payload_key(), "payload: selection overrides form field");
                }
            }
        }
        payload
    }
}
