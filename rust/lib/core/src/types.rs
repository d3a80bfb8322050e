use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Parameters for list/query operations, sent as the query string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Maximum number of results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Offset for pagination.
    #[serde(default)]
    pub offset: usize,

    /// Sort field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// Search query string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

fn default_limit() -> usize {
    50
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            sort: None,
            q: None,
        }
    }
}

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: usize,
}

/// Merge a JSON patch into a base value.
///
/// For each key in `patch`:
/// - If the value is `null`, the key is removed from `base`.
/// - Otherwise, the key is set to the patch value.
///
/// This follows RFC 7386 (JSON Merge Patch) semantics.
pub fn merge_patch(base: &mut serde_json::Value, patch: &serde_json::Value) {
    if let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_obj {
            if value.is_null() {
                base_obj.remove(key);
            } else if value.is_object() {
                let entry = base_obj
                    .entry(key.clone())
                    .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
                merge_patch(entry, value);
            } else {
                base_obj.insert(key.clone(), value.clone());
            }
        }
    } else {
        *base = patch.clone();
    }
}

/// Normalize a date-ish string to a date-only `YYYY-MM-DD` string.
///
/// Accepts plain dates, RFC 3339 timestamps and naive date-times (with a
/// space or `T` separator). The calendar date is kept as written; offsets
/// are not applied. Returns `None` when nothing parses.
pub fn normalize_date_only(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date().format("%Y-%m-%d").to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_patch() {
        let mut base = serde_json::json!({"a": 1, "b": 2, "c": {"d": 3}});
        let patch = serde_json::json!({"b": null, "c": {"e": 4}, "f": 5});
        merge_patch(&mut base, &patch);
        assert_eq!(
            base,
            serde_json::json!({"a": 1, "c": {"d": 3, "e": 4}, "f": 5})
        );
    }

    #[test]
    fn list_params_defaults() {
        let p: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset, 0);
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("sort").is_none());
    }

    #[test]
    fn date_only_passthrough() {
        assert_eq!(normalize_date_only("2024-03-01").as_deref(), Some("2024-03-01"));
        assert_eq!(normalize_date_only(" 2024-03-01 ").as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn date_only_from_timestamps() {
        assert_eq!(
            normalize_date_only("2024-03-01T23:30:00-05:00").as_deref(),
            Some("2024-03-01")
        );
        assert_eq!(
            normalize_date_only("2024-03-01T00:00:00.000Z").as_deref(),
            Some("2024-03-01")
        );
        assert_eq!(
            normalize_date_only("2024-03-01 08:15:00").as_deref(),
            Some("2024-03-01")
        );
        assert_eq!(
            normalize_date_only("2024-03-01T08:15").as_deref(),
            Some("2024-03-01")
        );
    }

    #[test]
    fn date_only_rejects_garbage() {
        assert_eq!(normalize_date_only(""), None);
        assert_eq!(normalize_date_only("next tuesday"), None);
        assert_eq!(normalize_date_only("2024-02-30"), None);
    }
}
