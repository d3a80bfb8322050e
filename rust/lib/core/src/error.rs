use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. The remote API sends these in
// `{"code": "...", "message": "..."}` bodies and the drawers match on
// them, never on the message string.

/// Stable error code constants.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const NETWORK: &str = "NETWORK";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Field-keyed error messages, keyed by payload field name (`tenant_id`,
/// `offer_date`, ...). Ordered so views render them deterministically.
pub type FieldErrors = BTreeMap<String, String>;

/// Error body returned by the remote CRUD API.
///
/// ```json
/// {"code": "VALIDATION_FAILED", "message": "invalid offer", "fields": {"tenant_id": "required"}}
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default, alias = "error")]
    pub message: String,
    #[serde(default, alias = "errors", skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: FieldErrors,
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified error type for everything that talks to the remote API.
///
/// Structural lookup misses in the hierarchy are NOT errors; they resolve
/// to empty results locally. Only permission gating and remote calls
/// produce a `ServiceError`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Record does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate record. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Server-side rejection of the submitted fields. HTTP 400/422.
    #[error("{message}")]
    Validation { message: String, fields: FieldErrors },

    /// Missing or expired credentials. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed. HTTP 403, or a local capability check.
    #[error("{0}")]
    PermissionDenied(String),

    /// The request never produced a response.
    #[error("{0}")]
    Network(String),

    /// Unexpected server or decode failure. HTTP 5xx.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Validation error without per-field detail.
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Validation { .. } => error_code::VALIDATION_FAILED,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::PermissionDenied(_) => error_code::PERMISSION_DENIED,
            ServiceError::Network(_) => error_code::NETWORK,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// Field errors carried by a validation rejection; empty otherwise.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ServiceError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Map a non-success HTTP response onto a `ServiceError`.
    ///
    /// The body's `code` wins when it is one of the stable codes; the
    /// status code decides otherwise.
    pub fn from_status(status: u16, body: ErrorBody) -> Self {
        let message = if body.message.is_empty() {
            format!("HTTP {}", status)
        } else {
            body.message
        };
        match body.code.as_str() {
            error_code::NOT_FOUND => return ServiceError::NotFound(message),
            error_code::ALREADY_EXISTS => return ServiceError::Conflict(message),
            error_code::VALIDATION_FAILED => {
                return ServiceError::Validation {
                    message,
                    fields: body.fields,
                };
            }
            error_code::UNAUTHENTICATED => return ServiceError::Unauthorized(message),
            error_code::PERMISSION_DENIED => return ServiceError::PermissionDenied(message),
            _ => {}
        }
        match status {
            400 | 422 => ServiceError::Validation {
                message,
                fields: body.fields,
            },
            401 => ServiceError::Unauthorized(message),
            403 => ServiceError::PermissionDenied(message),
            404 => ServiceError::NotFound(message),
            409 => ServiceError::Conflict(message),
            _ => ServiceError::Internal(message),
        }
    }
}
