//! Feature definitions: one form type and one [`Feature`](crate::Feature)
//! impl per back-office page.

pub mod offer;
pub mod payment_plan;
pub mod unit;
pub mod vendor_task;

pub use offer::{OfferForm, OfferRenewals, OfferStatus};
pub use payment_plan::{Frequency, PaymentPlanForm, PaymentPlans};
pub use unit::{UnitForm, UnitStatus, Units};
pub use vendor_task::{TaskPriority, TaskStatus, VendorTaskForm, VendorTasks};

use propdesk_core::{FieldErrors, normalize_date_only};

// ── Field checks ────────────────────────────────────────────────────

pub(crate) fn require_text(errors: &mut FieldErrors, field: &str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{} is required", label));
    }
}

/// Required date; returns the normalized value when it parses.
pub(crate) fn require_date(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<String> {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{} is required", label));
        return None;
    }
    let date = normalize_date_only(value);
    if date.is_none() {
        errors.insert(field.to_string(), format!("{} is not a valid date", label));
    }
    date
}

pub(crate) fn require_positive(errors: &mut FieldErrors, field: &str, label: &str, value: Option<f64>) {
    match value {
        None => {
            errors.insert(field.to_string(), format!("{} is required", label));
        }
        Some(v) if v <= 0.0 || !v.is_finite() => {
            errors.insert(field.to_string(), format!("{} must be greater than zero", label));
        }
        Some(_) => {}
    }
}

pub(crate) fn require_count(errors: &mut FieldErrors, field: &str, label: &str, value: Option<u32>) {
    match value {
        None => {
            errors.insert(field.to_string(), format!("{} is required", label));
        }
        Some(0) => {
            errors.insert(field.to_string(), format!("{} must be at least 1", label));
        }
        Some(_) => {}
    }
}
