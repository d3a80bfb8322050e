use propdesk_cascade::TenantTier;
use propdesk_client::Resource;
use propdesk_core::FieldErrors;
use serde::{Deserialize, Serialize};

use super::{require_count, require_date, require_positive};
use crate::feature::Feature;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Declined,
    Expired,
}

/// Renewal offer form. The tenant comes from the cascade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferForm {
    pub offer_date: String,
    pub expiry_date: String,
    pub proposed_rent: Option<f64>,
    pub term_months: Option<u32>,
    pub status: OfferStatus,
    pub notes: String,
}

/// Offers & Renewals.
pub struct OfferRenewals;

impl Feature for OfferRenewals {
    type Tier = TenantTier;
    type Form = OfferForm;

    const RESOURCE: Resource = Resource::Offers;
    const HIERARCHY: &'static str = "tenant";
    const REQUIRED: &'static [TenantTier] = &[
        TenantTier::City,
        TenantTier::Property,
        TenantTier::Unit,
        TenantTier::Tenant,
    ];
    const LEAF: TenantTier = TenantTier::Tenant;
    const FIELDS: &'static [&'static str] = &[
        "offer_date",
        "expiry_date",
        "proposed_rent",
        "term_months",
        "status",
        "notes",
    ];
    const DATE_FIELDS: &'static [&'static str] = &["offer_date", "expiry_date"];

    fn check_form(form: &OfferForm) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let offered = require_date(&mut errors, "offer_date", "Offer date", &form.offer_date);
        let expires = require_date(&mut errors, "expiry_date", "Expiry date", &form.expiry_date);
        // ISO dates compare correctly as strings.
        if let (Some(offered), Some(expires)) = (offered, expires) {
            if expires < offered {
                errors.insert(
                    "expiry_date".into(),
                    "Expiry date must not be before the offer date".into(),
                );
            }
        }
        require_positive(&mut errors, "proposed_rent", "Proposed rent", form.proposed_rent);
        require_count(&mut errors, "term_months", "Term", form.term_months);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> OfferForm {
        OfferForm {
            offer_date: "2024-03-01".into(),
            expiry_date: "2024-03-31".into(),
            proposed_rent: Some(1450.0),
            term_months: Some(12),
            ..OfferForm::default()
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(OfferRenewals::check_form(&valid()).is_empty());
    }

    #[test]
    fn empty_form_lists_every_required_field() {
        let errors = OfferRenewals::check_form(&OfferForm::default());
        let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["expiry_date", "offer_date", "proposed_rent", "term_months"]);
    }

    #[test]
    fn expiry_before_offer_is_rejected() {
        let form = OfferForm {
            expiry_date: "2024-02-01T12:00:00Z".into(),
            ..valid()
        };
        let errors = OfferRenewals::check_form(&form);
        assert_eq!(
            errors["expiry_date"],
            "Expiry date must not be before the offer date"
        );
    }

    #[test]
    fn form_reads_record_and_ignores_extra_keys() {
        let record = serde_json::json!({
            "id": "of-1",
            "tenant_id": 1000,
            "offer_date": "2024-03-01",
            "proposed_rent": 1500.0,
            "status": "sent",
        });
        let form: OfferForm = serde_json::from_value(record).unwrap();
        assert_eq!(form.status, OfferStatus::Sent);
        assert_eq!(form.proposed_rent, Some(1500.0));
        assert_eq!(form.term_months, None);
        assert!(form.notes.is_empty());
    }
}
