use propdesk_cascade::TenantTier;
use propdesk_client::Resource;
use propdesk_core::FieldErrors;
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::feature::Feature;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    #[default]
    Vacant,
    Occupied,
    Notice,
    Maintenance,
}

/// Unit form. A unit hangs off a property, so the cascade stops there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitForm {
    pub unit_number: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub market_rent: Option<f64>,
    pub status: UnitStatus,
}

/// Units.
pub struct Units;

impl Feature for Units {
    type Tier = TenantTier;
    type Form = UnitForm;

    const RESOURCE: Resource = Resource::Units;
    const HIERARCHY: &'static str = "tenant";
    const REQUIRED: &'static [TenantTier] = &[TenantTier::City, TenantTier::Property];
    const LEAF: TenantTier = TenantTier::Property;
    const FIELDS: &'static [&'static str] =
        &["unit_number", "bedrooms", "bathrooms", "market_rent", "status"];

    fn check_form(form: &UnitForm) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "unit_number", "Unit number", &form.unit_number);
        if form.market_rent.is_some_and(|r| r < 0.0) {
            errors.insert("market_rent".into(), "Market rent cannot be negative".into());
        }
        if form.bathrooms.is_some_and(|b| b < 0.0) {
            errors.insert("bathrooms".into(), "Bathrooms cannot be negative".into());
        }
        errors
    }
}
