use propdesk_cascade::TenantTier;
use propdesk_client::Resource;
use propdesk_core::FieldErrors;
use serde::{Deserialize, Serialize};

use super::{require_count, require_date, require_positive};
use crate::feature::Feature;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
}

/// Payment plan form: a balance split into equal installments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentPlanForm {
    pub total_amount: Option<f64>,
    pub installments: Option<u32>,
    pub start_date: String,
    pub frequency: Frequency,
    pub notes: String,
}

impl PaymentPlanForm {
    /// Amount due per installment, rounded to cents.
    pub fn installment_amount(&self) -> Option<f64> {
        let total = self.total_amount?;
        let n = self.installments.filter(|n| *n > 0)?;
        Some((total / n as f64 * 100.0).round() / 100.0)
    }
}

/// Payment Plans.
pub struct PaymentPlans;

impl Feature for PaymentPlans {
    type Tier = TenantTier;
    type Form = PaymentPlanForm;

    const RESOURCE: Resource = Resource::PaymentPlans;
    const HIERARCHY: &'static str = "tenant";
    const REQUIRED: &'static [TenantTier] = &[
        TenantTier::City,
        TenantTier::Property,
        TenantTier::Unit,
        TenantTier::Tenant,
    ];
    const LEAF: TenantTier = TenantTier::Tenant;
    const FIELDS: &'static [&'static str] =
        &["total_amount", "installments", "start_date", "frequency", "notes"];
    const DATE_FIELDS: &'static [&'static str] = &["start_date"];

    fn check_form(form: &PaymentPlanForm) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_positive(&mut errors, "total_amount", "Total amount", form.total_amount);
        require_count(&mut errors, "installments", "Installments", form.installments);
        require_date(&mut errors, "start_date", "Start date", &form.start_date);
        errors
    }
}
