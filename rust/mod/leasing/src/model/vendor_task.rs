use propdesk_cascade::VendorTier;
use propdesk_client::Resource;
use propdesk_core::FieldErrors;
use serde::{Deserialize, Serialize};

use super::{require_date, require_text};
use crate::feature::Feature;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    Done,
    Cancelled,
}

/// Work order assigned to a vendor at a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorTaskForm {
    pub title: String,
    pub due_date: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub description: String,
}

/// Vendor Task Tracker.
pub struct VendorTasks;

impl Feature for VendorTasks {
    type Tier = VendorTier;
    type Form = VendorTaskForm;

    const RESOURCE: Resource = Resource::VendorTasks;
    const HIERARCHY: &'static str = "vendor";
    const REQUIRED: &'static [VendorTier] = &[
        VendorTier::City,
        VendorTier::Property,
        VendorTier::Unit,
        VendorTier::Vendor,
    ];
    const LEAF: VendorTier = VendorTier::Vendor;
    const FIELDS: &'static [&'static str] = &["title", "due_date", "priority", "status", "description"];
    const DATE_FIELDS: &'static [&'static str] = &["due_date"];

    fn check_form(form: &VendorTaskForm) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", "Title", &form.title);
        require_date(&mut errors, "due_date", "Due date", &form.due_date);
        errors
    }
}
