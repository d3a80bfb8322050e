//! Create/edit drawer.
//!
//! A drawer owns one `SelectionState` and one form for its lifetime.
//! Submission is split in two so the host can run the remote call on
//! its own executor: [`Drawer::begin_submit`] validates and marks the
//! drawer busy, [`Drawer::finish_submit`] folds the outcome back in.
//! [`Drawer::submit`] does both against a [`CrudApi`].

use std::sync::Arc;

use propdesk_cascade::{
    HierarchyIndex, Level, NodeId, SelectOutcome, SelectionState, SelectionView, ValidationResult,
    validate,
};
use propdesk_client::{CrudApi, Resource};
use propdesk_core::{
    Capability, FieldErrors, PermissionCheck, ServiceError, merge_patch, normalize_date_only,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::feature::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawerMode {
    Create,
    Edit,
}

/// What a submit attempt ended in.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Stored. Carries the record as it should now appear in the list.
    Saved(Value),
    /// Local checks failed, or a submit is already in flight. No call made.
    Blocked,
    /// The server rejected the fields; errors are shown in the drawer.
    Rejected,
    /// Any other failure; the banner says why.
    Failed,
}

/// A create or update call ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub resource: Resource,
    /// `None` for create.
    pub record_id: Option<String>,
    pub payload: Map<String, Value>,
}

impl SubmitRequest {
    pub async fn send(&self, api: &dyn CrudApi) -> Result<Value, ServiceError> {
        match &self.record_id {
            Some(id) => api.update(self.resource, id, &self.payload).await,
            None => api.create(self.resource, &self.payload).await,
        }
    }
}

/// Serializable drawer snapshot for the host.
#[derive(Debug, Clone, Serialize)]
pub struct DrawerView<T> {
    pub mode: DrawerMode,
    pub open: bool,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    pub selection: SelectionView,
    pub form: T,
}

pub struct Drawer<F: Feature> {
    mode: DrawerMode,
    record_id: Option<String>,
    original: Value,
    selection: SelectionState<F::Tier>,
    form: F::Form,
    errors: FieldErrors,
    focus: Option<String>,
    busy: bool,
    banner: Option<String>,
    open: bool,
    pending: Option<Map<String, Value>>,
}

impl<F: Feature> Drawer<F> {
    fn with(
        mode: DrawerMode,
        selection: SelectionState<F::Tier>,
        form: F::Form,
        record_id: Option<String>,
        original: Value,
    ) -> Self {
        Self {
            mode,
            record_id,
            original,
            selection,
            form,
            errors: FieldErrors::new(),
            focus: None,
            busy: false,
            banner: None,
            open: true,
            pending: None,
        }
    }

    /// Empty drawer for a new record.
    pub fn open_create(
        index: Arc<HierarchyIndex<F::Tier>>,
        perms: &dyn PermissionCheck,
    ) -> Result<Self, ServiceError> {
        perms.require(&F::permission(Capability::Create))?;
        debug!(resource = %F::RESOURCE, "drawer: open create");
        Ok(Self::with(
            DrawerMode::Create,
            SelectionState::new(index),
            F::Form::default(),
            None,
            Value::Null,
        ))
    }

    /// Drawer seeded from an existing record.
    pub fn open_edit(
        index: Arc<HierarchyIndex<F::Tier>>,
        perms: &dyn PermissionCheck,
        record_id: impl Into<String>,
        record: &Value,
    ) -> Result<Self, ServiceError> {
        perms.require(&F::permission(Capability::Edit))?;
        let record_id = record_id.into();
        debug!(resource = %F::RESOURCE, id = %record_id, "drawer: open edit");
        let mut drawer = Self::with(
            DrawerMode::Edit,
            SelectionState::new(index),
            F::Form::default(),
            Some(record_id),
            record.clone(),
        );
        drawer.prefill(record);
        Ok(drawer)
    }

    /// Load a record into the cascade and the form. Returns how many
    /// tiers got selected.
    ///
    /// The cascade is rebuilt by reverse lookup from the leaf id, or from
    /// `<leaf>_name` when the record has no id for it. An unknown leaf
    /// leaves the cascade empty; the user picks again.
    pub fn prefill(&mut self, record: &Value) -> usize {
        let leaf = F::LEAF;
        let index = self.selection.index().clone();
        let chain = match record.get(leaf.payload_key()).and_then(NodeId::from_json) {
            Some(id) => index.find_ancestor_chain(leaf, &id),
            None => record
                .get(format!("{}_name", leaf.key()))
                .and_then(Value::as_str)
                .map(|name| index.find_ancestor_chain_by_label(leaf, name))
                .unwrap_or_default(),
        };
        if chain.is_empty() {
            warn!(resource = %F::RESOURCE, "drawer: record leaf not found in hierarchy");
        }
        self.form = form_from_record::<F>(record);
        self.errors.clear();
        self.focus = None;
        self.selection.apply_chain(&chain)
    }

    pub fn mode(&self) -> DrawerMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Field that should receive focus: a tier payload key or a form field.
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn selection(&self) -> &SelectionState<F::Tier> {
        &self.selection
    }

    pub fn form(&self) -> &F::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F::Form {
        &mut self.form
    }

    /// Pick (or clear) a tier. A change clears the error shown on that tier.
    pub fn select(&mut self, level: F::Tier, id: Option<NodeId>) -> SelectOutcome {
        let outcome = self.selection.select(level, id);
        if outcome == SelectOutcome::Changed {
            self.errors.remove(level.payload_key());
            if self.focus.as_deref() == Some(level.payload_key()) {
                self.focus = None;
            }
        }
        outcome
    }

    /// Run the tier gate and the form checks. Replaces the shown errors.
    pub fn validate(&mut self) -> bool {
        let tiers = validate(&self.selection, F::REQUIRED);
        let form_errors = F::check_form(&self.form);
        self.show_errors(&tiers, form_errors);
        self.errors.is_empty()
    }

    fn show_errors(&mut self, tiers: &ValidationResult<F::Tier>, form_errors: FieldErrors) {
        self.focus = tiers
            .first_invalid
            .map(|l| l.payload_key().to_string())
            .or_else(|| {
                F::FIELDS
                    .iter()
                    .find(|f| form_errors.contains_key(**f))
                    .map(|f| f.to_string())
            })
            .or_else(|| form_errors.keys().next().cloned());
        let mut errors = tiers.to_field_errors();
        errors.extend(form_errors);
        self.errors = errors;
    }

    /// Validate and build the request. `None` when the drawer is closed,
    /// already busy, or invalid.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if !self.open || self.busy {
            debug!(resource = %F::RESOURCE, busy = self.busy, "drawer: submit ignored");
            return None;
        }
        if !self.validate() {
            debug!(resource = %F::RESOURCE, errors = self.errors.len(), "drawer: submit blocked");
            return None;
        }

        let fields = match serde_json::to_value(&self.form) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => {
                warn!(resource = %F::RESOURCE, error = %e, "drawer: form did not serialize");
                Map::new()
            }
        };
        let payload = F::bridge().to_payload(&self.selection, fields);

        self.busy = true;
        self.banner = None;
        self.pending = Some(payload.clone());
        Some(SubmitRequest {
            resource: F::RESOURCE,
            record_id: self.record_id.clone(),
            payload,
        })
    }

    /// Fold the remote result back into the drawer.
    pub fn finish_submit(&mut self, result: Result<Value, ServiceError>) -> SubmitOutcome {
        self.busy = false;
        let payload = self.pending.take().unwrap_or_default();

        match result {
            Ok(body) => {
                let saved = match self.mode {
                    DrawerMode::Create if body.is_null() => Value::Object(payload),
                    DrawerMode::Create => body,
                    DrawerMode::Edit => {
                        let mut saved = self.original.clone();
                        merge_patch(&mut saved, &Value::Object(payload));
                        if !body.is_null() {
                            merge_patch(&mut saved, &body);
                        }
                        saved
                    }
                };
                info!(resource = %F::RESOURCE, mode = ?self.mode, "drawer: saved");
                self.close();
                SubmitOutcome::Saved(saved)
            }
            Err(ServiceError::Validation { message, fields }) => {
                let mut tiers = ValidationResult::default();
                let rest = tiers.merge_remote(&fields);
                self.show_errors(&tiers, rest);
                if self.errors.is_empty() {
                    self.banner = Some(message);
                }
                warn!(resource = %F::RESOURCE, fields = fields.len(), "drawer: server rejected fields");
                SubmitOutcome::Rejected
            }
            Err(e) => {
                warn!(resource = %F::RESOURCE, code = e.error_code(), error = %e, "drawer: submit failed");
                self.banner = Some(e.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// [`begin_submit`](Self::begin_submit), send, then
    /// [`finish_submit`](Self::finish_submit).
    pub async fn submit(&mut self, api: &dyn CrudApi) -> SubmitOutcome {
        let Some(request) = self.begin_submit() else {
            return SubmitOutcome::Blocked;
        };
        let result = request.send(api).await;
        self.finish_submit(result)
    }

    /// Dismiss without saving.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.selection.reset();
        self.form = F::Form::default();
        self.errors.clear();
        self.focus = None;
        self.banner = None;
        self.busy = false;
        self.pending = None;
        self.open = false;
    }

    pub fn view(&self) -> DrawerView<F::Form> {
        DrawerView {
            mode: self.mode,
            open: self.open,
            busy: self.busy,
            record_id: self.record_id.clone(),
            banner: self.banner.clone(),
            errors: self.errors.clone(),
            focus: self.focus.clone(),
            selection: self.selection.view(),
            form: self.form.clone(),
        }
    }
}

/// Deserialize the form from a stored record. Date fields are cut to
/// `YYYY-MM-DD` first so timestamps load as plain dates.
/// Read a stored record into the form. Nulls are skipped, and so is any
/// value the form cannot hold (an unknown status, a wrong type), so one
/// bad field never blanks the rest.
fn form_from_record<F: Feature>(record: &Value) -> F::Form {
    let Some(obj) = record.as_object() else {
        return F::Form::default();
    };
    let mut fields = Map::new();
    for (key, value) in obj {
        if value.is_null() {
            continue;
        }
        let value = match value {
            Value::String(raw) if F::DATE_FIELDS.contains(&key.as_str()) => {
                normalize_date_only(raw).map(Value::String).unwrap_or_else(|| value.clone())
            }
            _ => value.clone(),
        };
        let single = Value::Object(Map::from_iter([(key.clone(), value.clone())]));
        if let Err(e) = serde_json::from_value::<F::Form>(single) {
            warn!(resource = %F::RESOURCE, field = %key, error = %e, "drawer: dropping unreadable field");
            continue;
        }
        fields.insert(key.clone(), value);
    }
    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        warn!(resource = %F::RESOURCE, error = %e, "drawer: record does not match form, starting blank");
        F::Form::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::fake::{Echo, MemoryApi};
    use crate::handlers::load_index;
    use crate::model::{OfferRenewals, OfferStatus, Units, VendorTasks};
    use propdesk_cascade::{TenantTier, VendorTier};
    use propdesk_core::{AllowAll, DenyAll, PolicySet};
    use serde_json::json;

    async fn offer_drawer(api: &MemoryApi) -> Drawer<OfferRenewals> {
        let index = load_index::<OfferRenewals>(api).await;
        Drawer::open_create(index, &AllowAll).unwrap()
    }

    fn fill_offer(d: &mut Drawer<OfferRenewals>) {
        let form = d.form_mut();
        form.offer_date = "2024-03-01T09:30:00Z".into();
        form.expiry_date = "2024-03-31".into();
        form.proposed_rent = Some(1450.0);
        form.term_months = Some(12);
    }

    fn select_alice(d: &mut Drawer<OfferRenewals>) {
        d.select(TenantTier::City, Some(1.into()));
        d.select(TenantTier::Property, Some(10.into()));
        d.select(TenantTier::Unit, Some(100.into()));
        d.select(TenantTier::Tenant, Some(1000.into()));
    }

    #[tokio::test]
    async fn permission_gates_opening() {
        let api = MemoryApi::new();
        let index = load_index::<OfferRenewals>(&api).await;
        let err = Drawer::<OfferRenewals>::open_create(index.clone(), &DenyAll).err();
        assert_eq!(err.map(|e| e.error_code()), Some("PERMISSION_DENIED"));

        let perms = PolicySet::new(["leasing:offers:create"]);
        assert!(Drawer::<OfferRenewals>::open_create(index.clone(), &perms).is_ok());
        assert!(Drawer::<OfferRenewals>::open_edit(index, &perms, "of-1", &json!({})).is_err());
    }

    #[tokio::test]
    async fn incomplete_cascade_blocks_and_focuses_first_gap() {
        let api = MemoryApi::new();
        let mut d = offer_drawer(&api).await;
        fill_offer(&mut d);
        d.select(TenantTier::City, Some(1.into()));

        assert_eq!(d.submit(&api).await, SubmitOutcome::Blocked);
        assert_eq!(d.focus(), Some("property_id"));
        assert_eq!(d.errors()["property_id"], "Please select a Property");
        assert_eq!(d.errors()["unit_id"], "Please select a Unit");
        assert_eq!(d.errors()["tenant_id"], "Please select a Tenant");
        assert!(!d.errors().contains_key("city_id"));
        assert!(!d.is_busy());
        assert!(api.calls().iter().all(|c| !c.starts_with("create")));

        // Picking the property clears its message only.
        d.select(TenantTier::Property, Some(10.into()));
        assert!(!d.errors().contains_key("property_id"));
        assert!(d.errors().contains_key("unit_id"));
    }

    #[tokio::test]
    async fn form_errors_focus_in_field_order() {
        let api = MemoryApi::new();
        let mut d = offer_drawer(&api).await;
        select_alice(&mut d);
        d.form_mut().proposed_rent = Some(1200.0);
        assert!(!d.validate());
        assert_eq!(d.focus(), Some("offer_date"));
        assert!(!d.errors().contains_key("proposed_rent"));
    }

    #[tokio::test]
    async fn create_sends_leaf_only_and_closes() {
        let api = MemoryApi::new();
        let mut d = offer_drawer(&api).await;
        select_alice(&mut d);
        fill_offer(&mut d);

        let request = d.begin_submit().unwrap();
        assert!(d.is_busy());
        assert_eq!(request.resource, Resource::Offers);
        assert_eq!(request.record_id, None);
        assert_eq!(request.payload["tenant_id"], json!(1000));
        assert_eq!(request.payload["offer_date"], json!("2024-03-01"));
        assert!(!request.payload.contains_key("unit_id"));
        assert!(!request.payload.contains_key("city_id"));

        // A second click while the call is in flight does nothing.
        assert!(d.begin_submit().is_none());

        let result = request.send(&api).await;
        let SubmitOutcome::Saved(saved) = d.finish_submit(result) else {
            panic!("create should save");
        };
        assert_eq!(saved["id"], "rec-1");
        assert_eq!(saved["tenant_id"], json!(1000));
        assert!(!d.is_open());
        assert!(!d.is_busy());
        assert!(d.selection().chain().is_empty());
        assert_eq!(api.rows(Resource::Offers).len(), 1);
    }

    #[tokio::test]
    async fn server_field_errors_land_on_tiers_and_fields() {
        let api = MemoryApi::new();
        let mut d = offer_drawer(&api).await;
        select_alice(&mut d);
        fill_offer(&mut d);

        let mut fields = FieldErrors::new();
        fields.insert("tenant_id".into(), "Tenant already has an open offer".into());
        fields.insert("proposed_rent".into(), "Exceeds the rent cap".into());
        api.fail_next(ServiceError::Validation {
            message: "invalid offer".into(),
            fields,
        });

        assert_eq!(d.submit(&api).await, SubmitOutcome::Rejected);
        assert_eq!(d.errors()["tenant_id"], "Tenant already has an open offer");
        assert_eq!(d.errors()["proposed_rent"], "Exceeds the rent cap");
        assert_eq!(d.focus(), Some("tenant_id"));
        assert_eq!(d.banner(), None);
        assert!(d.is_open());
        assert!(!d.is_busy());
        // Selection survives the rejection.
        assert_eq!(d.selection().selected(TenantTier::Tenant), Some(&NodeId::from(1000)));
    }

    #[tokio::test]
    async fn validation_without_fields_shows_banner() {
        let api = MemoryApi::new();
        let mut d = offer_drawer(&api).await;
        select_alice(&mut d);
        fill_offer(&mut d);
        api.fail_next(ServiceError::validation("offer window closed"));
        assert_eq!(d.submit(&api).await, SubmitOutcome::Rejected);
        assert_eq!(d.banner(), Some("offer window closed"));
    }

    #[tokio::test]
    async fn transport_failure_keeps_state_for_resubmit() {
        let api = MemoryApi::new();
        let mut d = offer_drawer(&api).await;
        select_alice(&mut d);
        fill_offer(&mut d);
        api.fail_next(ServiceError::Network("connection reset".into()));

        assert_eq!(d.submit(&api).await, SubmitOutcome::Failed);
        assert_eq!(d.banner(), Some("connection reset"));
        assert!(d.is_open());
        assert_eq!(d.form().term_months, Some(12));

        assert!(matches!(d.submit(&api).await, SubmitOutcome::Saved(_)));
        assert_eq!(
            api.calls().iter().filter(|c| c.starts_with("create")).count(),
            2
        );
    }

    #[tokio::test]
    async fn edit_reseeds_cascade_from_leaf_id() {
        let api = MemoryApi::new().with_rows(
            Resource::Offers,
            vec![json!({
                "id": "of-7",
                "tenant_id": 1001,
                "offer_date": "2024-05-01T00:00:00Z",
                "expiry_date": "2024-05-31",
                "proposed_rent": 1300.0,
                "term_months": 6,
                "status": "sent",
                "created_by": "leasing-bot"
            })],
        );
        let index = load_index::<OfferRenewals>(&api).await;
        let record = api.rows(Resource::Offers).remove(0);
        let mut d = Drawer::<OfferRenewals>::open_edit(index, &AllowAll, "of-7", &record).unwrap();

        assert_eq!(d.mode(), DrawerMode::Edit);
        let chain = d.selection().chain();
        assert_eq!(chain[&TenantTier::City], NodeId::from(1));
        assert_eq!(chain[&TenantTier::Property], NodeId::from(10));
        assert_eq!(chain[&TenantTier::Unit], NodeId::from(101));
        assert_eq!(chain[&TenantTier::Tenant], NodeId::from(1001));
        assert_eq!(d.form().offer_date, "2024-05-01");
        assert_eq!(d.form().status, OfferStatus::Sent);

        d.form_mut().proposed_rent = Some(1350.0);
        api.set_echo(Echo::Nothing);
        let SubmitOutcome::Saved(saved) = d.submit(&api).await else {
            panic!("edit should save");
        };
        assert!(api.calls().contains(&"update offers of-7".to_string()));
        assert_eq!(saved["proposed_rent"], json!(1350.0));
        assert_eq!(saved["id"], "of-7");
        // Fields the form does not know about are kept from the original.
        assert_eq!(saved["created_by"], "leasing-bot");
    }

    #[tokio::test]
    async fn edit_keeps_fields_around_nulls_and_unknown_status() {
        let api = MemoryApi::new().with_rows(
            Resource::Offers,
            vec![json!({
                "id": "of-8",
                "tenant_id": 1000,
                "offer_date": "2024-05-01",
                "expiry_date": "2024-05-31",
                "proposed_rent": 1300.0,
                "term_months": null,
                "status": "countered",
                "notes": null
            })],
        );
        let index = load_index::<OfferRenewals>(&api).await;
        let record = api.rows(Resource::Offers).remove(0);
        let mut d = Drawer::<OfferRenewals>::open_edit(index, &AllowAll, "of-8", &record).unwrap();

        assert_eq!(d.form().offer_date, "2024-05-01");
        assert_eq!(d.form().expiry_date, "2024-05-31");
        assert_eq!(d.form().proposed_rent, Some(1300.0));
        assert_eq!(d.form().term_months, None);
        assert_eq!(d.form().status, OfferStatus::Draft);
        assert_eq!(d.form().notes, "");
        assert_eq!(d.selection().selected(TenantTier::Tenant), Some(&NodeId::from(1000)));

        d.form_mut().term_months = Some(12);
        assert!(d.validate());
        assert!(matches!(d.submit(&api).await, SubmitOutcome::Saved(_)));
    }

    #[tokio::test]
    async fn edit_resolves_leaf_by_name() {
        let api = MemoryApi::new();
        let index = load_index::<VendorTasks>(&api).await;
        let record = json!({"id": "t-1", "vendor_name": "bright electric", "title": "Fix outlet"});
        let d = Drawer::<VendorTasks>::open_edit(index, &AllowAll, "t-1", &record).unwrap();
        assert_eq!(d.selection().selected(VendorTier::Unit), Some(&NodeId::from(100)));
        assert_eq!(d.selection().selected(VendorTier::Vendor), Some(&NodeId::from(5001)));
        assert_eq!(d.form().title, "Fix outlet");
    }

    #[tokio::test]
    async fn edit_with_unknown_leaf_starts_empty() {
        let api = MemoryApi::new();
        let index = load_index::<OfferRenewals>(&api).await;
        let record = json!({"id": "of-9", "tenant_id": 424242});
        let d = Drawer::<OfferRenewals>::open_edit(index, &AllowAll, "of-9", &record).unwrap();
        assert!(d.selection().chain().is_empty());
        assert_eq!(d.selection().options(TenantTier::City).len(), 2);
    }

    #[tokio::test]
    async fn units_cascade_stops_at_property() {
        let api = MemoryApi::new();
        let index = load_index::<Units>(&api).await;
        let mut d = Drawer::<Units>::open_create(index, &AllowAll).unwrap();
        d.select(TenantTier::City, Some(1.into()));
        d.select(TenantTier::Property, Some(11.into()));
        d.form_mut().unit_number = "4D".into();

        let request = d.begin_submit().unwrap();
        assert_eq!(request.payload["property_id"], json!(11));
        assert!(!request.payload.contains_key("unit_id"));
        assert!(!request.payload.contains_key("tenant_id"));
    }

    #[tokio::test]
    async fn view_snapshot() {
        let api = MemoryApi::new();
        let mut d = offer_drawer(&api).await;
        d.select(TenantTier::City, Some(2.into()));
        let view = serde_json::to_value(d.view()).unwrap();
        assert_eq!(view["mode"], "create");
        assert_eq!(view["open"], true);
        assert_eq!(view["selection"]["tiers"][0]["selected"], json!(2));
        assert_eq!(view["selection"]["tiers"][1]["options"][0]["label"], "Pine Row");
        assert_eq!(view["form"]["status"], "draft");
        assert!(view.get("banner").is_none());
    }

    #[tokio::test]
    async fn prefill_seeds_a_create_drawer() {
        let api = MemoryApi::new();
        let mut d = offer_drawer(&api).await;
        let tiers = d.prefill(&json!({"tenant_id": 2000, "term_months": 24}));
        assert_eq!(tiers, 4);
        assert_eq!(d.selection().selected(TenantTier::City), Some(&NodeId::from(2)));
        assert_eq!(d.form().term_months, Some(24));
        assert_eq!(d.mode(), DrawerMode::Create);
    }

    #[tokio::test]
    async fn cancel_discards_state() {
        let api = MemoryApi::new();
        let mut d = offer_drawer(&api).await;
        select_alice(&mut d);
        fill_offer(&mut d);
        d.cancel();
        assert!(!d.is_open());
        assert!(d.selection().chain().is_empty());
        assert!(d.begin_submit().is_none());
    }
}
