use std::fmt;

use propdesk_cascade::{FormBridge, Level};
use propdesk_client::Resource;
use propdesk_core::{Capability, FieldErrors, PermissionCheck, permission};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// One back-office feature: which resource it edits, which tiers its
/// cascade has, and what its form looks like.
pub trait Feature: Send + Sync + 'static {
    type Tier: Level;
    type Form: Serialize + DeserializeOwned + Default + Clone + fmt::Debug + Send + Sync;

    const RESOURCE: Resource;

    /// Leaf tier name for the hierarchy endpoint (`"tenant"`, `"vendor"`).
    const HIERARCHY: &'static str;

    /// Tiers that must be selected before submit.
    const REQUIRED: &'static [Self::Tier];

    /// Tier whose id goes on the wire.
    const LEAF: Self::Tier;

    /// Form fields in display order; decides focus among form errors.
    const FIELDS: &'static [&'static str];

    /// Form fields sent as date-only strings.
    const DATE_FIELDS: &'static [&'static str] = &[];

    /// Required-field checks for the non-hierarchy part of the form.
    fn check_form(form: &Self::Form) -> FieldErrors;

    fn bridge() -> FormBridge<Self::Tier> {
        FormBridge::new(Self::LEAF).date_fields(Self::DATE_FIELDS)
    }

    fn permission(capability: Capability) -> String {
        permission(Resource::MODULE, Self::RESOURCE.path(), capability)
    }
}

/// Which controls the host should render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionSet {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl ActionSet {
    pub fn for_feature<F: Feature>(perms: &dyn PermissionCheck) -> Self {
        Self {
            view: perms.allows(&F::permission(Capability::View)),
            create: perms.allows(&F::permission(Capability::Create)),
            edit: perms.allows(&F::permission(Capability::Edit)),
            delete: perms.allows(&F::permission(Capability::Delete)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OfferRenewals, VendorTasks};
    use propdesk_core::{AllowAll, PolicySet};

    #[test]
    fn permission_strings() {
        assert_eq!(
            OfferRenewals::permission(Capability::Edit),
            "leasing:offers:edit"
        );
        assert_eq!(
            VendorTasks::permission(Capability::Delete),
            "leasing:vendor-tasks:delete"
        );
    }

    #[test]
    fn action_set_from_policy() {
        let perms = PolicySet::new(["leasing:*:view", "leasing:offers:create"]);
        let offers = ActionSet::for_feature::<OfferRenewals>(&perms);
        assert_eq!(
            offers,
            ActionSet { view: true, create: true, edit: false, delete: false }
        );
        let tasks = ActionSet::for_feature::<VendorTasks>(&perms);
        assert!(tasks.view && !tasks.create);
        let all = ActionSet::for_feature::<VendorTasks>(&AllowAll);
        assert!(all.view && all.create && all.edit && all.delete);
    }
}
