//! Leasing back-office features.
//!
//! Offers & Renewals, Payment Plans, Units and the Vendor Task Tracker
//! share one drawer and one list page, parameterized by [`Feature`].
//! The host renders `view()` snapshots; every state change happens here.

pub mod feature;
pub mod handlers;
pub mod model;

pub use feature::{ActionSet, Feature};
pub use handlers::drawer::{Drawer, DrawerMode, DrawerView, SubmitOutcome, SubmitRequest};
pub use handlers::list::{ListPage, ListView};
pub use handlers::load_index;
pub use model::{OfferRenewals, PaymentPlans, Units, VendorTasks};
