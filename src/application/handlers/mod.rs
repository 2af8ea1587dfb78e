//! Application handlers, grouped by concern.

pub mod billing;
pub mod catalog;
pub mod entry;
pub mod usage;

pub use billing::{
    BillingPortalLauncher, CheckoutCoordinator, CheckoutStep, ReconcileEvent, ReconcilePolicy,
    ReconcileReport, RedirectReconciler,
};
pub use catalog::{CatalogLoad, CatalogState, TierCatalogLoader};
pub use entry::{EntryDecision, PlanEntry};
pub use usage::{TrackReport, UsageTracker};
