//! Billing handlers.
//!
//! ## Commands
//! - Starting a hosted checkout for a tier
//! - Opening the self-service billing portal
//! - Reconciling session and usage after returning from checkout

mod open_portal;
mod reconcile_redirect;
mod start_checkout;

pub use open_portal::BillingPortalLauncher;
pub use reconcile_redirect::{ReconcileEvent, ReconcilePolicy, ReconcileReport, RedirectReconciler};
pub use start_checkout::{CheckoutCoordinator, CheckoutStep};
