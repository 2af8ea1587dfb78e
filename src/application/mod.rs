//! Application layer - Session ownership, handlers and page views.
//!
//! This layer orchestrates domain rules and coordinates between ports.
//! `SessionContext` is the only writer of session state; handlers gate on
//! its readiness; views hold request-scoped state for the host to render.

mod client;
mod errors;
pub mod handlers;
mod routes;
mod session_context;
mod view_state;
pub mod views;

pub use client::{ClientPorts, ClientSettings, EntitlementClient};
pub use errors::ClientError;
pub use handlers::{
    BillingPortalLauncher, CatalogLoad, CatalogState, CheckoutCoordinator, CheckoutStep,
    EntryDecision, PlanEntry, ReconcileEvent, ReconcilePolicy, ReconcileReport,
    RedirectReconciler, TierCatalogLoader, TrackReport, UsageTracker,
};
pub use routes::RoutePaths;
pub use session_context::SessionContext;
pub use view_state::ViewState;
pub use views::{
    DashboardState, DashboardView, LandingState, LandingView, Notice, PlanCard,
    PlanSelectionState, PlanSelectionView, Selection,
};
