//! EntitlementClient - the root object a host mounts once per page.
//!
//! Owns the single `SessionContext` and wires every handler and view to it
//! and to the injected ports.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::handlers::{
    BillingPortalLauncher, CheckoutCoordinator, PlanEntry, ReconcilePolicy, RedirectReconciler,
    TierCatalogLoader, UsageTracker,
};
use super::views::{DashboardView, LandingView, PlanSelectionView};
use super::{RoutePaths, SessionContext};
use crate::domain::session::RouteDecision;
use crate::ports::{AuthProvider, BillingProvider, Navigator, ProductCatalog, UsageMeter};

/// Ports the client is built from.
#[derive(Clone)]
pub struct ClientPorts {
    pub auth: Arc<dyn AuthProvider>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub usage: Arc<dyn UsageMeter>,
    pub billing: Arc<dyn BillingProvider>,
    pub navigator: Arc<dyn Navigator>,
}

impl ClientPorts {
    /// All provider ports served by one adapter.
    pub fn from_provider<P>(provider: Arc<P>, navigator: Arc<dyn Navigator>) -> Self
    where
        P: AuthProvider + ProductCatalog + UsageMeter + BillingProvider + 'static,
    {
        Self {
            auth: provider.clone(),
            catalog: provider.clone(),
            usage: provider.clone(),
            billing: provider,
            navigator,
        }
    }
}

/// Tunables for the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    pub routes: RoutePaths,
    pub reconcile: ReconcilePolicy,
}

pub struct EntitlementClient {
    ports: ClientPorts,
    settings: ClientSettings,
    session: Arc<SessionContext>,
    catalog: Arc<TierCatalogLoader>,
    usage: Arc<UsageTracker>,
    checkout: Arc<CheckoutCoordinator>,
    portal: Arc<BillingPortalLauncher>,
    reconciler: Arc<RedirectReconciler>,
    entry: Arc<PlanEntry>,
}

impl EntitlementClient {
    pub fn new(ports: ClientPorts, settings: ClientSettings) -> Self {
        let session = Arc::new(SessionContext::new(Arc::clone(&ports.auth)));
        let catalog = Arc::new(TierCatalogLoader::new(Arc::clone(&ports.catalog)));
        let usage = Arc::new(UsageTracker::new(
            Arc::clone(&session),
            Arc::clone(&ports.usage),
        ));
        let checkout = Arc::new(CheckoutCoordinator::new(
            Arc::clone(&session),
            Arc::clone(&ports.billing),
            Arc::clone(&ports.navigator),
            settings.routes.clone(),
        ));
        let portal = Arc::new(BillingPortalLauncher::new(
            Arc::clone(&session),
            Arc::clone(&ports.billing),
            Arc::clone(&ports.navigator),
        ));
        let reconciler = Arc::new(RedirectReconciler::new(
            Arc::clone(&session),
            Arc::clone(&usage),
            Arc::clone(&ports.navigator),
            settings.reconcile.clone(),
        ));
        let entry = Arc::new(PlanEntry::new(
            Arc::clone(&session),
            Arc::clone(&ports.auth),
            Arc::clone(&ports.navigator),
            settings.routes.clone(),
        ));

        Self {
            ports,
            settings,
            session,
            catalog,
            usage,
            checkout,
            portal,
            reconciler,
            entry,
        }
    }

    /// Starts provider initialization without waiting for it.
    ///
    /// Must be called inside a tokio runtime.
    pub fn mount(&self) -> JoinHandle<()> {
        let session = Arc::clone(&self.session);
        tokio::spawn(async move { session.initialize().await })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn catalog_loader(&self) -> &Arc<TierCatalogLoader> {
        &self.catalog
    }

    pub fn usage_tracker(&self) -> &Arc<UsageTracker> {
        &self.usage
    }

    pub fn checkout(&self) -> &Arc<CheckoutCoordinator> {
        &self.checkout
    }

    pub fn billing_portal(&self) -> &Arc<BillingPortalLauncher> {
        &self.portal
    }

    pub fn reconciler(&self) -> &Arc<RedirectReconciler> {
        &self.reconciler
    }

    pub fn plan_entry(&self) -> &Arc<PlanEntry> {
        &self.entry
    }

    /// Route guard for protected pages.
    pub fn route_decision(&self) -> RouteDecision {
        self.session.route_decision(&self.settings.routes.landing)
    }

    pub fn landing_view(&self) -> LandingView {
        LandingView::new(
            Arc::clone(&self.session),
            Arc::clone(&self.catalog),
            Arc::clone(&self.entry),
        )
    }

    pub fn plan_selection_view(&self) -> PlanSelectionView {
        PlanSelectionView::new(
            Arc::clone(&self.session),
            Arc::clone(&self.catalog),
            Arc::clone(&self.checkout),
            Arc::clone(&self.ports.navigator),
        )
    }

    pub fn dashboard_view(&self) -> DashboardView {
        DashboardView::new(
            Arc::clone(&self.session),
            Arc::clone(&self.usage),
            Arc::clone(&self.portal),
            Arc::clone(&self.reconciler),
            Arc::clone(&self.ports.navigator),
            self.settings.routes.clone(),
        )
    }
}
