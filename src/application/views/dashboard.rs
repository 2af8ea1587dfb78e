//! Dashboard view.
//!
//! Shows usage for the signed-in user, records demo consumption events,
//! and runs the post-checkout reconciliation on load.

use std::sync::Arc;

use url::Url;

use crate::application::handlers::{
    BillingPortalLauncher, ReconcileEvent, ReconcileReport, RedirectReconciler, TrackReport,
    UsageTracker,
};
use crate::application::{ClientError, RoutePaths, SessionContext, ViewState};
use crate::domain::checkout::ReturnMarker;
use crate::domain::foundation::PlanName;
use crate::domain::usage::{TrackOutcome, UsageSnapshot};
use crate::ports::Navigator;

/// Dashboard notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Tracked,
    /// The quota is used up; the user should upgrade.
    QuotaExhausted,
    /// The provider client has not finished initializing.
    PleaseWait,
    RequestFailed(String),
    UpgradeInProgress,
    /// Payment went through but the provider has not shown the new plan yet.
    UpgradePending,
    PortalFailed,
}

impl Notice {
    pub fn text(&self) -> String {
        match self {
            Notice::Tracked => "Request tracked successfully!".to_string(),
            Notice::QuotaExhausted => {
                "Monthly limit reached. Upgrade your plan to keep going.".to_string()
            }
            Notice::PleaseWait => "Please wait, loading...".to_string(),
            Notice::RequestFailed(reason) => format!("Request failed: {}", reason),
            Notice::UpgradeInProgress => "Upgrade successful! Refreshing...".to_string(),
            Notice::UpgradePending => {
                "Payment received. Your plan will update shortly.".to_string()
            }
            Notice::PortalFailed => "Failed to open billing portal".to_string(),
        }
    }

    /// Whether the notice should offer an upgrade.
    pub fn suggests_upgrade(&self) -> bool {
        matches!(self, Notice::QuotaExhausted)
    }

    fn is_upgrade_progress(&self) -> bool {
        matches!(self, Notice::UpgradeInProgress | Notice::UpgradePending)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub usage: Option<UsageSnapshot>,
    /// A tracked event is in flight.
    pub tracking: bool,
    /// Optimistic post-checkout indicator.
    pub upgrading: bool,
    pub notice: Option<Notice>,
}

pub struct DashboardView {
    session: Arc<SessionContext>,
    tracker: Arc<UsageTracker>,
    portal: Arc<BillingPortalLauncher>,
    reconciler: Arc<RedirectReconciler>,
    navigator: Arc<dyn Navigator>,
    routes: RoutePaths,
    state: ViewState<DashboardState>,
}

impl DashboardView {
    pub fn new(
        session: Arc<SessionContext>,
        tracker: Arc<UsageTracker>,
        portal: Arc<BillingPortalLauncher>,
        reconciler: Arc<RedirectReconciler>,
        navigator: Arc<dyn Navigator>,
        routes: RoutePaths,
    ) -> Self {
        Self {
            session,
            tracker,
            portal,
            reconciler,
            navigator,
            routes,
            state: ViewState::new("dashboard", DashboardState::default()),
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn unmount(&self) {
        self.state.unmount();
    }

    pub fn plan(&self) -> PlanName {
        self.session.current_state().current_plan()
    }

    /// Page load: reconciles a checkout return or just loads usage.
    pub async fn load(&self) -> ReconcileReport {
        let state = &self.state;
        let report = self
            .reconciler
            .run_while(|| state.is_mounted(), |event| match event {
                ReconcileEvent::UpgradeDetected { .. } => {
                    state.update(|s| {
                        s.upgrading = true;
                        s.notice = Some(Notice::UpgradeInProgress);
                    });
                }
                ReconcileEvent::Reconciled {
                    confirmed, usage, ..
                } => {
                    state.update(|s| {
                        s.usage = usage;
                        if !confirmed {
                            s.notice = Some(Notice::UpgradePending);
                        }
                    });
                }
                ReconcileEvent::IndicatorCleared => {
                    state.update(|s| {
                        s.upgrading = false;
                        if s.notice.as_ref().map_or(false, Notice::is_upgrade_progress) {
                            s.notice = None;
                        }
                    });
                }
            })
            .await;

        if !matches!(report.marker, Some(ReturnMarker::Success { .. })) {
            let usage = report.usage.clone();
            self.state.update(|s| s.usage = usage);
        }
        report
    }

    /// Records one consumption event.
    ///
    /// Returns `None` when nothing was sent.
    pub async fn track(&self) -> Option<TrackReport> {
        if !self.session.is_ready() {
            self.state.update(|s| s.notice = Some(Notice::PleaseWait));
            return None;
        }

        let started = self.state.update(|s| {
            if s.tracking {
                return false;
            }
            s.tracking = true;
            s.notice = None;
            true
        });
        if started != Some(true) {
            return None;
        }

        let result = self.tracker.track_event().await;

        self.state.update(|s| {
            s.tracking = false;
            match &result {
                Ok(report) => match report.outcome {
                    TrackOutcome::Accepted => {
                        s.notice = Some(Notice::Tracked);
                        if let Some(usage) = &report.usage {
                            s.usage = Some(usage.clone());
                        }
                    }
                    // Usage stays as last fetched.
                    TrackOutcome::QuotaExhausted => s.notice = Some(Notice::QuotaExhausted),
                },
                Err(ClientError::NotReady) => s.notice = Some(Notice::PleaseWait),
                Err(ClientError::Remote(e)) => {
                    s.notice = Some(Notice::RequestFailed(e.message.clone()))
                }
                Err(e) => s.notice = Some(Notice::RequestFailed(e.to_string())),
            }
        });

        result.ok()
    }

    /// Opens the billing portal, returning here afterwards.
    pub async fn manage_billing(&self) -> Result<Url, ClientError> {
        let result = self.portal.open_portal(None).await;
        if let Err(e) = &result {
            let notice = match e {
                ClientError::NotReady => Notice::PleaseWait,
                _ => Notice::PortalFailed,
            };
            self.state.update(|s| s.notice = Some(notice));
        }
        result
    }

    pub fn change_plan(&self) {
        self.navigator.navigate(&self.routes.choose_plan);
    }

    pub async fn sign_out(&self) {
        self.session.sign_out().await;
        self.navigator.navigate(&self.routes.landing);
    }

    pub fn dismiss_notice(&self) {
        self.state.update(|s| s.notice = None);
    }
}
