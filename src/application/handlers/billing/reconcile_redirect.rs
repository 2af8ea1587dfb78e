//! RedirectReconciler - Post-checkout recovery on page load.
//!
//! When the browser comes back from checkout with a success marker, the
//! provider may not have recorded the new plan yet. The reconciler shows an
//! optimistic indicator, waits a settle delay, then polls the user until the
//! plan matches the one paid for (or gives up), refetches usage and removes
//! the marker from the address bar.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `settle_delay` | 1500ms | Wait before the first refresh |
//! | `poll_interval` | 1000ms | Wait between refresh attempts |
//! | `max_attempts` | 5 | Refresh attempts when the target plan is known |
//! | `indicator_clear` | 1500ms | How long the result stays visible |

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::{debug, info, warn};
use url::Url;

use crate::application::SessionContext;
use crate::application::handlers::usage::UsageTracker;
use crate::domain::checkout::return_marker::{is_marker_param, scrub};
use crate::domain::checkout::ReturnMarker;
use crate::domain::foundation::PlanName;
use crate::domain::usage::UsageSnapshot;
use crate::ports::Navigator;

/// Timing of the post-checkout reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePolicy {
    pub settle_delay: Duration,
    pub poll_interval: Duration,
    pub max_attempts: u32,
    pub indicator_clear: Duration,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1500),
            poll_interval: Duration::from_millis(1000),
            max_attempts: 5,
            indicator_clear: Duration::from_millis(1500),
        }
    }
}

impl ReconcilePolicy {
    /// No waiting at all; for hosts that reconcile off-screen.
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            poll_interval: Duration::ZERO,
            max_attempts: 1,
            indicator_clear: Duration::ZERO,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_indicator_clear(mut self, delay: Duration) -> Self {
        self.indicator_clear = delay;
        self
    }
}

/// Progress notifications for the host's indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileEvent {
    /// Success marker found; emitted before any provider call.
    UpgradeDetected { expected_plan: Option<PlanName> },

    /// Session and usage refreshed, marker removed.
    Reconciled {
        plan: PlanName,
        confirmed: bool,
        usage: Option<UsageSnapshot>,
    },

    /// Indicator may be hidden.
    IndicatorCleared,
}

/// What a reconciliation run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub marker: Option<ReturnMarker>,

    /// `refresh_user` calls made.
    pub refresh_attempts: u32,

    /// The session shows the expected plan (or refreshed, when none was
    /// expected).
    pub plan_confirmed: bool,

    pub usage: Option<UsageSnapshot>,

    /// Address-bar rewrite, when a marker was removed.
    pub scrubbed_url: Option<Url>,

    /// The view went away before the run finished.
    pub interrupted: bool,
}

impl ReconcileReport {
    fn abandoned(marker: Option<ReturnMarker>, refresh_attempts: u32, plan_confirmed: bool) -> Self {
        Self {
            marker,
            refresh_attempts,
            plan_confirmed,
            usage: None,
            scrubbed_url: None,
            interrupted: true,
        }
    }
}

/// Recovers session and usage state after returning from checkout.
///
/// Performs only reads and a local session refresh; never calls billing, so
/// running it again on the same URL is harmless.
pub struct RedirectReconciler {
    session: Arc<SessionContext>,
    usage: Arc<UsageTracker>,
    navigator: Arc<dyn Navigator>,
    policy: ReconcilePolicy,
}

impl RedirectReconciler {
    pub fn new(
        session: Arc<SessionContext>,
        usage: Arc<UsageTracker>,
        navigator: Arc<dyn Navigator>,
        policy: ReconcilePolicy,
    ) -> Self {
        Self {
            session,
            usage,
            navigator,
            policy,
        }
    }

    pub fn policy(&self) -> &ReconcilePolicy {
        &self.policy
    }

    /// Runs once for the current page load, after the session is ready.
    pub async fn run<F>(&self, notify: F) -> ReconcileReport
    where
        F: FnMut(ReconcileEvent) + Send,
    {
        self.run_while(|| true, notify).await
    }

    /// Like [`run`](Self::run), but stops as soon as `mounted` turns false.
    ///
    /// `mounted` is checked after every suspension point. An interrupted run
    /// emits no further events, makes no further provider calls and leaves
    /// the address bar alone.
    pub async fn run_while<M, F>(&self, mounted: M, mut notify: F) -> ReconcileReport
    where
        M: Fn() -> bool + Send + Sync,
        F: FnMut(ReconcileEvent) + Send,
    {
        self.session.wait_ready().await;

        let url = self.navigator.current_url();
        let marker = ReturnMarker::detect(&url);
        if !mounted() {
            return ReconcileReport::abandoned(marker, 0, false);
        }

        match marker.clone() {
            Some(ReturnMarker::Success { expected_plan }) => {
                info!(expected_plan = ?expected_plan, "Checkout success detected");
                notify(ReconcileEvent::UpgradeDetected {
                    expected_plan: expected_plan.clone(),
                });

                time::sleep(self.policy.settle_delay).await;
                if !mounted() {
                    debug!("View unmounted during settle delay, reconciliation dropped");
                    return ReconcileReport::abandoned(marker, 0, false);
                }

                let (refresh_attempts, plan_confirmed) =
                    self.settle_plan(expected_plan.as_ref(), &mounted).await;
                if !mounted() {
                    debug!("View unmounted while refreshing, reconciliation dropped");
                    return ReconcileReport::abandoned(
                        marker,
                        refresh_attempts,
                        plan_confirmed,
                    );
                }

                let usage = self.fetch_usage().await;
                if !mounted() {
                    debug!("View unmounted while loading usage, reconciliation dropped");
                    return ReconcileReport::abandoned(
                        marker,
                        refresh_attempts,
                        plan_confirmed,
                    );
                }
                let scrubbed_url = self.scrub_current();

                let plan = self.session.current_state().current_plan();
                info!(
                    plan = %plan,
                    confirmed = plan_confirmed,
                    attempts = refresh_attempts,
                    "Checkout reconciled"
                );
                notify(ReconcileEvent::Reconciled {
                    plan,
                    confirmed: plan_confirmed,
                    usage: usage.clone(),
                });

                time::sleep(self.policy.indicator_clear).await;
                if mounted() {
                    notify(ReconcileEvent::IndicatorCleared);
                }

                ReconcileReport {
                    marker,
                    refresh_attempts,
                    plan_confirmed,
                    usage,
                    scrubbed_url,
                    interrupted: false,
                }
            }
            Some(ReturnMarker::Canceled) => {
                debug!("Checkout canceled, clearing marker");
                let scrubbed_url = self.scrub_current();
                self.finish_without_refresh(marker, scrubbed_url, &mounted).await
            }
            None => self.finish_without_refresh(marker, None, &mounted).await,
        }
    }

    async fn finish_without_refresh<M>(
        &self,
        marker: Option<ReturnMarker>,
        scrubbed_url: Option<Url>,
        mounted: &M,
    ) -> ReconcileReport
    where
        M: Fn() -> bool + Send + Sync,
    {
        let usage = self.fetch_usage().await;
        if !mounted() {
            return ReconcileReport {
                scrubbed_url,
                ..ReconcileReport::abandoned(marker, 0, false)
            };
        }
        ReconcileReport {
            marker,
            refresh_attempts: 0,
            plan_confirmed: false,
            usage,
            scrubbed_url,
            interrupted: false,
        }
    }

    /// Refreshes the user until `expected` shows up or attempts run out.
    ///
    /// Without an expected plan a single refresh is made.
    async fn settle_plan<M>(&self, expected: Option<&PlanName>, mounted: &M) -> (u32, bool)
    where
        M: Fn() -> bool + Send + Sync,
    {
        let max_attempts = match expected {
            Some(_) => self.policy.max_attempts.max(1),
            None => 1,
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.session.refresh().await {
                Ok(user) => match expected {
                    None => return (attempts, true),
                    Some(plan) if &user.plan == plan => return (attempts, true),
                    Some(plan) => debug!(
                        attempt = attempts,
                        expected = %plan,
                        actual = %user.plan,
                        "Plan not updated yet"
                    ),
                },
                Err(e) => warn!(attempt = attempts, error = %e, "Refresh after checkout failed"),
            }

            if attempts >= max_attempts {
                if expected.is_some() {
                    warn!(attempts, "Plan change not visible after checkout");
                }
                return (attempts, false);
            }
            time::sleep(self.policy.poll_interval).await;
            if !mounted() {
                return (attempts, false);
            }
        }
    }

    async fn fetch_usage(&self) -> Option<UsageSnapshot> {
        // Failures are logged by the tracker and tolerated here.
        self.usage.check_usage().await.ok()
    }

    /// Removes markers from the address bar as it is now, not as it was
    /// when the run started.
    fn scrub_current(&self) -> Option<Url> {
        let current = self.navigator.current_url();
        if !current.query_pairs().any(|(key, _)| is_marker_param(&key)) {
            return None;
        }
        let clean = scrub(&current);
        self.navigator.replace_url(&clean);
        Some(clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryNavigator, MockProvider};
    use crate::domain::foundation::{Allowance, UserId};
    use crate::domain::session::UserSnapshot;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    fn user(plan: &str) -> UserSnapshot {
        UserSnapshot::new(
            UserId::new("u1").unwrap(),
            "a@example.com",
            PlanName::new(plan).unwrap(),
        )
    }

    struct Fixture {
        mock: MockProvider,
        navigator: MemoryNavigator,
        session: Arc<SessionContext>,
        reconciler: Arc<RedirectReconciler>,
    }

    fn fixture(start: &str, policy: ReconcilePolicy) -> Fixture {
        let mock = MockProvider::signed_in_as(user("free"));
        mock.set_usage(UsageSnapshot::new(
            5,
            Allowance::Limited(100),
            Allowance::Limited(95),
            PlanName::free(),
        ));
        let navigator = MemoryNavigator::parse(start).unwrap();
        let session = Arc::new(SessionContext::new(Arc::new(mock.clone())));
        let usage = Arc::new(UsageTracker::new(Arc::clone(&session), Arc::new(mock.clone())));
        let reconciler = Arc::new(RedirectReconciler::new(
            Arc::clone(&session),
            usage,
            Arc::new(navigator.clone()),
            policy,
        ));
        Fixture {
            mock,
            navigator,
            session,
            reconciler,
        }
    }

    #[tokio::test]
    async fn absent_marker_only_checks_usage() {
        let f = fixture("https://app.example.com/dashboard", ReconcilePolicy::immediate());
        f.session.initialize().await;

        let report = f.reconciler.run(|_| {}).await;

        assert!(report.marker.is_none());
        assert_eq!(report.usage.map(|u| u.count), Some(5));
        assert!(!f.mock.was_called("refresh_user"));
        assert!(f.navigator.replacements().is_empty());
    }

    #[tokio::test]
    async fn success_without_expected_plan_refreshes_once() {
        let f = fixture(
            "https://app.example.com/dashboard?success=true",
            ReconcilePolicy::immediate().with_max_attempts(5),
        );
        f.session.initialize().await;

        let report = f.reconciler.run(|_| {}).await;

        assert_eq!(report.refresh_attempts, 1);
        assert!(report.plan_confirmed);
        assert_eq!(f.mock.call_count("refresh_user"), 1);
        assert_eq!(f.mock.call_count("check_usage"), 1);
        assert_eq!(
            report.scrubbed_url.map(|u| u.to_string()),
            Some("https://app.example.com/dashboard".to_string())
        );
        assert_eq!(f.mock.billing_call_count(), 0);
    }

    #[tokio::test]
    async fn polls_until_expected_plan_appears() {
        let f = fixture(
            "https://app.example.com/dashboard?success=true&upgraded_to=pro",
            ReconcilePolicy::immediate().with_max_attempts(5),
        );
        f.session.initialize().await;
        f.mock.push_refresh(user("free"));
        f.mock.push_refresh(user("free"));
        f.mock.push_refresh(user("pro"));

        let report = f.reconciler.run(|_| {}).await;

        assert_eq!(report.refresh_attempts, 3);
        assert!(report.plan_confirmed);
        assert_eq!(f.session.current_state().current_plan().as_str(), "pro");
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let f = fixture(
            "https://app.example.com/dashboard?success=true&upgraded_to=pro",
            ReconcilePolicy::immediate().with_max_attempts(3),
        );
        f.session.initialize().await;

        let report = f.reconciler.run(|_| {}).await;

        assert_eq!(report.refresh_attempts, 3);
        assert!(!report.plan_confirmed);
        // The marker is removed even when the provider lags.
        assert_eq!(f.navigator.replacements().len(), 1);
    }

    #[tokio::test]
    async fn cancel_marker_is_scrubbed_and_usage_loaded() {
        let f = fixture(
            "https://app.example.com/choose-plan?canceled=true&ref=ad",
            ReconcilePolicy::immediate(),
        );
        f.session.initialize().await;

        let report = f.reconciler.run(|_| {}).await;

        assert_eq!(report.marker, Some(ReturnMarker::Canceled));
        assert_eq!(
            f.navigator.current_url().as_str(),
            "https://app.example.com/choose-plan?ref=ad"
        );
        assert!(report.usage.is_some());
        assert!(!f.mock.was_called("refresh_user"));
    }

    #[tokio::test]
    async fn events_are_emitted_in_order() {
        let f = fixture(
            "https://app.example.com/dashboard?success=true",
            ReconcilePolicy::immediate(),
        );
        f.session.initialize().await;
        let events = Mutex::new(Vec::new());

        f.reconciler
            .run(|event| events.lock().unwrap().push(event))
            .await;

        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ReconcileEvent::UpgradeDetected { .. }));
        assert!(matches!(events[1], ReconcileEvent::Reconciled { confirmed: true, .. }));
        assert_eq!(events[2], ReconcileEvent::IndicatorCleared);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_waits_for_settle_delay() {
        let f = fixture(
            "https://app.example.com/dashboard?success=true",
            ReconcilePolicy::default(),
        );
        f.session.initialize().await;

        let reconciler = Arc::clone(&f.reconciler);
        let handle = tokio::spawn(async move { reconciler.run(|_| {}).await });

        time::sleep(Duration::from_millis(1000)).await;
        assert!(!f.mock.was_called("refresh_user"));

        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(f.mock.call_count("refresh_user"), 1);
        assert_eq!(f.mock.call_count("check_usage"), 1);

        let report = handle.await.unwrap();
        assert!(report.plan_confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_during_settle_delay_drops_the_run() {
        let f = fixture(
            "https://app.example.com/dashboard?success=true",
            ReconcilePolicy::default(),
        );
        f.session.initialize().await;
        let mounted = Arc::new(AtomicBool::new(true));

        let reconciler = Arc::clone(&f.reconciler);
        let flag = Arc::clone(&mounted);
        let handle = tokio::spawn(async move {
            reconciler
                .run_while(move || flag.load(Ordering::SeqCst), |_| {})
                .await
        });

        time::sleep(Duration::from_millis(200)).await;
        mounted.store(false, Ordering::SeqCst);
        f.navigator.navigate("/choose-plan");

        let report = handle.await.unwrap();

        assert!(report.interrupted);
        assert!(report.scrubbed_url.is_none());
        assert!(!f.mock.was_called("refresh_user"));
        assert!(!f.mock.was_called("check_usage"));
        assert!(f.navigator.replacements().is_empty());
        assert_eq!(
            f.navigator.current_url().as_str(),
            "https://app.example.com/choose-plan"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn address_without_marker_is_not_rewritten() {
        let f = fixture(
            "https://app.example.com/dashboard?success=true",
            ReconcilePolicy::default(),
        );
        f.session.initialize().await;

        let reconciler = Arc::clone(&f.reconciler);
        let handle = tokio::spawn(async move { reconciler.run(|_| {}).await });

        time::sleep(Duration::from_millis(200)).await;
        f.navigator
            .load(Url::parse("https://app.example.com/dashboard?tab=usage").unwrap());

        let report = handle.await.unwrap();

        assert!(!report.interrupted);
        assert!(report.scrubbed_url.is_none());
        assert!(f.navigator.replacements().is_empty());
        assert_eq!(
            f.navigator.current_url().as_str(),
            "https://app.example.com/dashboard?tab=usage"
        );
    }

    #[tokio::test]
    async fn waits_for_initialization_before_reading_marker() {
        let f = fixture("https://app.example.com/dashboard", ReconcilePolicy::immediate());

        let reconciler = Arc::clone(&f.reconciler);
        let handle = tokio::spawn(async move { reconciler.run(|_| {}).await });
        tokio::task::yield_now().await;
        assert!(!f.mock.was_called("check_usage"));

        f.session.initialize().await;
        let report = handle.await.unwrap();
        assert!(report.usage.is_some());
    }
}
