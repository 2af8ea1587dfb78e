//! Scripted in-memory provider.
//!
//! Implements every provider port for offline hosts and tests. Supports:
//! - Pre-configured responses
//! - Error injection, per method or once for the next call
//! - Call tracking
//! - Scripted plan changes seen by successive `refresh_user` calls

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::domain::catalog::Tier;
use crate::domain::foundation::Allowance;
use crate::domain::session::UserSnapshot;
use crate::domain::usage::UsageSnapshot;
use crate::ports::{
    AuthProvider, AuthStatus, BillingProvider, CheckoutRequest, CheckoutSession, PortalSession,
    ProductCatalog, ProviderError, TrackReceipt, UsageMeter,
};

const HOSTED_BASE: &str = "https://accounts.example.com";

/// Scripted provider for offline use and tests.
///
/// # Example
///
/// ```ignore
/// let mock = MockProvider::new();
/// mock.sign_in(user);
/// mock.set_usage(UsageSnapshot::new(100, Allowance::Limited(100), Allowance::Limited(0), free));
/// mock.set_track_accepts(false);
/// mock.set_method_error("create_checkout", ProviderError::network("down"));
/// ```
#[derive(Default)]
pub struct MockProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Signed-in user, if any.
    user: Option<UserSnapshot>,

    /// Users returned by successive `refresh_user` calls before falling back
    /// to `user`.
    refresh_script: VecDeque<UserSnapshot>,

    /// Delay before `init` resolves.
    init_delay: Option<Duration>,

    tiers: Vec<Tier>,

    usage: UsageSnapshot,

    /// Whether `track` accepts events. `None` derives it from `usage`.
    track_accepts: Option<bool>,

    next_checkout: Option<CheckoutSession>,

    next_portal: Option<PortalSession>,

    /// Error to return on next call.
    next_error: Option<ProviderError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, ProviderError>,

    /// Checkout requests received, in order.
    checkout_requests: Vec<CheckoutRequest>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose `init` reports `user` as signed in.
    pub fn signed_in_as(user: UserSnapshot) -> Self {
        let mock = Self::new();
        mock.sign_in(user);
        mock
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    pub fn sign_in(&self, user: UserSnapshot) {
        self.state().user = Some(user);
    }

    /// Queue a user for the next `refresh_user` call.
    pub fn push_refresh(&self, user: UserSnapshot) {
        self.state().refresh_script.push_back(user);
    }

    pub fn set_init_delay(&self, delay: Duration) {
        self.state().init_delay = Some(delay);
    }

    pub fn set_tiers(&self, tiers: Vec<Tier>) {
        self.state().tiers = tiers;
    }

    pub fn set_usage(&self, usage: UsageSnapshot) {
        self.state().usage = usage;
    }

    pub fn set_track_accepts(&self, accepts: bool) {
        self.state().track_accepts = Some(accepts);
    }

    pub fn set_checkout_session(&self, session: CheckoutSession) {
        self.state().next_checkout = Some(session);
    }

    pub fn set_portal_session(&self, session: PortalSession) {
        self.state().next_portal = Some(session);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: ProviderError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: ProviderError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Count of calls to any billing operation.
    pub fn billing_call_count(&self) -> usize {
        self.call_count("create_checkout") + self.call_count("open_portal")
    }

    pub fn checkout_requests(&self) -> Vec<CheckoutRequest> {
        self.state().checkout_requests.clone()
    }

    pub fn clear_calls(&self) {
        self.state().call_log.clear();
    }

    /// Usage as the provider currently sees it.
    pub fn usage(&self) -> UsageSnapshot {
        self.state().usage.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), ProviderError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed.
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }

    fn hosted_page(page: &str, redirect: &Url) -> Url {
        let mut url = Url::parse(HOSTED_BASE).unwrap_or_else(|_| redirect.clone());
        url.set_path(page);
        url.set_query(None);
        url.query_pairs_mut().append_pair("redirect", redirect.as_str());
        url
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl AuthProvider for MockProvider {
    async fn init(&self) -> Result<AuthStatus, ProviderError> {
        self.record_call("init", vec![]);

        let delay = self.state().init_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.check_error("init")?;

        Ok(match self.state().user.clone() {
            Some(user) => AuthStatus::signed_in(user),
            None => AuthStatus::signed_out(),
        })
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.record_call("sign_out", vec![]);
        self.check_error("sign_out")?;
        self.state().user = None;
        Ok(())
    }

    async fn refresh_user(&self) -> Result<UserSnapshot, ProviderError> {
        self.record_call("refresh_user", vec![]);
        self.check_error("refresh_user")?;

        let mut state = self.state();
        if let Some(next) = state.refresh_script.pop_front() {
            state.user = Some(next);
        }
        state
            .user
            .clone()
            .ok_or_else(|| ProviderError::unauthorized("no signed-in user"))
    }

    fn sign_in_url(&self, redirect: &Url) -> Url {
        Self::hosted_page("/sign-in", redirect)
    }

    fn sign_up_url(&self, redirect: &Url) -> Url {
        Self::hosted_page("/sign-up", redirect)
    }
}

#[async_trait]
impl ProductCatalog for MockProvider {
    async fn list_tiers(&self) -> Result<Vec<Tier>, ProviderError> {
        self.record_call("list_tiers", vec![]);
        self.check_error("list_tiers")?;
        Ok(self.state().tiers.clone())
    }
}

#[async_trait]
impl UsageMeter for MockProvider {
    async fn check(&self) -> Result<UsageSnapshot, ProviderError> {
        self.record_call("check_usage", vec![]);
        self.check_error("check_usage")?;
        Ok(self.state().usage.clone())
    }

    async fn track(&self) -> Result<TrackReceipt, ProviderError> {
        self.record_call("track_usage", vec![]);
        self.check_error("track_usage")?;

        let mut state = self.state();
        let accepts = state
            .track_accepts
            .unwrap_or(!state.usage.remaining.is_exhausted());
        if !accepts {
            return Ok(TrackReceipt::rejected());
        }

        // The provider's own bookkeeping; the client only sees it on the next check.
        state.usage.count += 1;
        if let Allowance::Limited(left) = state.usage.remaining {
            state.usage.remaining = Allowance::Limited(left.saturating_sub(1));
        }
        Ok(TrackReceipt::accepted())
    }
}

#[async_trait]
impl BillingProvider for MockProvider {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, ProviderError> {
        self.record_call(
            "create_checkout",
            vec![
                request.tier.to_string(),
                request.success_url.to_string(),
                request.cancel_url.to_string(),
            ],
        );
        self.check_error("create_checkout")?;

        let mut state = self.state();
        let session = state.next_checkout.take().unwrap_or_else(|| {
            CheckoutSession::with_url(format!(
                "https://checkout.example.com/pay/{}",
                request.tier
            ))
        });
        state.checkout_requests.push(request);
        Ok(session)
    }

    async fn open_portal(&self, return_url: &Url) -> Result<PortalSession, ProviderError> {
        self.record_call("open_portal", vec![return_url.to_string()]);
        self.check_error("open_portal")?;

        Ok(self
            .state()
            .next_portal
            .take()
            .unwrap_or_else(|| PortalSession::with_url("https://billing.example.com/portal")))
    }
}
