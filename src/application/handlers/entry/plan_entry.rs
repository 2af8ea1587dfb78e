//! PlanEntry - Routes landing-page visitors toward sign-up, the dashboard or
//! the plan picker.

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::application::{ClientError, RoutePaths, SessionContext};
use crate::domain::checkout::return_marker::same_origin;
use crate::domain::foundation::PlanName;
use crate::ports::{AuthProvider, Navigator};

/// Where "get started" sent the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDecision {
    /// Session not settled; nothing happened.
    Deferred,

    /// Signed out; redirected to the provider's sign-up page.
    SignUp(Url),

    /// Signed in; moved to an in-app path.
    Navigate(String),
}

pub struct PlanEntry {
    session: Arc<SessionContext>,
    auth: Arc<dyn AuthProvider>,
    navigator: Arc<dyn Navigator>,
    routes: RoutePaths,
}

impl PlanEntry {
    pub fn new(
        session: Arc<SessionContext>,
        auth: Arc<dyn AuthProvider>,
        navigator: Arc<dyn Navigator>,
        routes: RoutePaths,
    ) -> Self {
        Self {
            session,
            auth,
            navigator,
            routes,
        }
    }

    /// Acts on a "get started" click, optionally for a specific tier.
    ///
    /// Signed-in users choosing no tier, the free tier or their current plan
    /// go to the dashboard; any other tier goes to the plan picker. Nothing
    /// on this path ever starts a checkout.
    pub fn get_started(&self, tier: Option<&PlanName>) -> Result<EntryDecision, ClientError> {
        let state = self.session.current_state();
        if !state.is_ready() {
            return Ok(EntryDecision::Deferred);
        }

        if !state.is_signed_in() {
            let target = self.sign_up_url()?;
            info!(tier = ?tier.map(PlanName::as_str), "Sending visitor to sign-up");
            self.navigator.redirect(&target);
            return Ok(EntryDecision::SignUp(target));
        }

        let current = state.current_plan();
        let path = match tier {
            None => &self.routes.dashboard,
            Some(t) if t.is_free() || *t == current => &self.routes.dashboard,
            Some(_) => &self.routes.choose_plan,
        };
        self.navigator.navigate(path);
        Ok(EntryDecision::Navigate(path.clone()))
    }

    /// Hosted sign-in page returning to the dashboard.
    pub fn sign_in_url(&self) -> Result<Url, ClientError> {
        Ok(self.auth.sign_in_url(&self.dashboard_url()?))
    }

    /// Hosted sign-up page returning to the dashboard.
    pub fn sign_up_url(&self) -> Result<Url, ClientError> {
        Ok(self.auth.sign_up_url(&self.dashboard_url()?))
    }

    fn dashboard_url(&self) -> Result<Url, ClientError> {
        same_origin(&self.navigator.current_url(), &self.routes.dashboard)
            .map_err(|e| ClientError::redirect_failure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryNavigator, MockProvider};
    use crate::domain::foundation::UserId;
    use crate::domain::session::UserSnapshot;

    fn plan(name: &str) -> PlanName {
        PlanName::new(name).unwrap()
    }

    async fn entry(mock: &MockProvider, nav: &MemoryNavigator, ready: bool) -> PlanEntry {
        let session = Arc::new(SessionContext::new(Arc::new(mock.clone())));
        if ready {
            session.initialize().await;
        }
        PlanEntry::new(
            session,
            Arc::new(mock.clone()),
            Arc::new(nav.clone()),
            RoutePaths::default(),
        )
    }

    fn signed_in(current: &str) -> MockProvider {
        MockProvider::signed_in_as(UserSnapshot::new(
            UserId::new("u1").unwrap(),
            "a@example.com",
            plan(current),
        ))
    }

    #[tokio::test]
    async fn signed_out_visitor_goes_to_sign_up() {
        let mock = MockProvider::new();
        let nav = MemoryNavigator::parse("https://app.example.com/").unwrap();
        let entry = entry(&mock, &nav, true).await;

        let decision = entry.get_started(Some(&plan("pro"))).unwrap();

        let expected = mock.sign_up_url(&Url::parse("https://app.example.com/dashboard").unwrap());
        assert_eq!(decision, EntryDecision::SignUp(expected.clone()));
        assert_eq!(nav.redirects(), vec![expected]);
        assert_eq!(mock.billing_call_count(), 0);
    }

    #[tokio::test]
    async fn not_ready_defers() {
        let mock = signed_in("free");
        let nav = MemoryNavigator::parse("https://app.example.com/").unwrap();
        let entry = entry(&mock, &nav, false).await;

        assert_eq!(entry.get_started(None).unwrap(), EntryDecision::Deferred);
        assert!(nav.history().is_empty());
    }

    #[tokio::test]
    async fn signed_in_paid_tier_goes_to_plan_picker() {
        let mock = signed_in("free");
        let nav = MemoryNavigator::parse("https://app.example.com/").unwrap();
        let entry = entry(&mock, &nav, true).await;

        assert_eq!(
            entry.get_started(Some(&plan("pro"))).unwrap(),
            EntryDecision::Navigate("/choose-plan".to_string())
        );
    }

    #[tokio::test]
    async fn signed_in_current_or_free_tier_goes_to_dashboard() {
        let mock = signed_in("pro");
        let nav = MemoryNavigator::parse("https://app.example.com/").unwrap();
        let entry = entry(&mock, &nav, true).await;

        for tier in [None, Some(plan("free")), Some(plan("pro"))] {
            assert_eq!(
                entry.get_started(tier.as_ref()).unwrap(),
                EntryDecision::Navigate("/dashboard".to_string())
            );
        }
    }

    #[tokio::test]
    async fn sign_in_url_targets_dashboard_on_current_origin() {
        let mock = MockProvider::new();
        let nav = MemoryNavigator::parse("https://app.example.com:8080/pricing?x=1").unwrap();
        let entry = entry(&mock, &nav, false).await;

        let url = entry.sign_in_url().unwrap();

        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "redirect" && v == "https://app.example.com:8080/dashboard"));
    }
}
