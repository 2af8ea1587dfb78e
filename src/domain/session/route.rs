//! Protected-page gating.

use super::SessionState;

/// What a protected page should do for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Initialization has not settled; render a loading state and wait.
    Loading,
    /// Signed in; render the page.
    Allow,
    /// Signed out; replace the location with the given path.
    Redirect(String),
}

impl RouteDecision {
    /// Gates a protected page on `ready && signed_in`.
    ///
    /// Before readiness the decision is deferred, never denied.
    pub fn for_protected(state: &SessionState, landing_path: &str) -> Self {
        if !state.is_ready() {
            RouteDecision::Loading
        } else if state.is_signed_in() {
            RouteDecision::Allow
        } else {
            RouteDecision::Redirect(landing_path.to_string())
        }
    }
}
