//! Auth provider port for readiness, sign-in state and user snapshots.
//!
//! `init` is the provider library's bootstrap. Its failure is not fatal:
//! the session still becomes ready, signed out.

use async_trait::async_trait;
use url::Url;

use super::ProviderError;
use crate::domain::session::UserSnapshot;

/// Sign-in state reported by the provider at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStatus {
    pub signed_in: bool,
    pub user: Option<UserSnapshot>,
}

impl AuthStatus {
    pub fn signed_in(user: UserSnapshot) -> Self {
        Self {
            signed_in: true,
            user: Some(user),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            user: None,
        }
    }
}

/// Identity operations of the provider.
///
/// # Contract
///
/// - `init` resolves once per call; callers decide how often to call it
/// - `sign_out` is best-effort; local state is cleared regardless
/// - `refresh_user` returns the provider's latest view of the user
/// - the URL builders are pure and never contact the provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Initializes the provider library and reports the sign-in state.
    async fn init(&self) -> Result<AuthStatus, ProviderError>;

    /// Ends the provider session.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Re-reads the signed-in user, including their current plan.
    async fn refresh_user(&self) -> Result<UserSnapshot, ProviderError>;

    /// Hosted sign-in page that returns to `redirect` afterwards.
    fn sign_in_url(&self, redirect: &Url) -> Url;

    /// Hosted sign-up page that returns to `redirect` afterwards.
    fn sign_up_url(&self, redirect: &Url) -> Url;
}
