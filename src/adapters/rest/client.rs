//! REST adapter for the identity/billing provider.
//!
//! Implements `AuthProvider`, `ProductCatalog`, `UsageMeter` and
//! `BillingProvider` over the provider's JSON API.
//!
//! # Security
//!
//! - Only the publishable key is ever configured; it is sent on every call
//! - The session token is kept in a `secrecy::SecretString` and dropped on
//!   sign-out
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpProviderConfig::new(base_url, "pk_test_123")
//!     .with_timeout(Duration::from_secs(10));
//! let provider = HttpProvider::new(config)?;
//! ```

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

use crate::domain::catalog::Tier;
use crate::domain::session::UserSnapshot;
use crate::domain::usage::UsageSnapshot;
use crate::ports::{
    AuthProvider, AuthStatus, BillingProvider, CheckoutRequest, CheckoutSession, PortalSession,
    ProductCatalog, ProviderError, TrackReceipt, UsageMeter,
};

use super::wire::{
    CheckoutBody, CheckoutResponse, PortalBody, PortalResponse, RefreshResponse, SessionResponse,
    TiersResponse, TrackResponse,
};

/// Header carrying the publishable key.
pub const PUBLISHABLE_KEY_HEADER: &str = "X-Publishable-Key";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider API configuration.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Base URL of the provider API and its hosted pages.
    base_url: Url,

    /// Publishable key (pk_live_... or pk_test_...).
    publishable_key: String,

    /// Per-request timeout.
    timeout: Duration,
}

impl HttpProviderConfig {
    pub fn new(base_url: Url, publishable_key: impl Into<String>) -> Self {
        Self {
            base_url,
            publishable_key: publishable_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Provider adapter over HTTP.
pub struct HttpProvider {
    config: HttpProviderConfig,
    http_client: reqwest::Client,
    session_token: RwLock<Option<SecretString>>,
}

impl HttpProvider {
    /// Create a new adapter with the given configuration.
    pub fn new(config: HttpProviderConfig) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            session_token: RwLock::new(None),
        })
    }

    /// True while a session token is held.
    pub fn has_session_token(&self) -> bool {
        self.session_token
            .read()
            .map(|token| token.is_some())
            .unwrap_or(false)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, self.endpoint(path))
            .header(PUBLISHABLE_KEY_HEADER, &self.config.publishable_key);

        let token = self
            .session_token
            .read()
            .ok()
            .and_then(|token| token.as_ref().map(|t| t.expose_secret().to_string()));

        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn store_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.session_token.write() {
            *slot = token.map(SecretString::new);
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ProviderError> {
        builder
            .send()
            .await
            .map_err(|e| ProviderError::network(e.to_string()))
    }

    /// Hosted page under the provider's base URL.
    fn hosted_page(&self, page: &str, redirect: &Url) -> Url {
        let mut url = self.config.base_url.clone();
        let path = format!("{}/{}", url.path().trim_end_matches('/'), page);
        url.set_path(&path);
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("redirect", redirect.as_str())
            .append_pair("key", &self.config.publishable_key);
        url
    }
}

/// Checks the status and decodes the body of a provider response.
async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::from_status(
            status.as_u16(),
            format!("{} failed: {}", operation, body),
        ));
    }

    response.json::<T>().await.map_err(|e| {
        warn!(operation, error = %e, "Malformed provider response");
        ProviderError::invalid_response(format!("{}: {}", operation, e))
    })
}

#[async_trait]
impl AuthProvider for HttpProvider {
    async fn init(&self) -> Result<AuthStatus, ProviderError> {
        let response = self.send(self.request(Method::GET, "/v1/auth/session")).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.store_token(None);
            return Ok(AuthStatus::signed_out());
        }

        let session: SessionResponse = decode(response, "auth init").await?;
        self.store_token(session.token);

        match (session.signed_in, session.user) {
            (true, Some(user)) => Ok(AuthStatus::signed_in(user)),
            (true, None) => Err(ProviderError::invalid_response(
                "auth init: signed in without a user",
            )),
            (false, _) => Ok(AuthStatus::signed_out()),
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let result = self
            .send(self.request(Method::POST, "/v1/auth/sign-out"))
            .await;
        // The token is useless after a sign-out attempt either way.
        self.store_token(None);

        let response = result?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), "sign out failed"));
        }
        Ok(())
    }

    async fn refresh_user(&self) -> Result<UserSnapshot, ProviderError> {
        let response = self.send(self.request(Method::POST, "/v1/auth/refresh")).await?;
        let refreshed: RefreshResponse = decode(response, "refresh user").await?;
        if refreshed.token.is_some() {
            self.store_token(refreshed.token);
        }
        Ok(refreshed.user)
    }

    fn sign_in_url(&self, redirect: &Url) -> Url {
        self.hosted_page("sign-in", redirect)
    }

    fn sign_up_url(&self, redirect: &Url) -> Url {
        self.hosted_page("sign-up", redirect)
    }
}

#[async_trait]
impl ProductCatalog for HttpProvider {
    async fn list_tiers(&self) -> Result<Vec<Tier>, ProviderError> {
        let response = self
            .send(self.request(Method::GET, "/v1/products/tiers"))
            .await?;
        let listed: TiersResponse = decode(response, "list tiers").await?;
        Ok(listed.tiers)
    }
}

#[async_trait]
impl UsageMeter for HttpProvider {
    async fn check(&self) -> Result<UsageSnapshot, ProviderError> {
        let response = self.send(self.request(Method::GET, "/v1/usage")).await?;
        decode(response, "usage check").await
    }

    async fn track(&self) -> Result<TrackReceipt, ProviderError> {
        let response = self
            .send(self.request(Method::POST, "/v1/usage/track"))
            .await?;

        // Over-quota is an answer, not a failure. Throttling stays an error.
        if response.status() == StatusCode::PAYMENT_REQUIRED {
            return Ok(TrackReceipt::rejected());
        }

        let tracked: TrackResponse = decode(response, "usage track").await?;
        Ok(TrackReceipt {
            accepted: tracked.success,
        })
    }
}

#[async_trait]
impl BillingProvider for HttpProvider {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, ProviderError> {
        let body = CheckoutBody::from(&request);
        let response = self
            .send(self.request(Method::POST, "/v1/billing/checkout").json(&body))
            .await?;
        let created: CheckoutResponse = decode(response, "create checkout").await?;
        Ok(created.into())
    }

    async fn open_portal(&self, return_url: &Url) -> Result<PortalSession, ProviderError> {
        let body = PortalBody {
            return_url: return_url.to_string(),
        };
        let response = self
            .send(self.request(Method::POST, "/v1/billing/portal").json(&body))
            .await?;
        let opened: PortalResponse = decode(response, "open portal").await?;
        Ok(opened.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base: &str) -> HttpProvider {
        HttpProvider::new(HttpProviderConfig::new(Url::parse(base).unwrap(), "pk_test_123"))
            .unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let p = provider("https://api.example.com/");
        assert_eq!(
            p.endpoint("/v1/usage"),
            "https://api.example.com/v1/usage"
        );
    }

    #[test]
    fn sign_up_url_carries_redirect_and_key() {
        let p = provider("https://accounts.example.com/tenant");
        let target = Url::parse("https://app.example.com/dashboard").unwrap();
        let url = p.sign_up_url(&target);

        assert_eq!(url.path(), "/tenant/sign-up");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                (
                    "redirect".to_string(),
                    "https://app.example.com/dashboard".to_string()
                ),
                ("key".to_string(), "pk_test_123".to_string()),
            ]
        );
    }

    #[test]
    fn sign_in_url_uses_sign_in_page() {
        let p = provider("https://accounts.example.com");
        let target = Url::parse("https://app.example.com/dashboard").unwrap();
        assert_eq!(p.sign_in_url(&target).path(), "/sign-in");
    }

    #[test]
    fn token_starts_empty_and_can_be_cleared() {
        let p = provider("https://api.example.com");
        assert!(!p.has_session_token());
        p.store_token(Some("tok".to_string()));
        assert!(p.has_session_token());
        p.store_token(None);
        assert!(!p.has_session_token());
    }
}
