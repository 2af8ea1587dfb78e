//! Billing provider port for hosted checkout and the billing portal.
//!
//! Both operations hand the browser off to a provider-hosted page. The
//! provider may answer without a URL; callers treat that as a redirect
//! failure rather than a transport error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::ProviderError;
use crate::domain::foundation::PlanName;

/// Starts hosted payment flows for the signed-in user.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Create a checkout session for a tier.
    ///
    /// Returns a URL for the customer to complete payment.
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, ProviderError>;

    /// Create a billing portal session for subscription management.
    async fn open_portal(&self, return_url: &Url) -> Result<PortalSession, ProviderError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Tier to subscribe to.
    pub tier: PlanName,

    /// Provider price reference of the tier.
    pub price_ref: String,

    /// URL to return to after successful checkout.
    pub success_url: Url,

    /// URL to return to after canceled checkout.
    pub cancel_url: Url,
}

/// Checkout session for payment completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: Option<String>,

    /// URL for customer to complete checkout.
    pub url: Option<String>,

    /// When the session expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CheckoutSession {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// True if the session has already expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

/// Portal session for subscription management.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSession {
    /// URL for customer to access portal.
    pub url: Option<String>,
}

impl PortalSession {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}
