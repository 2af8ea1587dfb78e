//! Provider REST payloads.
//!
//! Field names follow the provider's camelCase JSON. Domain types that
//! already speak the wire format (`Tier`, `UsageSnapshot`, `UserSnapshot`)
//! are used directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Tier;
use crate::domain::session::UserSnapshot;
use crate::ports::{CheckoutRequest, CheckoutSession, PortalSession};

/// `GET /v1/auth/session`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SessionResponse {
    #[serde(default)]
    pub signed_in: bool,
    #[serde(default)]
    pub user: Option<UserSnapshot>,
    #[serde(default)]
    pub token: Option<String>,
}

/// `POST /v1/auth/refresh`
#[derive(Debug, Deserialize)]
pub(super) struct RefreshResponse {
    pub user: UserSnapshot,
    #[serde(default)]
    pub token: Option<String>,
}

/// `GET /v1/products/tiers`
#[derive(Debug, Deserialize)]
pub(super) struct TiersResponse {
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

/// `POST /v1/usage/track`
#[derive(Debug, Deserialize)]
pub(super) struct TrackResponse {
    #[serde(default)]
    pub success: bool,
}

/// `POST /v1/billing/checkout`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckoutBody {
    pub tier: String,
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl From<&CheckoutRequest> for CheckoutBody {
    fn from(request: &CheckoutRequest) -> Self {
        Self {
            tier: request.tier.as_str().to_string(),
            price_id: request.price_ref.clone(),
            success_url: request.success_url.to_string(),
            cancel_url: request.cancel_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckoutResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<CheckoutResponse> for CheckoutSession {
    fn from(response: CheckoutResponse) -> Self {
        Self {
            id: response.id,
            url: response.url.filter(|u| !u.is_empty()),
            expires_at: response.expires_at,
        }
    }
}

/// `POST /v1/billing/portal`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PortalBody {
    pub return_url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct PortalResponse {
    #[serde(default)]
    pub url: Option<String>,
}

impl From<PortalResponse> for PortalSession {
    fn from(response: PortalResponse) -> Self {
        Self {
            url: response.url.filter(|u| !u.is_empty()),
        }
    }
}
