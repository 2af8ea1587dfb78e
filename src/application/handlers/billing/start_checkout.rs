//! CheckoutCoordinator - Command handler for starting a hosted checkout.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use url::Url;

use crate::application::{ClientError, RoutePaths, SessionContext};
use crate::domain::catalog::Tier;
use crate::domain::checkout::return_marker::{cancel_return_url, success_return_url};
use crate::ports::{BillingProvider, CheckoutRequest, Navigator};

/// Where a selection sent the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Free tier; moved to an in-app path without contacting billing.
    LocalNavigation(String),

    /// Full-page redirect to the provider's checkout page.
    Redirected(Url),
}

/// Builds checkout requests and hands the browser to the provider.
///
/// Stateless: the per-selection state machine lives in the plan picker.
pub struct CheckoutCoordinator {
    session: Arc<SessionContext>,
    billing: Arc<dyn BillingProvider>,
    navigator: Arc<dyn Navigator>,
    routes: RoutePaths,
}

impl CheckoutCoordinator {
    pub fn new(
        session: Arc<SessionContext>,
        billing: Arc<dyn BillingProvider>,
        navigator: Arc<dyn Navigator>,
        routes: RoutePaths,
    ) -> Self {
        Self {
            session,
            billing,
            navigator,
            routes,
        }
    }

    pub async fn start_checkout(&self, tier: &Tier) -> Result<CheckoutStep, ClientError> {
        // 1. Free tiers never reach billing
        if tier.is_free() {
            self.navigator.navigate(&self.routes.dashboard);
            return Ok(CheckoutStep::LocalNavigation(self.routes.dashboard.clone()));
        }

        // 2. Gate on readiness
        self.session.require_ready()?;

        // 3. Return URLs on the current origin
        let current = self.navigator.current_url();
        let success_url = success_return_url(&current, &self.routes.dashboard, &tier.name)
            .map_err(|e| ClientError::redirect_failure(e.to_string()))?;
        let cancel_url = cancel_return_url(&current, &self.routes.choose_plan)
            .map_err(|e| ClientError::redirect_failure(e.to_string()))?;

        // 4. Create checkout session
        let session = self
            .billing
            .create_checkout(CheckoutRequest {
                tier: tier.name.clone(),
                price_ref: tier.price_ref.clone(),
                success_url,
                cancel_url,
            })
            .await
            .map_err(|e| {
                error!(tier = %tier.name, error = %e, "Checkout error");
                ClientError::from(e)
            })?;

        // 5. Follow the hosted page
        if session.is_expired_at(Utc::now()) {
            error!(tier = %tier.name, checkout_id = ?session.id, "Checkout session already expired");
            return Err(ClientError::redirect_failure("checkout session expired"));
        }

        let target = session
            .url
            .as_deref()
            .ok_or_else(|| ClientError::redirect_failure("checkout session has no URL"))
            .and_then(|raw| {
                Url::parse(raw).map_err(|e| {
                    ClientError::redirect_failure(format!("invalid checkout URL: {}", e))
                })
            })
            .map_err(|e| {
                error!(tier = %tier.name, error = %e, "Failed to create checkout session");
                e
            })?;

        info!(tier = %tier.name, checkout_id = ?session.id, "Redirecting to checkout");
        self.navigator.redirect(&target);
        Ok(CheckoutStep::Redirected(target))
    }
}
