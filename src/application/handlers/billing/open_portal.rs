//! BillingPortalLauncher - Command handler for the self-service billing portal.

use std::sync::Arc;

use tracing::{error, info};
use url::Url;

use crate::application::{ClientError, SessionContext};
use crate::ports::{BillingProvider, Navigator};

/// Requests a portal session and redirects to it.
pub struct BillingPortalLauncher {
    session: Arc<SessionContext>,
    billing: Arc<dyn BillingProvider>,
    navigator: Arc<dyn Navigator>,
}

impl BillingPortalLauncher {
    pub fn new(
        session: Arc<SessionContext>,
        billing: Arc<dyn BillingProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            billing,
            navigator,
        }
    }

    /// Opens the portal, returning to `return_url` or the current page.
    ///
    /// On failure the page is left where it is.
    pub async fn open_portal(&self, return_url: Option<Url>) -> Result<Url, ClientError> {
        self.session.require_ready()?;

        let return_url = return_url.unwrap_or_else(|| self.navigator.current_url());

        let portal = self.billing.open_portal(&return_url).await.map_err(|e| {
            error!(error = %e, "Billing portal error");
            ClientError::from(e)
        })?;

        let raw = portal.url.ok_or_else(|| {
            error!("Billing portal session has no URL");
            ClientError::redirect_failure("billing portal session has no URL")
        })?;
        let target = Url::parse(&raw).map_err(|e| {
            error!(error = %e, "Billing portal returned an invalid URL");
            ClientError::redirect_failure(format!("invalid portal URL: {}", e))
        })?;

        info!(return_url = %return_url, "Redirecting to billing portal");
        self.navigator.redirect(&target);
        Ok(target)
    }
}
