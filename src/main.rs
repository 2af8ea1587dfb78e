//! Plan Gate status check.
//!
//! Connects to the configured provider the way a page would, then logs what
//! the client sees: readiness, sign-in state, the tier catalog and usage.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use plan_gate::adapters::{HttpProvider, MemoryNavigator};
use plan_gate::application::{ClientPorts, EntitlementClient};
use plan_gate::config::AppConfig;
use plan_gate::telemetry::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("plan-gate: {}", e);
            return ExitCode::from(2);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("plan-gate: invalid configuration: {}", e);
        return ExitCode::from(2);
    }

    init_tracing(&config.telemetry);

    let (http_config, app_url) = match (config.provider.http_config(), config.routes.app_url()) {
        (Ok(http), Ok(app)) => (http, app),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::from(2);
        }
    };

    let provider = match HttpProvider::new(http_config) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            error!(error = %e, "failed to build provider client");
            return ExitCode::FAILURE;
        }
    };
    let navigator = Arc::new(MemoryNavigator::new(app_url));

    let client = EntitlementClient::new(
        ClientPorts::from_provider(provider, navigator),
        config.client_settings(),
    );
    if let Err(e) = client.mount().await {
        error!(error = %e, "session initialization task failed");
        return ExitCode::FAILURE;
    }

    let state = client.session().wait_ready().await;
    info!(signed_in = state.is_signed_in(), "session ready");

    let load = client.catalog_loader().list_tiers().await;
    match load.error() {
        Some(message) => warn!(error = message, "tier catalog unavailable"),
        None => {
            let catalog = load.catalog();
            for (index, tier) in catalog.tiers().iter().enumerate() {
                info!(
                    tier = %tier.name,
                    price = tier.price,
                    limit = %tier.limit,
                    popular = catalog.is_popular(index),
                    "tier"
                );
            }
        }
    }

    if let Some(user) = state.user() {
        info!(user = %user.id, plan = %user.plan, "signed-in user");
        match client.usage_tracker().check_usage().await {
            Ok(usage) => info!(
                count = usage.count,
                limit = %usage.limit,
                remaining = %usage.remaining,
                "usage"
            ),
            Err(e) => warn!(error = %e, code = e.code(), "usage unavailable"),
        }
    }

    ExitCode::SUCCESS
}
