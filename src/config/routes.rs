//! In-app route configuration

use serde::Deserialize;
use url::Url;

use super::error::ValidationError;
use super::provider::parse_http_url;
use crate::application::RoutePaths;

/// Where the app lives and which paths the client navigates to.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesConfig {
    /// Origin the app is served from; used to build return URLs
    #[serde(default = "default_app_url")]
    pub app_url: String,

    #[serde(default = "default_landing")]
    pub landing: String,

    #[serde(default = "default_dashboard")]
    pub dashboard: String,

    #[serde(default = "default_choose_plan")]
    pub choose_plan: String,
}

impl RoutesConfig {
    pub fn app_url(&self) -> Result<Url, ValidationError> {
        parse_http_url(&self.app_url).ok_or(ValidationError::InvalidAppUrl)
    }

    pub fn paths(&self) -> RoutePaths {
        RoutePaths {
            landing: self.landing.clone(),
            dashboard: self.dashboard.clone(),
            choose_plan: self.choose_plan.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.app_url()?;
        for path in [&self.landing, &self.dashboard, &self.choose_plan] {
            if !path.starts_with('/') {
                return Err(ValidationError::InvalidRoutePath(path.clone()));
            }
        }
        Ok(())
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            app_url: default_app_url(),
            landing: default_landing(),
            dashboard: default_dashboard(),
            choose_plan: default_choose_plan(),
        }
    }
}

fn default_app_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_landing() -> String {
    "/".to_string()
}

fn default_dashboard() -> String {
    "/dashboard".to_string()
}

fn default_choose_plan() -> String {
    "/choose-plan".to_string()
}
