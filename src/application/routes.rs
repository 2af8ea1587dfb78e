//! In-app paths the client navigates between.

/// Paths of the pages the client sends the user to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePaths {
    /// Public landing page; signed-out users are sent here.
    pub landing: String,

    /// Signed-in home; checkout success returns here.
    pub dashboard: String,

    /// Plan picker; checkout cancel returns here.
    pub choose_plan: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            landing: "/".to_string(),
            dashboard: "/dashboard".to_string(),
            choose_plan: "/choose-plan".to_string(),
        }
    }
}
