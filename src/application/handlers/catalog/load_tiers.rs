//! TierCatalogLoader - Query handler for the purchasable tiers.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::catalog::TierCatalog;
use crate::ports::ProductCatalog;

/// Notice shown when the catalog cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load pricing";

/// Terminal result of a catalog load.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLoad {
    Loaded(TierCatalog),
    Failed { message: String },
}

impl CatalogLoad {
    /// Tiers to render; empty after a failure.
    pub fn catalog(&self) -> TierCatalog {
        match self {
            CatalogLoad::Loaded(catalog) => catalog.clone(),
            CatalogLoad::Failed { .. } => TierCatalog::empty(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CatalogLoad::Loaded(_) => None,
            CatalogLoad::Failed { message } => Some(message),
        }
    }
}

/// Catalog as held by a view.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    pub tiers: TierCatalog,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogState {
    pub fn loading() -> Self {
        Self {
            tiers: TierCatalog::empty(),
            loading: true,
            error: None,
        }
    }

    pub fn from_load(load: CatalogLoad) -> Self {
        let error = load.error().map(str::to_string);
        Self {
            tiers: load.catalog(),
            loading: false,
            error,
        }
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::loading()
    }
}

/// Loads tiers from the provider, independent of sign-in state.
pub struct TierCatalogLoader {
    catalog: Arc<dyn ProductCatalog>,
}

impl TierCatalogLoader {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    /// Always settles; failures become an empty catalog plus a notice.
    pub async fn list_tiers(&self) -> CatalogLoad {
        let tiers = match self.catalog.list_tiers().await {
            Ok(tiers) => tiers,
            Err(e) => {
                warn!(error = %e, "Failed to load tiers");
                return CatalogLoad::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
            }
        };

        match TierCatalog::new(tiers) {
            Ok(catalog) => {
                debug!(tiers = catalog.len(), "Tier catalog loaded");
                CatalogLoad::Loaded(catalog)
            }
            Err(e) => {
                warn!(error = %e, "Provider returned an invalid tier catalog");
                CatalogLoad::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}
