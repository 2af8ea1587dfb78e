//! Catalog handlers.
//!
//! ## Queries
//! - Loading the purchasable tiers (no sign-in required)

mod load_tiers;

pub use load_tiers::{CatalogLoad, CatalogState, TierCatalogLoader};
