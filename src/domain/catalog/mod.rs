//! Catalog domain module.
//!
//! - `tier` - a purchasable subscription level
//! - `tier_catalog` - the ordered, uniquely keyed list of tiers

mod tier_catalog;
mod tier;

pub use tier_catalog::TierCatalog;
pub use tier::Tier;
