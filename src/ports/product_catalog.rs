//! Product catalog port. Listing tiers needs no signed-in user.

use async_trait::async_trait;

use super::ProviderError;
use crate::domain::catalog::Tier;

/// Lists the purchasable tiers in display order.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn list_tiers(&self) -> Result<Vec<Tier>, ProviderError>;
}
