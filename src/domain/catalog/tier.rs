//! Purchasable tier definitions.
//!
//! Tiers come from the provider's product catalog; nothing about them is
//! hard-coded here except the rule for what counts as the free tier.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Allowance, PlanName, ValidationError};

/// A subscription level offered by the provider.
///
/// Field names on the wire follow the provider (`displayName`, `priceId`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    /// Unique key within the catalog.
    pub name: PlanName,

    /// Human-friendly name, falls back to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Monthly price in the provider's currency.
    pub price: f64,

    /// Monthly consumption quota.
    pub limit: Allowance,

    /// Provider price reference passed through to checkout.
    #[serde(rename = "priceId", default)]
    pub price_ref: String,

    /// Marketing feature bullets, in display order.
    #[serde(default)]
    pub features: Vec<String>,

    /// Explicit "popular" flag set in the provider dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popular: Option<bool>,
}

impl Tier {
    /// Creates a tier, validating the price.
    pub fn new(
        name: PlanName,
        price: f64,
        limit: Allowance,
        price_ref: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let tier = Self {
            name,
            display_name: None,
            price,
            limit,
            price_ref: price_ref.into(),
            features: Vec::new(),
            popular: None,
        };
        tier.validate()?;
        Ok(tier)
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the feature list.
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the explicit popular flag.
    pub fn with_popular(mut self, popular: bool) -> Self {
        self.popular = Some(popular);
        self
    }

    /// Selecting a free tier is not a purchase.
    pub fn is_free(&self) -> bool {
        self.price == 0.0 || self.name.is_free()
    }

    /// Name to show the user.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.name.as_str())
    }

    /// Checks the invariants the provider is trusted to uphold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.price.is_finite() {
            return Err(ValidationError::invalid_format("price", "must be a finite number"));
        }
        if self.price < 0.0 {
            return Err(ValidationError::negative("price", self.price));
        }
        Ok(())
    }
}
