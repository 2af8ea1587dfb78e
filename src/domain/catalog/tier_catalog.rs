//! Ordered tier catalog.

use std::collections::HashSet;

use crate::domain::foundation::{PlanName, ValidationError};

use super::Tier;

/// The provider's list of purchasable tiers, in display order.
///
/// Order is significant: it is the rendering order and drives the positional
/// "popular" fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierCatalog {
    tiers: Vec<Tier>,
}

impl TierCatalog {
    /// Builds a catalog, rejecting duplicate names and invalid prices.
    pub fn new(tiers: Vec<Tier>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(tiers.len());
        for tier in &tiers {
            tier.validate()?;
            if !seen.insert(tier.name.as_str()) {
                return Err(ValidationError::duplicate("tier", tier.name.as_str()));
            }
        }
        Ok(Self { tiers })
    }

    /// A catalog with no tiers.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Looks up a tier by plan name.
    pub fn get(&self, name: &PlanName) -> Option<&Tier> {
        self.tiers.iter().find(|t| &t.name == name)
    }

    /// Whether the tier at `index` should carry the "popular" badge.
    ///
    /// A tier is popular when flagged, and the middle tier (`len / 2`) is
    /// popular regardless of flags.
    pub fn is_popular(&self, index: usize) -> bool {
        match self.tiers.get(index) {
            Some(tier) => tier.popular.unwrap_or(false) || index == self.tiers.len() / 2,
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a TierCatalog {
    type Item = &'a Tier;
    type IntoIter = std::slice::Iter<'a, Tier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Allowance;

    fn tier(name: &str, price: f64) -> Tier {
        Tier::new(PlanName::new(name).unwrap(), price, Allowance::Limited(100), "").unwrap()
    }

    #[test]
    fn preserves_order() {
        let catalog =
            TierCatalog::new(vec![tier("free", 0.0), tier("pro", 20.0), tier("team", 50.0)])
                .unwrap();
        let names: Vec<_> = catalog.tiers().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["free", "pro", "team"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = TierCatalog::new(vec![tier("pro", 20.0), tier("pro", 25.0)]);
        assert!(matches!(result, Err(ValidationError::Duplicate { .. })));
    }

    #[test]
    fn rejects_invalid_price() {
        let mut bad = tier("pro", 20.0);
        bad.price = -3.0;
        assert!(TierCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn get_finds_by_name() {
        let catalog = TierCatalog::new(vec![tier("free", 0.0), tier("pro", 20.0)]).unwrap();
        let pro = catalog.get(&PlanName::new("pro").unwrap()).unwrap();
        assert_eq!(pro.price, 20.0);
        assert!(catalog.get(&PlanName::new("gold").unwrap()).is_none());
    }

    #[test]
    fn middle_tier_is_popular_without_flags() {
        let catalog =
            TierCatalog::new(vec![tier("free", 0.0), tier("pro", 20.0), tier("team", 50.0)])
                .unwrap();
        assert!(!catalog.is_popular(0));
        assert!(catalog.is_popular(1));
        assert!(!catalog.is_popular(2));
    }

    #[test]
    fn two_tier_catalog_marks_second_popular() {
        let catalog = TierCatalog::new(vec![tier("free", 0.0), tier("pro", 20.0)]).unwrap();
        assert!(!catalog.is_popular(0));
        assert!(catalog.is_popular(1));
    }

    #[test]
    fn flagged_tier_is_popular_alongside_middle_tier() {
        let catalog = TierCatalog::new(vec![
            tier("free", 0.0).with_popular(true),
            tier("pro", 20.0),
            tier("team", 50.0),
        ])
        .unwrap();
        assert!(catalog.is_popular(0));
        assert!(catalog.is_popular(1));
        assert!(!catalog.is_popular(2));
    }

    #[test]
    fn explicit_false_does_not_hide_middle_tier() {
        let catalog = TierCatalog::new(vec![
            tier("free", 0.0),
            tier("pro", 20.0).with_popular(false),
            tier("team", 50.0).with_popular(true),
        ])
        .unwrap();
        assert!(!catalog.is_popular(0));
        assert!(catalog.is_popular(1));
        assert!(catalog.is_popular(2));
    }

    #[test]
    fn out_of_range_index_is_not_popular() {
        assert!(!TierCatalog::empty().is_popular(0));
    }
}
