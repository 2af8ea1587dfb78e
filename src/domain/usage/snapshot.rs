//! Usage snapshot as reported by the provider.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Allowance, PlanName};

/// Current-period consumption for the signed-in user.
///
/// Always taken from the provider; the client never increments `count`
/// itself, it refetches after a tracked event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    /// Events recorded this period.
    #[serde(rename = "usageCount", alias = "count", default)]
    pub count: u64,

    /// Period quota.
    #[serde(default)]
    pub limit: Allowance,

    /// Quota left this period.
    #[serde(default)]
    pub remaining: Allowance,

    /// Plan the quota belongs to.
    #[serde(default)]
    pub plan: PlanName,
}

impl UsageSnapshot {
    pub fn new(count: u64, limit: Allowance, remaining: Allowance, plan: PlanName) -> Self {
        Self {
            count,
            limit,
            remaining,
            plan,
        }
    }

    /// True when a limited quota has nothing left.
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_exhausted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_provider_payload() {
        let usage: UsageSnapshot = serde_json::from_value(json!({
            "usageCount": 100,
            "limit": 100,
            "remaining": 0,
            "plan": "free"
        }))
        .unwrap();

        assert_eq!(usage.count, 100);
        assert_eq!(usage.limit, Allowance::Limited(100));
        assert_eq!(usage.remaining, Allowance::Limited(0));
        assert!(usage.plan.is_free());
        assert!(usage.is_exhausted());
    }

    #[test]
    fn zero_remaining_is_not_mistaken_for_unlimited() {
        let usage: UsageSnapshot =
            serde_json::from_value(json!({"usageCount": 5, "limit": 5, "remaining": 0})).unwrap();
        assert_eq!(usage.remaining, Allowance::Limited(0));
    }

    #[test]
    fn missing_fields_fall_back() {
        let usage: UsageSnapshot = serde_json::from_value(json!({})).unwrap();
        assert_eq!(usage.count, 0);
        assert_eq!(usage.limit, Allowance::Unlimited);
        assert_eq!(usage.remaining, Allowance::Unlimited);
        assert!(usage.plan.is_free());
    }

    #[test]
    fn accepts_count_alias() {
        let usage: UsageSnapshot =
            serde_json::from_value(json!({"count": 3, "limit": "unlimited", "plan": "pro"}))
                .unwrap();
        assert_eq!(usage.count, 3);
        assert!(usage.limit.is_unlimited());
        assert!(!usage.is_exhausted());
    }
}
