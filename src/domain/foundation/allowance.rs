//! Quota allowance value object.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::ValidationError;

/// A quota amount that may be unbounded.
///
/// Used for a tier's monthly limit and for a usage snapshot's limit and
/// remaining balance. On the wire the provider sends a non-negative integer,
/// `-1`, or the string `"unlimited"`; the last two both mean [`Allowance::Unlimited`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Allowance {
    Limited(u64),
    Unlimited,
}

impl Allowance {
    /// Wire sentinel for an unlimited allowance.
    pub const UNLIMITED_SENTINEL: i64 = -1;

    /// Converts the provider's integer form.
    pub fn from_wire(value: i64) -> Result<Self, ValidationError> {
        match value {
            Self::UNLIMITED_SENTINEL => Ok(Allowance::Unlimited),
            v if v >= 0 => Ok(Allowance::Limited(v as u64)),
            v => Err(ValidationError::negative("allowance", v)),
        }
    }

    /// Returns true when no bound applies.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Allowance::Unlimited)
    }

    /// Returns the bound, if any.
    pub fn limit(&self) -> Option<u64> {
        match self {
            Allowance::Limited(n) => Some(*n),
            Allowance::Unlimited => None,
        }
    }

    /// Returns true for a limited allowance with nothing left.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Allowance::Limited(0))
    }
}

impl Default for Allowance {
    fn default() -> Self {
        Allowance::Unlimited
    }
}

impl fmt::Display for Allowance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allowance::Limited(n) => write!(f, "{}", n),
            Allowance::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl Serialize for Allowance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Allowance::Limited(n) => serializer.serialize_u64(*n),
            Allowance::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

impl<'de> Deserialize<'de> for Allowance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Count(i64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Count(n) => Allowance::from_wire(n).map_err(de::Error::custom),
            Wire::Text(s) if s.eq_ignore_ascii_case("unlimited") => Ok(Allowance::Unlimited),
            Wire::Text(s) => s
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid allowance '{}'", s)))
                .and_then(|n| Allowance::from_wire(n).map_err(de::Error::custom)),
        }
    }
}
