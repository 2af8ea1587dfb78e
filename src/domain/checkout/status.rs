//! Checkout selection state machine.
//!
//! ```text
//! Idle ──select──> Upgrading ──url──> Redirecting
//!  ^                  │  │
//!  └──free / local────┘  └──error──> Failed ──select──> Upgrading
//!  └──────────────dismiss──────────── Failed
//! ```

use crate::domain::foundation::{PlanName, StateMachine, ValidationError};

/// Phase of the current plan selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Upgrading,
    Redirecting,
    Failed,
}

impl StateMachine for CheckoutPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CheckoutPhase::*;
        matches!(
            (self, target),
            (Idle, Upgrading)
                | (Failed, Upgrading)
                | (Upgrading, Redirecting)
                | (Upgrading, Failed)
                | (Upgrading, Idle)
                | (Failed, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CheckoutPhase::*;
        match self {
            Idle => vec![Upgrading],
            Upgrading => vec![Redirecting, Failed, Idle],
            Failed => vec![Upgrading, Idle],
            Redirecting => vec![],
        }
    }
}

/// Selection state shown by the plan picker.
///
/// At most one tier is in flight at a time; the tier is kept while
/// upgrading or redirecting, the message while failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutStatus {
    phase: CheckoutPhase,
    tier: Option<PlanName>,
    error: Option<String>,
}

impl CheckoutStatus {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The tier currently being purchased.
    pub fn in_flight_tier(&self) -> Option<&PlanName> {
        match self.phase {
            CheckoutPhase::Upgrading | CheckoutPhase::Redirecting => self.tier.as_ref(),
            _ => None,
        }
    }

    /// True while a selection blocks further selections.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self.phase,
            CheckoutPhase::Upgrading | CheckoutPhase::Redirecting
        )
    }

    /// Starts a selection of `tier`.
    pub fn begin(&self, tier: PlanName) -> Result<Self, ValidationError> {
        Ok(Self {
            phase: self.phase.transition_to(CheckoutPhase::Upgrading)?,
            tier: Some(tier),
            error: None,
        })
    }

    /// The provider returned a checkout page and the browser is leaving.
    pub fn redirecting(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            phase: self.phase.transition_to(CheckoutPhase::Redirecting)?,
            tier: self.tier.clone(),
            error: None,
        })
    }

    /// The selection failed; nothing stays in the upgrading state.
    pub fn failed(&self, message: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            phase: self.phase.transition_to(CheckoutPhase::Failed)?,
            tier: None,
            error: Some(message.into()),
        })
    }

    /// Back to idle, after a local navigation or a dismissed error.
    pub fn settle(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            phase: self.phase.transition_to(CheckoutPhase::Idle)?,
            tier: None,
            error: None,
        })
    }
}
