//! State machine trait for phase enums.
//!
//! Gives view-level flows (checkout selection, catalog loading) one way to
//! declare their legal transitions and get validated transitions for free.

use super::ValidationError;

/// Trait for phase enums that represent state machines.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for CheckoutPhase {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Idle, Upgrading) | (Upgrading, Redirecting))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Idle => vec![Upgrading],
///             // ...
///         }
///     }
/// }
///
/// let next = phase.transition_to(CheckoutPhase::Upgrading)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
