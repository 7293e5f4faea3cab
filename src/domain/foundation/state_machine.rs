//! State machine trait for status enums.
//!
//! Lifecycle enums (payment status today) declare their allowed edges once
//! and get validated transitions from the default methods.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for PaymentStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Pending, Success) | (Pending, Failed))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Pending => vec![Success, Failed],
///             _ => vec![],
///         }
///     }
/// }
///
/// let next = PaymentStatus::Pending.transition_to(PaymentStatus::Success)?;
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
                "status",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
