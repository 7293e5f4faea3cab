//! Payment status state machine.
//!
//! A payment starts `Pending` and settles exactly once. Every settled state
//! is terminal; a retry is a new payment.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a single payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Redirect issued, waiting for the gateway callback.
    Pending,

    /// Gateway confirmed the charge.
    Success,

    /// Gateway declined or errored.
    Failed,

    /// Customer abandoned the payment on the gateway page.
    Cancelled,

    /// Payment window closed without a result.
    Expired,
}

impl PaymentStatus {
    /// Storage / wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Expired => "expired",
        }
    }

    /// Returns true once the payment can no longer change.
    pub fn is_final(&self) -> bool {
        self.is_terminal()
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Pending, Success) | (Pending, Failed) | (Pending, Cancelled) | (Pending, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Success, Failed, Cancelled, Expired],
            Success | Failed | Cancelled | Expired => vec![],
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "success" => Ok(PaymentStatus::Success),
            "failed" => Ok(PaymentStatus::Failed),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            "expired" => Ok(PaymentStatus::Expired),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown payment status '{}'", other),
            )),
        }
    }
}
