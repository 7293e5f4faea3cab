//! Payment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | InvalidSignature | 401 |
//! | AmountMismatch | 400 |
//! | AlreadyFinalized | 409 |
//! | InvalidState | 409 |
//! | ValidationFailed | 400 |
//! | Configuration | 500 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, ValidationError};

/// Errors raised while preparing a signer.
///
/// A signature mismatch is not represented here; verification reports it
/// as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// Signing key missing or blank. Signing with it would yield a forgeable
    /// signature, so this is fatal misconfiguration.
    #[error("Payment signing key is missing or empty")]
    MissingKey,
}

/// Payment lifecycle and gateway errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Payment was not found.
    NotFound(String),

    /// Callback signature did not match.
    InvalidSignature,

    /// Callback amount differs from the stored payment amount.
    AmountMismatch { expected: i64, actual: i64 },

    /// Payment already reached a terminal status.
    AlreadyFinalized(PaymentId),

    /// Invalid state for the requested operation.
    InvalidState { current: String, attempted: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Gateway or signer misconfiguration.
    Configuration(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl PaymentError {
    pub fn not_found(reference: impl Into<String>) -> Self {
        PaymentError::NotFound(reference.into())
    }

    pub fn invalid_signature() -> Self {
        PaymentError::InvalidSignature
    }

    pub fn amount_mismatch(expected: i64, actual: i64) -> Self {
        PaymentError::AmountMismatch { expected, actual }
    }

    pub fn already_finalized(id: PaymentId) -> Self {
        PaymentError::AlreadyFinalized(id)
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        PaymentError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        PaymentError::Configuration(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PaymentError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PaymentError::NotFound(_) => ErrorCode::PaymentNotFound,
            PaymentError::InvalidSignature => ErrorCode::InvalidSignature,
            PaymentError::AmountMismatch { .. } => ErrorCode::AmountMismatch,
            PaymentError::AlreadyFinalized(_) => ErrorCode::PaymentAlreadyFinalized,
            PaymentError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            PaymentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PaymentError::Configuration(_) => ErrorCode::ConfigurationError,
            PaymentError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a human-readable message.
    pub fn message(&self) -> String {
        match self {
            PaymentError::NotFound(reference) => format!("Payment not found: {}", reference),
            PaymentError::InvalidSignature => "Invalid payment signature".to_string(),
            PaymentError::AmountMismatch { expected, actual } => {
                format!("Amount mismatch: expected {}, got {}", expected, actual)
            }
            PaymentError::AlreadyFinalized(id) => {
                format!("Payment {} has already been finalized", id)
            }
            PaymentError::InvalidState { current, attempted } => {
                format!("Cannot {} payment in {} state", attempted, current)
            }
            PaymentError::ValidationFailed { field, message } => {
                format!("Validation failed for {}: {}", field, message)
            }
            PaymentError::Configuration(msg) => format!("Payment misconfigured: {}", msg),
            PaymentError::Infrastructure(msg) => format!("Infrastructure error: {}", msg),
        }
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PaymentError {}

impl From<SigningError> for PaymentError {
    fn from(err: SigningError) -> Self {
        PaymentError::Configuration(err.to_string())
    }
}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyField { field } => {
                PaymentError::validation(field, "cannot be empty")
            }
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => PaymentError::validation(
                field,
                format!("must be between {} and {}, got {}", min, max, actual),
            ),
            ValidationError::InvalidFormat { field, reason } => {
                PaymentError::validation(field, reason)
            }
        }
    }
}

impl From<DomainError> for PaymentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::PaymentNotFound => PaymentError::NotFound(err.message),
            _ => PaymentError::Infrastructure(err.to_string()),
        }
    }
}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
