//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! These types define the JSON request/response structure for the payment API.
//! They serve as the boundary between HTTP and the application layer.

use crate::domain::foundation::CourseId;
use crate::domain::payment::{Payment, PaymentStatus};
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a payment for a course.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub course_id: CourseId,
    /// Amount in VND.
    pub amount: i64,
    /// Description shown on the gateway page.
    pub order_info: String,
    /// Preselected bank code (skips the gateway's bank picker).
    #[serde(default)]
    pub bank_code: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response after a payment was created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    pub payment_id: String,
    /// Signed gateway URL the browser should be sent to.
    pub payment_url: String,
}

/// Payment details for API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: String,
    pub course_id: String,
    pub amount: i64,
    pub order_info: String,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_transaction_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub expires_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            course_id: payment.course_id.to_string(),
            amount: payment.amount,
            order_info: payment.order_info,
            status: payment.status,
            gateway_transaction_no: payment.gateway_transaction_no,
            bank_code: payment.bank_code,
            response_code: payment.response_code,
            created_at: payment.created_at.as_datetime().to_rfc3339(),
            updated_at: payment.updated_at.as_datetime().to_rfc3339(),
            expires_at: payment.expires_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Outcome shown to the customer after the gateway redirects back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReturnResponse {
    pub success: bool,
    pub status: PaymentStatus,
    pub payment_id: String,
    pub message: String,
}

/// Body the gateway expects in reply to an IPN call.
///
/// The gateway retries until it receives `00` or `02`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpnResponse {
    #[serde(rename = "RspCode")]
    pub rsp_code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl IpnResponse {
    fn new(code: &str, message: &str) -> Self {
        Self {
            rsp_code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn confirmed() -> Self {
        Self::new("00", "Confirm Success")
    }

    pub fn order_not_found() -> Self {
        Self::new("01", "Order not found")
    }

    pub fn already_confirmed() -> Self {
        Self::new("02", "Order already confirmed")
    }

    pub fn invalid_amount() -> Self {
        Self::new("04", "Invalid amount")
    }

    pub fn invalid_signature() -> Self {
        Self::new("97", "Invalid signature")
    }

    pub fn unknown_error() -> Self {
        Self::new("99", "Unknown error")
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
