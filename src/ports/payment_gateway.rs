//! Payment gateway port.
//!
//! The gateway is reached by redirecting the customer's browser, so both
//! operations are pure computations: build a signed redirect URL, and check
//! a signed callback query. No network calls are involved.

use crate::domain::foundation::{PaymentId, Timestamp};
use crate::domain::payment::{GatewayResponseCode, PaymentError, PaymentStatus};
use serde::{Deserialize, Serialize};

/// Port for redirect-style payment gateways.
pub trait PaymentGateway: Send + Sync {
    /// Builds the signed URL the customer is redirected to.
    fn create_payment_url(&self, request: &PaymentUrlRequest)
        -> Result<PaymentRedirect, PaymentError>;

    /// Verifies and parses a callback query string.
    ///
    /// `raw_query` is the query exactly as received, without the leading `?`.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` if the signature is missing or does not match
    /// - `ValidationFailed` if a required field is missing or malformed
    fn verify_callback(&self, raw_query: &str) -> Result<GatewayCallback, PaymentError>;
}

/// Input for one redirect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUrlRequest {
    pub payment_id: PaymentId,
    /// Amount in VND.
    pub amount: i64,
    pub order_info: String,
    /// Customer IP as seen by the service.
    pub client_ip: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    /// Preselected bank, if the customer chose one.
    pub bank_code: Option<String>,
}

/// Signed redirect ready to hand to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRedirect {
    pub url: String,
}

/// Verified callback contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCallback {
    pub txn_ref: String,
    /// Amount in VND.
    pub amount: i64,
    pub response_code: GatewayResponseCode,
    pub transaction_status: Option<String>,
    pub gateway_transaction_no: Option<String>,
    pub bank_code: Option<String>,
}

impl GatewayCallback {
    /// Status the payment settles to for this callback.
    pub fn settled_status(&self) -> PaymentStatus {
        self.response_code
            .settled_status(self.transaction_status.as_deref())
    }
}
