//! Gateway response codes and the payment status they settle to.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PaymentStatus;

/// Two-digit `vnp_ResponseCode` reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayResponseCode(String);

impl GatewayResponseCode {
    pub const SUCCESS: &'static str = "00";
    pub const SUSPECTED_FRAUD: &'static str = "07";
    pub const TIMED_OUT: &'static str = "11";
    pub const CANCELLED_BY_CUSTOMER: &'static str = "24";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_success(&self) -> bool {
        self.0 == Self::SUCCESS
    }

    /// Status a pending payment moves to for this code.
    ///
    /// `transaction_status` (`vnp_TransactionStatus`) is only present on
    /// some callbacks; when present it must also be `00` for a success.
    pub fn settled_status(&self, transaction_status: Option<&str>) -> PaymentStatus {
        match self.0.as_str() {
            Self::SUCCESS => match transaction_status {
                None | Some(Self::SUCCESS) => PaymentStatus::Success,
                Some(_) => PaymentStatus::Failed,
            },
            Self::CANCELLED_BY_CUSTOMER => PaymentStatus::Cancelled,
            Self::TIMED_OUT => PaymentStatus::Expired,
            _ => PaymentStatus::Failed,
        }
    }

    /// Short English description for logs and API responses.
    pub fn description(&self) -> &'static str {
        match self.0.as_str() {
            "00" => "Transaction successful",
            "07" => "Charged, transaction flagged as suspicious",
            "09" => "Card or account not registered for internet banking",
            "10" => "Card or account verification failed too many times",
            "11" => "Payment window expired",
            "12" => "Card or account is locked",
            "13" => "Wrong one-time password",
            "24" => "Customer cancelled the transaction",
            "51" => "Insufficient balance",
            "65" => "Daily transaction limit exceeded",
            "75" => "Bank under maintenance",
            "79" => "Payment password entered wrong too many times",
            _ => "Transaction failed",
        }
    }
}

impl fmt::Display for GatewayResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
