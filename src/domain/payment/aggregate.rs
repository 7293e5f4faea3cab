//! Payment aggregate entity.
//!
//! One `Payment` per checkout attempt for a course. It is created `Pending`
//! when the redirect URL is issued and settled once from a verified gateway
//! callback (or expired by the sweeper).
//!
//! Amounts are whole VND as `i64`; the gateway's ×100 wire encoding is an
//! adapter concern.

use crate::domain::foundation::{
    CourseId, PaymentId, StateMachine, Timestamp, UserId, ValidationError,
};
use serde::{Deserialize, Serialize};

use super::{PaymentError, PaymentStatus};

/// Smallest amount the gateway accepts, in VND.
pub const MIN_AMOUNT: i64 = 5_000;

/// Largest amount the gateway accepts, in VND.
pub const MAX_AMOUNT: i64 = 999_999_999;

/// Maximum length of the order description sent to the gateway.
pub const MAX_ORDER_INFO_LEN: usize = 255;

/// Gateway-side details recorded when a payment settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub status: PaymentStatus,
    pub response_code: String,
    pub gateway_transaction_no: Option<String>,
    pub bank_code: Option<String>,
}

/// Payment aggregate.
///
/// # Invariants
///
/// - `amount` within `MIN_AMOUNT..=MAX_AMOUNT`
/// - `order_info` non-empty, at most `MAX_ORDER_INFO_LEN` chars
/// - status changes follow [`PaymentStatus`] transitions
/// - `expires_at` is after `created_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    /// Amount in VND.
    pub amount: i64,
    pub order_info: String,
    pub status: PaymentStatus,
    /// Gateway transaction number, set on settlement.
    pub gateway_transaction_no: Option<String>,
    pub bank_code: Option<String>,
    /// Raw gateway response code, set on settlement.
    pub response_code: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Payment {
    /// Creates a pending payment.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an out-of-range amount, an empty or
    /// overlong order description, or a non-positive expiry window.
    pub fn create(
        id: PaymentId,
        user_id: UserId,
        course_id: CourseId,
        amount: i64,
        order_info: impl Into<String>,
        now: Timestamp,
        expire_minutes: i64,
    ) -> Result<Self, ValidationError> {
        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
            return Err(ValidationError::out_of_range(
                "amount", MIN_AMOUNT, MAX_AMOUNT, amount,
            ));
        }

        let order_info = order_info.into().trim().to_string();
        if order_info.is_empty() {
            return Err(ValidationError::empty_field("order_info"));
        }
        if order_info.chars().count() > MAX_ORDER_INFO_LEN {
            return Err(ValidationError::invalid_format(
                "order_info",
                format!("must be at most {} characters", MAX_ORDER_INFO_LEN),
            ));
        }

        if expire_minutes <= 0 {
            return Err(ValidationError::out_of_range(
                "expire_minutes",
                1,
                i64::MAX,
                expire_minutes,
            ));
        }

        Ok(Self {
            id,
            user_id,
            course_id,
            amount,
            order_info,
            status: PaymentStatus::Pending,
            gateway_transaction_no: None,
            bank_code: None,
            response_code: None,
            created_at: now,
            updated_at: now,
            expires_at: now.plus_minutes(expire_minutes),
        })
    }

    /// Merchant transaction reference for the gateway.
    pub fn txn_ref(&self) -> String {
        self.id.txn_ref()
    }

    /// Returns true if the payment is still pending past its window.
    pub fn is_overdue(&self, now: &Timestamp) -> bool {
        self.status == PaymentStatus::Pending && now.is_after(&self.expires_at)
    }

    /// Applies a verified gateway result.
    ///
    /// # Errors
    ///
    /// - `AlreadyFinalized` if the payment left `Pending` earlier
    /// - `InvalidState` if the settlement status is not reachable
    pub fn settle(&mut self, settlement: Settlement, now: Timestamp) -> Result<(), PaymentError> {
        if self.status.is_final() {
            return Err(PaymentError::already_finalized(self.id));
        }
        self.status = self.status.transition_to(settlement.status).map_err(|_| {
            PaymentError::invalid_state(self.status.to_string(), settlement.status.to_string())
        })?;
        self.response_code = Some(settlement.response_code);
        self.gateway_transaction_no = settlement.gateway_transaction_no;
        self.bank_code = settlement.bank_code;
        self.updated_at = now;
        Ok(())
    }

    /// Marks a pending payment as expired.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyFinalized` if the payment is no longer pending.
    pub fn expire(&mut self, now: Timestamp) -> Result<(), PaymentError> {
        if self.status.is_final() {
            return Err(PaymentError::already_finalized(self.id));
        }
        self.status = PaymentStatus::Expired;
        self.updated_at = now;
        Ok(())
    }
}
