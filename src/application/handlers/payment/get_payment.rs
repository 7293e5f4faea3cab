//! GetPaymentHandler - Query handler for a single payment.

use std::sync::Arc;

use crate::domain::foundation::{PaymentId, UserId};
use crate::domain::payment::{Payment, PaymentError};
use crate::ports::PaymentRepository;

/// Query for one payment owned by `user_id`.
#[derive(Debug, Clone)]
pub struct GetPaymentQuery {
    pub payment_id: PaymentId,
    pub user_id: UserId,
}

pub type GetPaymentResult = Payment;

/// Handler for loading a payment.
///
/// A payment owned by someone else is reported as not found.
pub struct GetPaymentHandler {
    repository: Arc<dyn PaymentRepository>,
}

impl GetPaymentHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetPaymentQuery) -> Result<GetPaymentResult, PaymentError> {
        let payment = self
            .repository
            .find_by_id(&query.payment_id)
            .await?
            .filter(|p| p.user_id == query.user_id)
            .ok_or_else(|| PaymentError::not_found(query.payment_id.to_string()))?;

        Ok(payment)
    }
}
