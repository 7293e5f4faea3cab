//! In-memory payment repository.
//!
//! Backs the HTTP and handler tests, and local runs without PostgreSQL.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, Timestamp};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::ports::PaymentRepository;

/// In-memory storage for payments, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentRepository {
    payments: Arc<RwLock<HashMap<PaymentId, Payment>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payments
    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payments.read().await.is_empty()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&payment.id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Payment already exists: {}", payment.id),
            ));
        }
        payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn update_if_pending(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = self.payments.write().await;
        match payments.get_mut(&payment.id) {
            Some(stored) if stored.status != PaymentStatus::Pending => Err(DomainError::new(
                ErrorCode::PaymentAlreadyFinalized,
                format!("Payment already finalized: {}", payment.id),
            )),
            Some(stored) => {
                *stored = payment.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment not found: {}", payment.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.payments.read().await.get(id).cloned())
    }

    async fn find_by_txn_ref(&self, txn_ref: &str) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .payments
            .read()
            .await
            .values()
            .find(|p| p.txn_ref() == txn_ref)
            .cloned())
    }

    async fn find_pending_expired_before(
        &self,
        cutoff: &Timestamp,
    ) -> Result<Vec<Payment>, DomainError> {
        let mut expired: Vec<Payment> = self
            .payments
            .read()
            .await
            .values()
            .filter(|p| p.status == PaymentStatus::Pending && p.expires_at.is_before(cutoff))
            .cloned()
            .collect();
        expired.sort_by_key(|p| p.expires_at);
        Ok(expired)
    }
}
