//! Payment repository port.
//!
//! Persists and loads `Payment` aggregates. Implementations translate storage
//! failures into `DomainError` with `ErrorCode::DatabaseError` and report a
//! missing row on update as `ErrorCode::PaymentNotFound`.
//!
//! Settling is compare-and-set: `update_if_pending` only writes while the
//! stored payment is still `pending`, so a sweep and a callback (or two
//! callbacks) working from the same snapshot cannot overwrite each other.
//!
//! # Example
//!
//! ```ignore
//! async fn settle_by_ref(
//!     repo: &dyn PaymentRepository,
//!     txn_ref: &str,
//!     settlement: Settlement,
//! ) -> Result<(), DomainError> {
//!     let mut payment = repo
//!         .find_by_txn_ref(txn_ref)
//!         .await?
//!         .ok_or_else(|| DomainError::new(ErrorCode::PaymentNotFound, txn_ref))?;
//!     payment.settle(settlement, Timestamp::now())?;
//!     repo.update_if_pending(&payment).await
//! }
//! ```

use crate::domain::foundation::{DomainError, PaymentId, Timestamp};
use crate::domain::payment::Payment;
use async_trait::async_trait;

/// Repository port for Payment aggregate persistence.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Save a new payment.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure or duplicate id
    async fn save(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Writes a status change, provided the stored payment is still pending.
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` if the payment doesn't exist
    /// - `PaymentAlreadyFinalized` if the stored payment already left `pending`
    /// - `DatabaseError` on persistence failure
    async fn update_if_pending(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Find a payment by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    /// Find a payment by the merchant transaction reference sent to the gateway.
    async fn find_by_txn_ref(&self, txn_ref: &str) -> Result<Option<Payment>, DomainError>;

    /// Pending payments whose `expires_at` is before `cutoff`.
    async fn find_pending_expired_before(
        &self,
        cutoff: &Timestamp,
    ) -> Result<Vec<Payment>, DomainError>;
}
