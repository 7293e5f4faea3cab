//! ExpirePendingPaymentsHandler - Command handler for the expiry sweep.
//!
//! A payment is only expired once its window plus a grace period has passed.
//! The gateway's `vnp_ExpireDate` is the payment's own deadline, so a result
//! for a payment completed at the last moment can arrive after it.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::payment::PaymentError;
use crate::ports::PaymentRepository;

/// Command to expire every pending payment whose window closed before `now`,
/// less the handler's grace period.
#[derive(Debug, Clone, Copy)]
pub struct ExpirePendingPaymentsCommand {
    pub now: Timestamp,
}

/// Result of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirePendingPaymentsResult {
    pub expired: usize,
}

/// Handler for expiring abandoned payments.
pub struct ExpirePendingPaymentsHandler {
    repository: Arc<dyn PaymentRepository>,
    grace_minutes: i64,
}

impl ExpirePendingPaymentsHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>, grace_minutes: i64) -> Self {
        Self {
            repository,
            grace_minutes,
        }
    }

    pub async fn handle(
        &self,
        cmd: ExpirePendingPaymentsCommand,
    ) -> Result<ExpirePendingPaymentsResult, PaymentError> {
        let cutoff = cmd.now.plus_minutes(-self.grace_minutes);
        let overdue = self.repository.find_pending_expired_before(&cutoff).await?;

        let mut expired = 0;
        for mut payment in overdue {
            if payment.expire(cmd.now).is_err() {
                continue;
            }
            match self.repository.update_if_pending(&payment).await {
                Ok(()) => {}
                Err(e) if e.code == ErrorCode::PaymentAlreadyFinalized => {
                    tracing::debug!(
                        payment_id = %payment.id,
                        "Payment settled before it could be expired"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
            expired += 1;
            tracing::debug!(payment_id = %payment.id, "Payment expired");
        }

        if expired > 0 {
            tracing::info!(expired, "Expired pending payments");
        }

        Ok(ExpirePendingPaymentsResult { expired })
    }
}
