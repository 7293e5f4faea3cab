//! HandlePaymentCallbackHandler - Command handler for gateway callbacks.
//!
//! Serves both the browser return URL and the server-to-server IPN. The
//! gateway may deliver both for the same payment, in either order, so a
//! callback for an already-settled payment is reported rather than failed.
//! The same holds when another writer settles the payment between the load
//! and the conditional write.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::payment::{GatewayResponseCode, Payment, PaymentError, Settlement};
use crate::ports::{PaymentGateway, PaymentRepository};

/// Command carrying the raw callback query string.
#[derive(Debug, Clone)]
pub struct HandlePaymentCallbackCommand {
    pub raw_query: String,
}

/// Result of callback processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentCallbackResult {
    /// This callback settled the payment.
    Settled {
        payment: Payment,
        response_code: GatewayResponseCode,
    },
    /// The payment had already been settled by an earlier callback.
    AlreadySettled { payment: Payment },
}

impl HandlePaymentCallbackResult {
    pub fn payment(&self) -> &Payment {
        match self {
            Self::Settled { payment, .. } | Self::AlreadySettled { payment } => payment,
        }
    }
}

/// Handler for verified gateway callbacks.
pub struct HandlePaymentCallbackHandler {
    repository: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl HandlePaymentCallbackHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            repository,
            gateway,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentCallbackCommand,
    ) -> Result<HandlePaymentCallbackResult, PaymentError> {
        // 1. Verify signature and parse fields
        let callback = self.gateway.verify_callback(&cmd.raw_query)?;

        // 2. Load the payment the gateway refers to
        let mut payment = self
            .repository
            .find_by_txn_ref(&callback.txn_ref)
            .await?
            .ok_or_else(|| PaymentError::not_found(callback.txn_ref.clone()))?;

        // 3. The charged amount must match what we asked for
        if callback.amount != payment.amount {
            tracing::warn!(
                payment_id = %payment.id,
                expected = payment.amount,
                actual = callback.amount,
                "Callback amount mismatch"
            );
            return Err(PaymentError::amount_mismatch(payment.amount, callback.amount));
        }

        // 4. Idempotency: a settled payment is never changed again
        if payment.status.is_final() {
            tracing::debug!(
                payment_id = %payment.id,
                status = %payment.status,
                "Callback for already settled payment"
            );
            return Ok(HandlePaymentCallbackResult::AlreadySettled { payment });
        }

        // 5. Apply the gateway's verdict
        let status = callback.settled_status();
        payment.settle(
            Settlement {
                status,
                response_code: callback.response_code.to_string(),
                gateway_transaction_no: callback.gateway_transaction_no.clone(),
                bank_code: callback.bank_code.clone(),
            },
            Timestamp::now(),
        )?;
        match self.repository.update_if_pending(&payment).await {
            Ok(()) => {}
            Err(e) if e.code == ErrorCode::PaymentAlreadyFinalized => {
                let current = self
                    .repository
                    .find_by_id(&payment.id)
                    .await?
                    .ok_or_else(|| PaymentError::not_found(callback.txn_ref.clone()))?;
                tracing::info!(
                    payment_id = %current.id,
                    status = %current.status,
                    "Payment settled concurrently, callback not applied"
                );
                return Ok(HandlePaymentCallbackResult::AlreadySettled { payment: current });
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            payment_id = %payment.id,
            status = %status,
            response_code = %callback.response_code,
            gateway_transaction_no = ?callback.gateway_transaction_no,
            "Payment settled"
        );

        Ok(HandlePaymentCallbackResult::Settled {
            payment,
            response_code: callback.response_code,
        })
    }
}
