//! CreatePaymentHandler - Command handler for starting a course payment.

use std::sync::Arc;

use crate::domain::foundation::{CourseId, PaymentId, Timestamp, UserId};
use crate::domain::payment::{Payment, PaymentError};
use crate::ports::{PaymentGateway, PaymentRepository, PaymentUrlRequest};

/// Command to start a payment for one course.
#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
    /// Amount in VND.
    pub amount: i64,
    pub order_info: String,
    pub client_ip: String,
    pub bank_code: Option<String>,
}

/// Result of starting a payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentResult {
    pub payment: Payment,
    /// Signed gateway URL to redirect the customer to.
    pub payment_url: String,
}

/// Handler for starting a payment.
///
/// Creates a pending payment and returns the signed gateway URL. The payment
/// is settled later by `HandlePaymentCallbackHandler`.
pub struct CreatePaymentHandler {
    repository: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    expire_minutes: i64,
}

impl CreatePaymentHandler {
    pub fn new(
        repository: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        expire_minutes: i64,
    ) -> Self {
        Self {
            repository,
            gateway,
            expire_minutes,
        }
    }

    pub async fn handle(&self, cmd: CreatePaymentCommand) -> Result<CreatePaymentResult, PaymentError> {
        // 1. Build the pending payment (validates amount and description)
        let payment = Payment::create(
            PaymentId::new(),
            cmd.user_id,
            cmd.course_id,
            cmd.amount,
            cmd.order_info,
            Timestamp::now(),
            self.expire_minutes,
        )?;

        // 2. Sign the redirect; nothing is stored if this fails
        let redirect = self.gateway.create_payment_url(&PaymentUrlRequest {
            payment_id: payment.id,
            amount: payment.amount,
            order_info: payment.order_info.clone(),
            client_ip: cmd.client_ip,
            created_at: payment.created_at,
            expires_at: payment.expires_at,
            bank_code: cmd.bank_code,
        })?;

        // 3. Persist
        self.repository.save(&payment).await?;

        tracing::info!(
            payment_id = %payment.id,
            user_id = %payment.user_id,
            course_id = %payment.course_id,
            amount = payment.amount,
            "Payment created"
        );

        Ok(CreatePaymentResult {
            payment,
            payment_url: redirect.url,
        })
    }
}
