//! Shared fixtures for payment handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapters::memory::InMemoryPaymentRepository;
use crate::adapters::vnpay::{fields, VnPayConfig, VnPayGateway};
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, PaymentId, Timestamp, UserId,
};
use crate::domain::payment::{sign, ParameterSet, Payment, SigningKey};
use crate::ports::PaymentRepository;

pub const KEY: &str = "secret123";

pub fn gateway() -> Arc<VnPayGateway> {
    Arc::new(VnPayGateway::new(VnPayConfig {
        signing_key: SigningKey::new(KEY).unwrap(),
        merchant_code: "TEST01".to_string(),
        base_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string(),
        return_url: "https://codelab.example/payments/return".to_string(),
        currency_code: "VND".to_string(),
        locale: "vn".to_string(),
        version: "2.1.0".to_string(),
        command: "pay".to_string(),
        order_type: "other".to_string(),
    }))
}

pub fn pending_payment(user: &str, amount: i64) -> Payment {
    Payment::create(
        PaymentId::new(),
        UserId::new(user).unwrap(),
        CourseId::new(),
        amount,
        "Rust fundamentals",
        Timestamp::now(),
        15,
    )
    .unwrap()
}

pub async fn repo_with(payments: &[&Payment]) -> Arc<InMemoryPaymentRepository> {
    let repo = Arc::new(InMemoryPaymentRepository::new());
    for payment in payments {
        repo.save(payment).await.unwrap();
    }
    repo
}

/// Callback query for `txn_ref`, signed with `KEY` the way the gateway does.
pub fn signed_callback(txn_ref: &str, amount_vnd: i64, response_code: &str) -> String {
    let mut params = ParameterSet::new();
    params.add(fields::TMN_CODE, "TEST01");
    params.add(fields::TXN_REF, txn_ref);
    params.add(fields::AMOUNT, (amount_vnd * 100).to_string());
    params.add(fields::RESPONSE_CODE, response_code);
    params.add(fields::TRANSACTION_STATUS, response_code);
    params.add(fields::TRANSACTION_NO, "14123456");
    params.add(fields::BANK_CODE, "NCB");
    let signed = sign("", &params, &SigningKey::new(KEY).unwrap(), fields::SECURE_HASH);
    signed.url.trim_start_matches('?').to_string()
}

/// Repository whose writes always fail.
pub struct FailingPaymentRepository {
    pub attempts: Mutex<u32>,
}

impl FailingPaymentRepository {
    pub fn new() -> Self {
        Self {
            attempts: Mutex::new(0),
        }
    }

    fn fail(&self) -> DomainError {
        *self.attempts.lock().unwrap() += 1;
        DomainError::new(ErrorCode::DatabaseError, "Simulated failure")
    }
}

#[async_trait]
impl PaymentRepository for FailingPaymentRepository {
    async fn save(&self, _payment: &Payment) -> Result<(), DomainError> {
        Err(self.fail())
    }

    async fn update_if_pending(&self, _payment: &Payment) -> Result<(), DomainError> {
        Err(self.fail())
    }

    async fn find_by_id(&self, _id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Err(self.fail())
    }

    async fn find_by_txn_ref(&self, _txn_ref: &str) -> Result<Option<Payment>, DomainError> {
        Err(self.fail())
    }

    async fn find_pending_expired_before(
        &self,
        _cutoff: &Timestamp,
    ) -> Result<Vec<Payment>, DomainError> {
        Err(self.fail())
    }
}
