//! PostgreSQL implementation of PaymentRepository.
//!
//! Stores Payment aggregates in the `payments` table (see `migrations/`).

use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, PaymentId, Timestamp, UserId,
};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::ports::PaymentRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, course_id, amount, order_info, txn_ref, status,
           gateway_transaction_no, bank_code, response_code,
           created_at, updated_at, expires_at
    FROM payments
"#;

/// PostgreSQL implementation of the PaymentRepository port.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: String,
    course_id: Uuid,
    amount: i64,
    order_info: String,
    #[allow(dead_code)]
    txn_ref: String,
    status: String,
    gateway_transaction_no: Option<String>,
    bank_code: Option<String>,
    response_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            course_id: CourseId::from_uuid(row.course_id),
            amount: row.amount,
            order_info: row.order_info,
            status: parse_status(&row.status)?,
            gateway_transaction_no: row.gateway_transaction_no,
            bank_code: row.bank_code,
            response_code: row.response_code,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            expires_at: Timestamp::from_datetime(row.expires_at),
        })
    }
}

fn parse_status(s: &str) -> Result<PaymentStatus, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )
    })
}

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, e),
    )
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, user_id, course_id, amount, order_info, txn_ref, status,
                gateway_transaction_no, bank_code, response_code,
                created_at, updated_at, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.user_id.as_str())
        .bind(payment.course_id.as_uuid())
        .bind(payment.amount)
        .bind(&payment.order_info)
        .bind(payment.txn_ref())
        .bind(payment.status.as_str())
        .bind(&payment.gateway_transaction_no)
        .bind(&payment.bank_code)
        .bind(&payment.response_code)
        .bind(payment.created_at.as_datetime())
        .bind(payment.updated_at.as_datetime())
        .bind(payment.expires_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save payment", e))?;

        Ok(())
    }

    async fn update_if_pending(&self, payment: &Payment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                status = $2,
                gateway_transaction_no = $3,
                bank_code = $4,
                response_code = $5,
                updated_at = $6
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.status.as_str())
        .bind(&payment.gateway_transaction_no)
        .bind(&payment.bank_code)
        .bind(&payment.response_code)
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update payment", e))?;

        if result.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM payments WHERE id = $1)")
                    .bind(payment.id.as_uuid())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| db_error("check payment", e))?;

            let error = if exists {
                DomainError::new(
                    ErrorCode::PaymentAlreadyFinalized,
                    format!("Payment already finalized: {}", payment.id),
                )
            } else {
                DomainError::new(
                    ErrorCode::PaymentNotFound,
                    format!("Payment not found: {}", payment.id),
                )
            };
            return Err(error.with_detail("payment_id", payment.id.to_string()));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find payment", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn find_by_txn_ref(&self, txn_ref: &str) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("{} WHERE txn_ref = $1", SELECT_COLUMNS))
                .bind(txn_ref)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find payment by txn_ref", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn find_pending_expired_before(
        &self,
        cutoff: &Timestamp,
    ) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{} WHERE status = 'pending' AND expires_at < $1 ORDER BY expires_at ASC",
            SELECT_COLUMNS
        ))
        .bind(cutoff.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("find expired payments", e))?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}
