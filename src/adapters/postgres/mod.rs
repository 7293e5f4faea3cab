//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPaymentRepository` - Payment aggregate persistence

mod payment_repository;

pub use payment_repository::PostgresPaymentRepository;
