//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum REST endpoints
//! - `memory` - In-memory repository for tests and local runs
//! - `postgres` - PostgreSQL repository
//! - `vnpay` - VNPay gateway (URL signing, callback verification)

pub mod http;
pub mod memory;
pub mod postgres;
pub mod vnpay;

pub use memory::InMemoryPaymentRepository;
pub use postgres::PostgresPaymentRepository;
pub use vnpay::{VnPayConfig, VnPayGateway};
