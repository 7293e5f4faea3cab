//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentRepository` - Persistence for payment aggregates
//! - `PaymentGateway` - Signed redirect URLs and callback verification

mod payment_gateway;
mod payment_repository;

pub use payment_gateway::{GatewayCallback, PaymentGateway, PaymentRedirect, PaymentUrlRequest};
pub use payment_repository::PaymentRepository;
