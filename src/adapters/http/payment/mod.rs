//! HTTP adapter for payment endpoints.
//!
//! - `POST /api/payments` - Start a payment, returns the gateway URL
//! - `GET /api/payments/:id` - Get payment details
//! - `GET /api/payments/vnpay/return` - Browser return from the gateway
//! - `GET /api/payments/vnpay/ipn` - Gateway server-to-server notification

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{AuthenticatedUser, PaymentApiError, PaymentAppState};
pub use routes::{payment_router, payment_routes};
