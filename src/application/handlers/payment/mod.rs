//! Payment handlers.
//!
//! ## Commands
//! - Starting a payment (pending payment + signed gateway URL)
//! - Processing gateway callbacks (return URL and IPN)
//! - Expiring abandoned payments
//!
//! ## Queries
//! - Get payment details

mod create_payment;
mod expire_pending_payments;
mod get_payment;
mod handle_payment_callback;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use create_payment::{CreatePaymentCommand, CreatePaymentHandler, CreatePaymentResult};
pub use expire_pending_payments::{
    ExpirePendingPaymentsCommand, ExpirePendingPaymentsHandler, ExpirePendingPaymentsResult,
};
pub use handle_payment_callback::{
    HandlePaymentCallbackCommand, HandlePaymentCallbackHandler, HandlePaymentCallbackResult,
};

// Queries
pub use get_payment::{GetPaymentHandler, GetPaymentQuery, GetPaymentResult};
