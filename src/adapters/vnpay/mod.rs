//! VNPay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port for VNPay's redirect flow:
//! - Signed payment URLs (HMAC-SHA512 over the sorted, encoded parameters)
//! - Return URL and IPN callback verification
//!
//! # Configuration
//!
//! Required environment variables:
//! - `CODELAB__PAYMENT__SIGNING_KEY`: the terminal's hash secret
//! - `CODELAB__PAYMENT__MERCHANT_CODE`: the terminal code
//! - `CODELAB__PAYMENT__RETURN_URL`: where customers land after paying

pub mod fields;
mod gateway;
mod query;

pub use gateway::{VnPayConfig, VnPayGateway};
pub use query::parse_query;
