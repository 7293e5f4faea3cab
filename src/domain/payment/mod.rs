//! Payment domain module.
//!
//! The signing core (parameter set, canonical string, HMAC-SHA512 signer)
//! plus the payment aggregate and its lifecycle.
//!
//! # Module Structure
//!
//! - `parameter_set` - Ordinally sorted name/value pairs
//! - `canonical` - Canonical string rendering and component encoding
//! - `signing_key` - Redacted, non-empty HMAC key
//! - `signature` - HMAC-SHA512 digest and comparison
//! - `signer` - Sign outbound requests, verify callbacks
//! - `status` - PaymentStatus state machine
//! - `response_code` - Gateway response codes
//! - `aggregate` - Payment aggregate entity

mod aggregate;
mod canonical;
mod errors;
mod parameter_set;
mod response_code;
mod signature;
mod signer;
mod signing_key;
mod status;

pub use aggregate::{Payment, Settlement, MAX_AMOUNT, MAX_ORDER_INFO_LEN, MIN_AMOUNT};
pub use canonical::{decode_component, encode_component, CanonicalString};
pub use errors::{PaymentError, SigningError};
pub use parameter_set::ParameterSet;
pub use response_code::GatewayResponseCode;
pub use signature::{Signature, SIGNATURE_HEX_LEN};
pub use signer::{sign, verify, PaymentSigner, SignedRequest};
pub use signing_key::SigningKey;
pub use status::PaymentStatus;
