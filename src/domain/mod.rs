//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `payment` - Request signing, callback verification and the payment lifecycle

pub mod foundation;
pub mod payment;
