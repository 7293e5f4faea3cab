//! CodeLab Payments - VNPay checkout for course purchases
//!
//! This crate signs outbound VNPay payment requests, verifies the gateway's
//! return and IPN callbacks, and tracks each payment through its lifecycle.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
