//! HMAC-SHA512 signature over a canonical string.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::{CanonicalString, SigningKey};

type HmacSha512 = Hmac<Sha512>;

/// Hex length of an HMAC-SHA512 digest.
pub const SIGNATURE_HEX_LEN: usize = 128;

/// Lowercase hex-encoded HMAC-SHA512 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(String);

impl Signature {
    /// Computes `HMAC-SHA512(key, canonical)`.
    pub fn compute(key: &SigningKey, canonical: &CanonicalString) -> Self {
        let mut mac =
            HmacSha512::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
        mac.update(canonical.as_bytes());
        Self(hex::encode(mac.finalize().into_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against a received signature.
    ///
    /// Case-insensitive to match the gateway, which may send uppercase hex.
    /// The byte comparison runs in constant time; a length mismatch returns
    /// early since the expected length is public.
    pub fn matches(&self, received: &str) -> bool {
        let received = received.to_ascii_lowercase();
        if received.len() != self.0.len() {
            return false;
        }
        self.0.as_bytes().ct_eq(received.as_bytes()).into()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
