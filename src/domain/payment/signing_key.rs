//! Shared secret used to sign and verify gateway parameters.

use secrecy::{ExposeSecret, SecretString};

use super::SigningError;

/// Non-empty HMAC key shared with the payment gateway.
///
/// Wraps a `SecretString`, so `Debug` output is redacted and the key never
/// ends up in logs. The key is read-only after construction and cheap to
/// share across concurrent requests.
#[derive(Clone)]
pub struct SigningKey(SecretString);

impl SigningKey {
    /// Builds a key, rejecting empty or whitespace-only secrets.
    pub fn new(secret: impl Into<String>) -> Result<Self, SigningError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(SigningError::MissingKey);
        }
        Ok(Self(SecretString::new(secret)))
    }

    /// Builds a key from an already-wrapped secret (e.g. from configuration).
    pub fn from_secret(secret: &SecretString) -> Result<Self, SigningError> {
        Self::new(secret.expose_secret().clone())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}
