//! Outbound request signing and inbound callback verification.
//!
//! Both directions are pure functions of their inputs: render the canonical
//! string, HMAC it, then either append the digest to a URL or compare it to
//! the received one. Nothing here reads configuration or touches I/O; the
//! key and field names are passed in explicitly.

use super::{encode_component, CanonicalString, ParameterSet, Signature, SigningKey};

/// Result of signing one outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub canonical: CanonicalString,
    pub signature: Signature,
    /// `base_url?canonical&signature_field=signature`
    pub url: String,
}

/// Signs `params` and builds the redirect URL.
///
/// `params` must not contain `signature_field`; callers that cannot rule it
/// out should go through [`PaymentSigner`], which strips it first.
pub fn sign(
    base_url: &str,
    params: &ParameterSet,
    key: &SigningKey,
    signature_field: &str,
) -> SignedRequest {
    let canonical = CanonicalString::render(params);
    let signature = Signature::compute(key, &canonical);

    let mut url = String::with_capacity(
        base_url.len() + canonical.as_str().len() + signature.as_str().len() + 32,
    );
    url.push_str(base_url);
    url.push(if base_url.contains('?') { '&' } else { '?' });
    if !canonical.is_empty() {
        url.push_str(canonical.as_str());
        url.push('&');
    }
    url.push_str(&encode_component(signature_field));
    url.push('=');
    url.push_str(signature.as_str());

    SignedRequest {
        canonical,
        signature,
        url,
    }
}

/// Recomputes the signature over `params` and compares it to `received`.
///
/// `params` must already exclude the signature field(s).
pub fn verify(params: &ParameterSet, received: &str, key: &SigningKey) -> bool {
    let canonical = CanonicalString::render(params);
    Signature::compute(key, &canonical).matches(received)
}

/// A key bundled with the gateway's signature field names.
///
/// Immutable after construction; share it behind an `Arc` between requests.
#[derive(Debug, Clone)]
pub struct PaymentSigner {
    key: SigningKey,
    signature_field: String,
    excluded_fields: Vec<String>,
}

impl PaymentSigner {
    pub fn new(key: SigningKey, signature_field: impl Into<String>) -> Self {
        Self {
            key,
            signature_field: signature_field.into(),
            excluded_fields: Vec::new(),
        }
    }

    /// Names another field that accompanies the signature but is not signed
    /// (e.g. a hash-type marker).
    pub fn with_excluded_field(mut self, name: impl Into<String>) -> Self {
        self.excluded_fields.push(name.into());
        self
    }

    pub fn signature_field(&self) -> &str {
        &self.signature_field
    }

    /// Every field that never takes part in canonicalization.
    pub fn unsigned_fields(&self) -> Vec<&str> {
        std::iter::once(self.signature_field.as_str())
            .chain(self.excluded_fields.iter().map(String::as_str))
            .collect()
    }

    /// Signs `params` (minus any unsigned fields) and builds the redirect URL.
    pub fn sign(&self, base_url: &str, params: &ParameterSet) -> SignedRequest {
        let signed = params.without(&self.unsigned_fields());
        sign(base_url, &signed, &self.key, &self.signature_field)
    }

    /// Verifies a callback.
    ///
    /// The signature field and the other unsigned fields are dropped before
    /// canonicalization even if the caller left them in `params`.
    pub fn verify(&self, params: &ParameterSet, received: &str) -> bool {
        let signed = params.without(&self.unsigned_fields());
        verify(&signed, received, &self.key)
    }
}
