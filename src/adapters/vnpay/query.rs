//! Callback query string parsing.

use std::collections::HashSet;

use crate::domain::payment::{decode_component, ParameterSet, PaymentError};

/// Decodes a raw query string (no leading `?`) into a [`ParameterSet`].
///
/// Empty segments and empty values are dropped, matching how the gateway
/// leaves blank fields out of its signature. A name that appears twice is
/// rejected rather than resolved, even when one of its values is blank.
pub fn parse_query(raw: &str) -> Result<ParameterSet, PaymentError> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut params = ParameterSet::new();
    let mut seen = HashSet::new();

    for segment in raw.split('&').filter(|s| !s.is_empty()) {
        let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
        let name = decode_component(name)
            .map_err(|_| PaymentError::validation("query", "malformed percent-encoding"))?;
        let value = decode_component(value)
            .map_err(|_| PaymentError::validation(name.clone(), "malformed percent-encoding"))?;

        if !name.is_empty() && !seen.insert(name.clone()) {
            return Err(PaymentError::validation(name, "duplicate parameter"));
        }
        params.add(name, value);
    }

    Ok(params)
}
