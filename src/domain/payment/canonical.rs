//! Canonical string rendering for signed parameter sets.
//!
//! Each entry becomes `encode(name)=encode(value)`, entries are joined with
//! `&` in ordinal name order. Encoding follows RFC 3986: `A-Z a-z 0-9 - _ . ~`
//! pass through, every other UTF-8 byte becomes `%XX` with uppercase hex, and
//! a space is `%20` (never `+`).
//!
//! [`decode_component`] is the inverse used for inbound callbacks. If the two
//! ever disagree, a genuine callback fails verification exactly like a
//! tampered one would.

use std::fmt;
use std::string::FromUtf8Error;

use super::ParameterSet;

/// Percent-encodes one name or value.
pub fn encode_component(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Decodes one name or value from a query string.
///
/// `+` is read as a space (form encoding) before percent-decoding, so a
/// literal plus sign must arrive as `%2B`.
pub fn decode_component(encoded: &str) -> Result<String, FromUtf8Error> {
    let spaced = encoded.replace('+', " ");
    urlencoding::decode(&spaced).map(|decoded| decoded.into_owned())
}

/// Deterministic serialization of a [`ParameterSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalString(String);

impl CanonicalString {
    /// Renders the set. An empty set renders to the empty string.
    pub fn render(params: &ParameterSet) -> Self {
        let joined = params
            .iter()
            .map(|(name, value)| format!("{}={}", encode_component(name), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&");
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    use super::*;

    fn arb_entries() -> impl Strategy<Value = BTreeMap<String, String>> {
        prop::collection::btree_map("[A-Za-z_]{1,12}", "\\PC{1,16}", 0..10)
    }

    proptest! {
        #[test]
        fn render_is_deterministic(entries in arb_entries()) {
            let params: ParameterSet = entries.iter().collect();
            prop_assert_eq!(CanonicalString::render(&params), CanonicalString::render(&params));
        }

        #[test]
        fn render_ignores_insertion_order(entries in arb_entries()) {
            let forward: ParameterSet = entries.iter().collect();
            let backward: ParameterSet = entries.iter().rev().collect();
            prop_assert_eq!(CanonicalString::render(&forward), CanonicalString::render(&backward));
        }

        #[test]
        fn empty_values_never_render(entries in arb_entries(), blank in "[a-z]{1,8}") {
            let mut params: ParameterSet = entries.iter().collect();
            let before = CanonicalString::render(&params);
            let absent = format!("zz_{}", blank);
            params.add(absent.as_str(), "");
            params.add_optional(absent.as_str(), None::<&str>);
            prop_assert_eq!(CanonicalString::render(&params), before);
        }

        #[test]
        fn decode_inverts_encode(raw in "\\PC{0,40}") {
            prop_assert_eq!(decode_component(&encode_component(&raw)).unwrap(), raw);
        }
    }
}
