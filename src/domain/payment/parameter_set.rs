//! Ordered parameter set for one gateway request or callback.
//!
//! Names are kept in ordinal (byte-wise) ascending order. This must never be
//! replaced by a locale-aware collation: the gateway sorts the same way and
//! any other ordering produces a different canonical string, hence a
//! different signature.

use std::collections::BTreeMap;

/// Name/value pairs that take part in a signature.
///
/// Empty values are treated as absent and never stored, so an optional
/// field left blank cannot sneak into the signed string as `name=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    // BTreeMap<String, _> orders by `str::cmp`, which compares UTF-8 bytes.
    entries: BTreeMap<String, String>,
}

impl ParameterSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `name`.
    ///
    /// Empty names and empty values are silently ignored.
    pub fn add(&mut self, name: impl Into<String>, value: impl AsRef<str>) {
        let name = name.into();
        let value = value.as_ref();
        if name.is_empty() || value.is_empty() {
            return;
        }
        self.entries.insert(name, value.to_string());
    }

    /// Same as [`add`](Self::add), with `None` treated like an empty value.
    pub fn add_optional<V: AsRef<str>>(&mut self, name: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.add(name, value);
        }
    }

    /// Returns the value for `name`, or `""` when absent.
    pub fn get(&self, name: &str) -> &str {
        self.entries.get(name).map(String::as_str).unwrap_or("")
    }

    /// Returns true if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Removes `name`, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    /// Empties the set so the builder can be reused for another request.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns a copy of this set with the given names left out.
    pub fn without(&self, names: &[&str]) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(name, _)| !names.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in ordinal name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (name, value) in iter {
            set.add(name, value);
        }
        set
    }
}
