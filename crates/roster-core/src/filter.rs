//! Active list filters and their comparable signature.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The filter and search fields a list view sends with every page request.
///
/// Keys are kept sorted and empty values are dropped, so two filter sets that
/// would produce the same query also produce the same [`FilterSignature`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
  pub fn new() -> Self { Self::default() }

  /// Builder-style [`Filters::set`].
  pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.set(key, value);
    self
  }

  /// Set `key` to `value`; an empty (or all-whitespace) value removes the key.
  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    let key = key.into();
    let value = value.into();
    if value.trim().is_empty() {
      self.0.remove(&key);
    } else {
      self.0.insert(key, value);
    }
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Serialised snapshot used to detect that accumulated items are stale.
  pub fn signature(&self) -> FilterSignature {
    // A map of strings always serialises.
    FilterSignature(serde_json::to_string(&self.0).unwrap_or_default())
  }
}

/// Opaque, comparable snapshot of a [`Filters`] value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSignature(String);

impl FilterSignature {
  pub fn as_str(&self) -> &str { &self.0 }
}
