//! The page contract shared by the API and its clients.
//!
//! Requests carry `page`, `page_size` and the active filters; responses carry
//! `{results, count, next}`. `next` is the URL of the following page, or
//! `null` on the last one.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, Result, filter::Filters};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
  /// 1-based page number.
  pub page:      u32,
  pub page_size: u32,
  pub filters:   Filters,
}

impl PageRequest {
  pub fn new(page: u32, page_size: u32, filters: Filters) -> Result<Self> {
    if page == 0 {
      return Err(Error::ZeroPage);
    }
    if page_size == 0 {
      return Err(Error::ZeroPageSize);
    }
    Ok(Self { page, page_size, filters })
  }

  /// Query-string pairs: `page`, `page_size`, then every filter field.
  pub fn query_pairs(&self) -> Vec<(String, String)> {
    let mut pairs = vec![
      ("page".to_string(), self.page.to_string()),
      ("page_size".to_string(), self.page_size.to_string()),
    ];
    pairs.extend(
      self
        .filters
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    pairs
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse<T> {
  pub results: Vec<T>,
  /// Total number of matching items across all pages.
  pub count:   u64,
  pub next:    Option<String>,
}

impl<T> PageResponse<T> {
  pub fn has_next(&self) -> bool { self.next.is_some() }

  /// Parse a response body, rejecting it whole if `results` or `count` is
  /// missing.
  pub fn from_json(body: &[u8]) -> Result<Self>
  where
    T: DeserializeOwned,
  {
    let raw: RawPage<T> = serde_json::from_slice(body)
      .map_err(|e| Error::MalformedPage(e.to_string()))?;
    raw.validate()
  }
}

/// Loosely-typed mirror of [`PageResponse`] used to validate a body before any
/// of it is applied.
#[derive(Debug, Deserialize)]
struct RawPage<T> {
  results: Option<Vec<T>>,
  count:   Option<u64>,
  #[serde(default)]
  next:    Value,
}

impl<T> RawPage<T> {
  fn validate(self) -> Result<PageResponse<T>> {
    let results = self
      .results
      .ok_or_else(|| Error::MalformedPage("missing `results`".into()))?;
    let count = self
      .count
      .ok_or_else(|| Error::MalformedPage("missing `count`".into()))?;
    // Some endpoints answer with a boolean instead of a URL.
    let next = match self.next {
      Value::Null | Value::Bool(false) => None,
      Value::Bool(true) => Some(String::new()),
      Value::String(url) => Some(url),
      other => {
        return Err(Error::MalformedPage(format!(
          "unexpected `next` value: {other}"
        )));
      }
    };
    Ok(PageResponse { results, count, next })
  }
}
