//! The [`PagedListSource`] trait — anything that can answer a page request.
//!
//! Implemented over HTTP by `roster-cli`; the session and aggregator depend on
//! this abstraction only.

use std::future::Future;

use thiserror::Error;

use crate::{
  page::{PageRequest, PageResponse},
  record::Identified,
};

/// Why a page could not be fetched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
  /// The requested page does not exist (HTTP 404).
  #[error("page not found")]
  NotFound,

  /// Any other non-success status. `message` is taken from an `error` or
  /// `detail` field in the body when present.
  #[error("server returned {status}: {message}")]
  Status { status: u16, message: String },

  #[error("transport error: {0}")]
  Transport(String),

  /// The body was not a valid page; nothing from it was applied.
  #[error("malformed response: {0}")]
  Malformed(String),
}

impl From<crate::Error> for SourceError {
  fn from(e: crate::Error) -> Self { SourceError::Malformed(e.to_string()) }
}

/// A backend list endpoint.
pub trait PagedListSource: Send + Sync {
  type Item: Identified + Send;

  /// Fetch one page.
  fn fetch_page<'a>(
    &'a self,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<PageResponse<Self::Item>, SourceError>> + Send + 'a;
}
