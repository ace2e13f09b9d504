//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("page size must be greater than zero")]
  ZeroPageSize,

  #[error("page numbers start at 1")]
  ZeroPage,

  #[error("malformed page response: {0}")]
  MalformedPage(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
