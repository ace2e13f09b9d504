//! JSON REST API serving Roster's paged HR lists.
//!
//! Every list endpoint answers `{results, count, next}` and 404s with
//! `{"detail": "Invalid page."}` for a page past the end. Data lives in an
//! in-memory [`Directory`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(state))
//! ```

pub mod attendance;
pub mod directory;
pub mod employees;
pub mod error;
pub mod onboarding;
pub mod pagination;

use std::sync::Arc;

use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use directory::Directory;
pub use error::ApiError;
pub use pagination::PageLimits;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  #[serde(default = "default_page_size")]
  pub default_page_size: u32,
  #[serde(default = "default_max_page_size")]
  pub max_page_size:     u32,
  /// Number of employees in the generated demo directory.
  #[serde(default = "default_seed_employees")]
  pub seed_employees:    usize,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_page_size() -> u32 { PageLimits::default().default_page_size }
fn default_max_page_size() -> u32 { PageLimits::default().max_page_size }
fn default_seed_employees() -> usize { 250 }

impl ServerConfig {
  pub fn limits(&self) -> PageLimits {
    PageLimits {
      default_page_size: self.default_page_size,
      max_page_size:     self.max_page_size,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct ApiState {
  pub directory: Arc<Directory>,
  pub limits:    PageLimits,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`, to be nested under `/api`.
pub fn api_router(state: ApiState) -> Router<()> {
  Router::new()
    .route("/employees", get(employees::list))
    .route("/employees/{employee_no}", get(employees::get_one))
    .route("/departments", get(employees::departments))
    .route("/attendance", get(attendance::list))
    .route("/onboarding-steps", get(onboarding::list))
    .with_state(state)
}

/// The full application: the API under `/api`, with request tracing.
pub fn app(state: ApiState) -> Router {
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
