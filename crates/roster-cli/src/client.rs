//! Async HTTP client wrapping the roster JSON API.

use std::{future::Future, marker::PhantomData, time::Duration};

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, StatusCode};
use roster_core::{
  page::{PageRequest, PageResponse},
  record::{AttendanceRecord, Employee, Identified, OnboardingStep},
  source::{PagedListSource, SourceError},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Connection settings for the roster API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

/// Async HTTP client for the roster JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── Departments ───────────────────────────────────────────────────────────

  /// `GET /api/departments`
  pub async fn list_departments(&self) -> Result<Vec<String>> {
    let resp = self
      .client
      .get(self.url("/departments"))
      .send()
      .await
      .context("GET /departments failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /departments → {}", resp.status()));
    }
    resp.json().await.context("deserialising departments")
  }

  // ── Paged lists ───────────────────────────────────────────────────────────

  /// `GET /api<path>?page=..&page_size=..&<filters>`
  async fn fetch_page<T: DeserializeOwned>(
    &self,
    path: &str,
    request: &PageRequest,
  ) -> Result<PageResponse<T>, SourceError> {
    let resp = self
      .client
      .get(self.url(path))
      .query(&request.query_pairs())
      .send()
      .await
      .map_err(|e| SourceError::Transport(e.to_string()))?;

    let status = resp.status();
    let body = resp
      .bytes()
      .await
      .map_err(|e| SourceError::Transport(e.to_string()))?;

    if status == StatusCode::NOT_FOUND {
      return Err(SourceError::NotFound);
    }
    if !status.is_success() {
      let message = error_message(&body).unwrap_or_else(|| {
        status.canonical_reason().unwrap_or("request failed").to_string()
      });
      return Err(SourceError::Status {
        status: status.as_u16(),
        message,
      });
    }
    Ok(PageResponse::from_json(&body)?)
  }

  pub fn employees(&self) -> Endpoint<Employee> { Endpoint::new(self.clone(), "/employees") }

  pub fn attendance(&self) -> Endpoint<AttendanceRecord> {
    Endpoint::new(self.clone(), "/attendance")
  }

  pub fn onboarding(&self) -> Endpoint<OnboardingStep> {
    Endpoint::new(self.clone(), "/onboarding-steps")
  }
}

/// The `error` or `detail` field of a JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
  let value: Value = serde_json::from_slice(body).ok()?;
  ["error", "detail"]
    .iter()
    .find_map(|key| value.get(key)?.as_str().map(str::to_owned))
}

// ─── Endpoint ─────────────────────────────────────────────────────────────────

/// A record type the API serves as a paged list.
pub trait ApiRecord: Identified + DeserializeOwned + Send + 'static {}

impl<T: Identified + DeserializeOwned + Send + 'static> ApiRecord for T {}

/// One list endpoint, typed by the record it serves.
pub struct Endpoint<T> {
  client:  ApiClient,
  path:    &'static str,
  _record: PhantomData<fn() -> T>,
}

impl<T> Endpoint<T> {
  fn new(client: ApiClient, path: &'static str) -> Self {
    Self { client, path, _record: PhantomData }
  }
}

impl<T> Clone for Endpoint<T> {
  fn clone(&self) -> Self { Self::new(self.client.clone(), self.path) }
}

impl<T: ApiRecord> PagedListSource for Endpoint<T> {
  type Item = T;

  fn fetch_page<'a>(
    &'a self,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<PageResponse<T>, SourceError>> + Send + 'a {
    self.client.fetch_page(self.path, request)
  }
}
