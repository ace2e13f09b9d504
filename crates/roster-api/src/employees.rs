//! Handlers for `/employees` and `/departments`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/employees` | Paged; optional `search`, `department`, `status` |
//! | `GET`  | `/employees/{employee_no}` | 404 if not found |
//! | `GET`  | `/departments` | Plain array of department names |

use axum::{
  Json,
  extract::{OriginalUri, Path, Query, State},
};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use roster_core::{
  page::PageResponse,
  record::{Employee, EmploymentStatus},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, pagination::paginate};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub page:       Option<u32>,
  pub page_size:  Option<u32>,
  /// Fuzzy match against name and employee number.
  pub search:     Option<String>,
  pub department: Option<String>,
  pub status:     Option<EmploymentStatus>,
}

/// `GET /employees[?page=..][&page_size=..][&search=..][&department=..][&status=..]`
pub async fn list(
  State(state): State<ApiState>,
  OriginalUri(uri): OriginalUri,
  Query(params): Query<ListParams>,
) -> Result<Json<PageResponse<Employee>>, ApiError> {
  let matcher = SkimMatcherV2::default();
  let search = params.search.as_deref().map(str::trim).unwrap_or_default();

  let matching: Vec<Employee> = state
    .directory
    .employees()
    .await
    .into_iter()
    .filter(|e| {
      params
        .department
        .as_deref()
        .is_none_or(|d| e.department.eq_ignore_ascii_case(d))
    })
    .filter(|e| params.status.is_none_or(|s| e.status == s))
    .filter(|e| {
      search.is_empty()
        || matcher.fuzzy_match(&e.full_name, search).is_some()
        || matcher.fuzzy_match(&e.employee_no, search).is_some()
    })
    .collect();

  let page = paginate(
    &matching,
    params.page,
    params.page_size,
    state.limits,
    uri.path(),
    uri.query(),
  )?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /employees/{employee_no}`
pub async fn get_one(
  State(state): State<ApiState>,
  Path(employee_no): Path<String>,
) -> Result<Json<Employee>, ApiError> {
  let employee = state
    .directory
    .employee(&employee_no)
    .await
    .ok_or_else(|| ApiError::NotFound(format!("employee {employee_no} not found")))?;
  Ok(Json(employee))
}

// ─── Departments ──────────────────────────────────────────────────────────────

/// `GET /departments`
pub async fn departments(State(state): State<ApiState>) -> Json<Vec<String>> {
  Json(state.directory.departments().await)
}
