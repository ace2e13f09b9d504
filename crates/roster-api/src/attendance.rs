//! Handler for `GET /attendance`.
//!
//! The attendance view expands one department at a time, so `department` is
//! the filter that changes most often.

use axum::{
  Json,
  extract::{OriginalUri, Query, State},
};
use chrono::NaiveDate;
use roster_core::{
  page::PageResponse,
  record::{AttendanceRecord, AttendanceStatus},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, pagination::paginate};

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub page:       Option<u32>,
  pub page_size:  Option<u32>,
  pub department: Option<String>,
  pub date:       Option<NaiveDate>,
  pub status:     Option<AttendanceStatus>,
}

/// `GET /attendance[?department=..][&date=YYYY-MM-DD][&status=..]`
///
/// Newest day first, then directory order.
pub async fn list(
  State(state): State<ApiState>,
  OriginalUri(uri): OriginalUri,
  Query(params): Query<ListParams>,
) -> Result<Json<PageResponse<AttendanceRecord>>, ApiError> {
  let mut matching: Vec<AttendanceRecord> = state
    .directory
    .attendance()
    .await
    .into_iter()
    .filter(|a| {
      params
        .department
        .as_deref()
        .is_none_or(|d| a.department.eq_ignore_ascii_case(d))
    })
    .filter(|a| params.date.is_none_or(|d| a.date == d))
    .filter(|a| params.status.is_none_or(|s| a.status == s))
    .collect();
  // Stable sort keeps directory order within a day.
  matching.sort_by(|a, b| b.date.cmp(&a.date));

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
