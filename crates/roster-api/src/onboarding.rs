//! Handler for `GET /onboarding-steps`, the feed behind the onboarding board.

use axum::{
  Json,
  extract::{OriginalUri, Query, State},
};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use roster_core::{
  page::PageResponse,
  record::{OnboardingStage, OnboardingStep},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, pagination::paginate};

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub page:        Option<u32>,
  pub page_size:   Option<u32>,
  /// Fuzzy match against step title and employee name.
  pub search:      Option<String>,
  pub stage:       Option<OnboardingStage>,
  pub employee_no: Option<String>,
}

/// `GET /onboarding-steps[?search=..][&stage=..][&employee_no=..]`
pub async fn list(
  State(state): State<ApiState>,
  OriginalUri(uri): OriginalUri,
  Query(params): Query<ListParams>,
) -> Result<Json<PageResponse<OnboardingStep>>, ApiError> {
  let matcher = SkimMatcherV2::default();
  let search = params.search.as_deref().map(str::trim).unwrap_or_default();

  let matching: Vec<OnboardingStep> = state
    .directory
    .onboarding()
    .await
    .into_iter()
    .filter(|s| params.stage.is_none_or(|st| s.stage == st))
    .filter(|s| {
      params
        .employee_no
        .as_deref()
        .is_none_or(|no| s.employee_no == no)
    })
    .filter(|s| {
      search.is_empty()
        || matcher.fuzzy_match(&s.title, search).is_some()
        || matcher.fuzzy_match(&s.employee_name, search).is_some()
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
