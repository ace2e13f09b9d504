//! `ListSession` tests against an in-memory source.

use std::{
  future::Future,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use crate::{
  filter::Filters,
  page::{PageRequest, PageResponse},
  record::Identified,
  scroll::{ScrollPosition, ScrollTrigger},
  session::{Completion, ListSession},
  source::{PagedListSource, SourceError},
};

// ─── Fixture source ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Leave {
  id:     u32,
  status: &'static str,
}

impl Identified for Leave {
  type Key = u32;

  fn identity(&self) -> u32 { self.id }
}

/// Paginates a vector the way the API does: a page past the end (other than
/// page 1) is a 404.
#[derive(Default)]
struct MemorySource {
  rows:      Mutex<Vec<Leave>>,
  fail_next: Mutex<Option<SourceError>>,
  fetches:   AtomicUsize,
}

impl MemorySource {
  fn with_rows(rows: Vec<Leave>) -> Self {
    Self { rows: Mutex::new(rows), ..Default::default() }
  }

  fn fail_next(&self, e: SourceError) { *self.fail_next.lock().unwrap() = Some(e); }

  fn truncate(&self, len: usize) { self.rows.lock().unwrap().truncate(len); }

  fn fetches(&self) -> usize { self.fetches.load(Ordering::SeqCst) }

  fn answer(&self, req: &PageRequest) -> Result<PageResponse<Leave>, SourceError> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    if let Some(e) = self.fail_next.lock().unwrap().take() {
      return Err(e);
    }

    let rows = self.rows.lock().unwrap();
    let matching: Vec<Leave> = rows
      .iter()
      .filter(|r| req.filters.get("status").is_none_or(|s| s == r.status))
      .cloned()
      .collect();

    let size = req.page_size as usize;
    let start = (req.page as usize - 1) * size;
    if start >= matching.len() && req.page > 1 {
      return Err(SourceError::NotFound);
    }
    let end = (start + size).min(matching.len());
    let next = (end < matching.len()).then(|| format!("?page={}", req.page + 1));
    Ok(PageResponse {
      results: matching[start.min(end)..end].to_vec(),
      count: matching.len() as u64,
      next,
    })
  }
}

impl PagedListSource for MemorySource {
  type Item = Leave;

  fn fetch_page<'a>(
    &'a self,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<PageResponse<Leave>, SourceError>> + Send + 'a {
    async move { self.answer(request) }
  }
}

fn leaves(n: u32) -> Vec<Leave> {
  (1..=n)
    .map(|id| Leave {
      id,
      status: if id % 2 == 0 { "pending" } else { "approved" },
    })
    .collect()
}

fn session(n: u32, page_size: u32) -> ListSession<MemorySource> {
  ListSession::new(MemorySource::with_rows(leaves(n)), page_size, Filters::new())
    .expect("non-zero page size")
}

fn ids(s: &ListSession<MemorySource>) -> Vec<u32> {
  s.items().iter().map(|l| l.id).collect()
}

// ─── Forward pagination ──────────────────────────────────────────────────────

#[test]
fn zero_page_size_is_rejected() {
  assert!(ListSession::new(MemorySource::default(), 0, Filters::new()).is_err());
}

#[tokio::test]
async fn loads_until_exhausted() {
  let mut s = session(25, 10);

  assert_eq!(s.load_more().await.unwrap(), Some(10));
  assert_eq!(s.current_page(), 1);
  assert!(s.has_more());
  assert_eq!(s.load_more().await.unwrap(), Some(10));
  assert_eq!(s.load_more().await.unwrap(), Some(5));
  assert!(!s.has_more());
  assert_eq!(s.load_more().await.unwrap(), None);

  assert_eq!(ids(&s), (1..=25).collect::<Vec<_>>());
  assert_eq!(s.total(), Some(25));
  assert_eq!(s.source().fetches(), 3);
}

#[tokio::test]
async fn scroll_fetches_only_past_threshold() {
  let mut s = session(30, 10);
  s.load_more().await.unwrap();

  let near_top = ScrollPosition::new(0, 4, 10);
  assert_eq!(s.on_scroll(near_top, ScrollTrigger::DROPDOWN).await.unwrap(), None);
  let near_end = ScrollPosition::new(5, 4, 10);
  assert_eq!(
    s.on_scroll(near_end, ScrollTrigger::DROPDOWN).await.unwrap(),
    Some(10)
  );
  assert_eq!(s.items().len(), 20);
}

#[test]
fn rapid_scroll_events_issue_one_fetch() {
  let mut s = session(30, 10);
  let first = s.begin_load_more().unwrap();
  let response = s.source().answer(&first.request);
  s.complete(&first.ticket, response);

  let bottom = ScrollPosition::new(8, 2, 10);
  let pending = s.begin_scroll(bottom, ScrollTrigger::DROPDOWN);
  assert!(pending.is_some());
  assert!(s.is_fetching_more());
  assert!(s.begin_scroll(bottom, ScrollTrigger::DROPDOWN).is_none());
  assert!(s.begin_load_more().is_none());
}

#[tokio::test]
async fn load_less_then_more_restores_the_page() {
  let mut s = session(30, 10);
  s.load_more().await.unwrap();
  s.load_more().await.unwrap();
  s.load_more().await.unwrap();
  assert!(!s.has_more());

  assert_eq!(s.load_less(), Some(2));
  assert_eq!(s.items().len(), 20);
  assert!(s.has_more());
  assert_eq!(s.load_less(), Some(1));
  assert_eq!(s.load_less(), None);
  assert_eq!(s.items().len(), 10);

  assert_eq!(s.load_more().await.unwrap(), Some(10));
  assert_eq!(s.current_page(), 2);
  assert_eq!(ids(&s), (1..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn load_less_after_a_short_last_page_keeps_the_first_page() {
  let mut s = session(13, 10);
  s.load_more().await.unwrap();
  s.load_more().await.unwrap();
  assert!(!s.has_more());

  assert_eq!(s.load_less(), Some(1));
  assert_eq!(ids(&s), (1..=10).collect::<Vec<_>>());
  assert_eq!(s.load_more().await.unwrap(), Some(3));
  assert_eq!(ids(&s), (1..=13).collect::<Vec<_>>());
}

#[test]
fn load_less_does_not_swallow_a_refresh() {
  let mut s = session(30, 10);
  for _ in 0..2 {
    let p = s.begin_load_more().unwrap();
    let r = s.source().answer(&p.request);
    s.complete(&p.ticket, r);
  }

  let refresh = s.begin_refresh();
  assert_eq!(s.load_less(), None);
  assert_eq!(s.items().len(), 20);

  let response = s.source().answer(&refresh.request);
  assert_eq!(
    s.complete(&refresh.ticket, response),
    Completion::Applied { page: 1, added: 10 }
  );
  assert_eq!(ids(&s), (1..=10).collect::<Vec<_>>());
  assert!(s.has_more());
}

// ─── Filter changes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn filter_change_replaces_items() {
  let mut s = session(20, 5);
  s.load_more().await.unwrap();
  s.load_more().await.unwrap();

  s.on_filter_change(Filters::new().with("status", "pending"))
    .await
    .unwrap();
  assert_eq!(s.current_page(), 1);
  assert_eq!(s.total(), Some(10));
  assert_eq!(ids(&s), vec![2, 4, 6, 8, 10]);
  assert!(s.items().iter().all(|l| l.status == "pending"));
}

#[tokio::test]
async fn same_filters_do_not_refetch() {
  let mut s = session(20, 5);
  s.load_more().await.unwrap();
  let before = s.source().fetches();

  s.on_filter_change(Filters::new()).await.unwrap();
  assert_eq!(s.source().fetches(), before);
  assert_eq!(s.items().len(), 5);
}

#[test]
fn stale_response_after_filter_change_is_dropped() {
  let mut s = session(12, 3);

  let first = s.begin_load_more().unwrap();
  let response = s.source().answer(&first.request);
  s.complete(&first.ticket, response);
  assert_eq!(ids(&s), vec![1, 2, 3]);

  // Page 2 goes out under the old filters...
  let old = s.begin_load_more().unwrap();
  assert_eq!(old.request.page, 2);
  let old_response = s.source().answer(&old.request);

  // ...then the user switches to pending leaves before it returns.
  let new = s
    .begin_filter_change(Filters::new().with("status", "pending"))
    .unwrap();
  assert_eq!(new.request.page, 1);
  assert!(s.is_loading_first_page());

  // Stale response lands first: dropped, and the page-1 fetch is still open.
  assert_eq!(s.complete(&old.ticket, old_response), Completion::Discarded);
  assert!(s.items().is_empty());
  assert!(s.is_loading_first_page());

  let new_response = s.source().answer(&new.request);
  assert_eq!(
    s.complete(&new.ticket, new_response),
    Completion::Applied { page: 1, added: 3 }
  );
  assert_eq!(ids(&s), vec![2, 4, 6]);
  assert!(s.items().iter().all(|l| l.status == "pending"));
}

#[test]
fn stale_failure_does_not_touch_new_fetch() {
  let mut s = session(12, 3);
  let old = s.begin_load_more().unwrap();
  let new = s
    .begin_filter_change(Filters::new().with("status", "approved"))
    .unwrap();

  let outcome = s.complete(&old.ticket, Err(SourceError::Transport("reset".into())));
  assert_eq!(outcome, Completion::Discarded);
  assert!(s.last_error().is_none());
  assert!(s.is_loading_first_page());

  let response = s.source().answer(&new.request);
  s.complete(&new.ticket, response);
  assert_eq!(ids(&s), vec![1, 3, 5]);
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn transient_failure_keeps_items_and_surfaces_error() {
  let mut s = session(30, 10);
  s.load_more().await.unwrap();

  s.source().fail_next(SourceError::Status {
    status:  503,
    message: "maintenance".into(),
  });
  let err = s.load_more().await.unwrap_err();
  assert!(matches!(err, SourceError::Status { status: 503, .. }));
  assert_eq!(s.items().len(), 10);
  assert_eq!(s.current_page(), 1);
  assert!(s.has_more());
  assert!(!s.is_fetching_more());
  assert!(s.last_error().is_some());

  // Retry succeeds and clears the error.
  assert_eq!(s.load_more().await.unwrap(), Some(10));
  assert!(s.last_error().is_none());
}

#[tokio::test]
async fn malformed_page_applies_nothing() {
  let mut s = session(30, 10);
  s.load_more().await.unwrap();

  s.source()
    .fail_next(SourceError::Malformed("missing `results`".into()));
  assert!(s.load_more().await.is_err());
  assert_eq!(ids(&s), (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn vanished_page_restarts_from_first_page() {
  let mut s = session(40, 10);
  for _ in 0..3 {
    s.load_more().await.unwrap();
  }
  assert_eq!(s.current_page(), 3);
  assert!(s.has_more());

  // The dataset shrinks under us; page 4 no longer exists.
  s.source().truncate(5);
  let added = s.load_more().await.unwrap();
  assert_eq!(added, Some(5));
  assert_eq!(ids(&s), vec![1, 2, 3, 4, 5]);
  assert_eq!(s.current_page(), 1);
  assert!(!s.has_more());
  assert!(s.last_error().is_none());
}

#[test]
fn vanished_page_marks_list_exhausted_pending_refetch() {
  let mut s = session(40, 10);
  for _ in 0..3 {
    let p = s.begin_load_more().unwrap();
    let r = s.source().answer(&p.request);
    s.complete(&p.ticket, r);
  }

  let p = s.begin_load_more().unwrap();
  assert_eq!(p.request.page, 4);
  match s.complete(&p.ticket, Err(SourceError::NotFound)) {
    Completion::Restart(next) => {
      assert_eq!(next.request.page, 1);
      assert_eq!(s.current_page(), 1);
      assert!(!s.has_more());
      assert!(s.is_loading_first_page());
      // Items stay on screen until page 1 lands.
      assert_eq!(s.items().len(), 30);
    }
    other => panic!("expected restart, got {other:?}"),
  }
}

#[tokio::test]
async fn not_found_on_first_page_is_an_error() {
  let mut s = session(10, 5);
  s.source().fail_next(SourceError::NotFound);
  assert_eq!(s.load_more().await.unwrap_err(), SourceError::NotFound);
  assert_eq!(s.last_error(), Some(&SourceError::NotFound));
  assert!(!s.is_loading_first_page());
}

#[tokio::test]
async fn refresh_replaces_with_current_first_page() {
  let mut s = session(20, 5);
  s.load_more().await.unwrap();
  s.load_more().await.unwrap();
  s.refresh().await.unwrap();
  assert_eq!(ids(&s), vec![1, 2, 3, 4, 5]);
  assert!(s.has_more());
}
