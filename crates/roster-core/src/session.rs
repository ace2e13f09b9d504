//! [`ListSession`] — one list view's aggregator bound to its source.
//!
//! Two ways to drive it:
//!
//! - Sequentially: [`ListSession::load_more`], [`ListSession::on_filter_change`]
//!   and friends fetch and apply in one call.
//! - Split: the `begin_*` methods hand back a [`PendingFetch`] the caller
//!   runs wherever it likes (a spawned task, say), then feeds the result to
//!   [`ListSession::complete`]. Fetches that overlap a filter change come back
//!   stale and are dropped there.

use tracing::{debug, warn};

use crate::{
  Error,
  Result,
  aggregator::{Applied, FetchTicket, ListAggregator},
  filter::Filters,
  page::{PageRequest, PageResponse},
  scroll::{ScrollPosition, ScrollTrigger},
  source::{PagedListSource, SourceError},
};

/// A fetch the session wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
  pub ticket:  FetchTicket,
  pub request: PageRequest,
}

/// What [`ListSession::complete`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
  Applied { page: u32, added: usize },
  /// Issued under filters that are no longer active.
  Discarded,
  /// The page vanished server-side; fetch this page-1 request next.
  Restart(PendingFetch),
  /// Left state untouched apart from the guard; the error is also kept in
  /// [`ListSession::last_error`].
  Failed(SourceError),
}

pub struct ListSession<S: PagedListSource> {
  source:     S,
  aggregator: ListAggregator<S::Item>,
  page_size:  u32,
  filters:    Filters,
  /// `count` from the latest applied page.
  total:      Option<u64>,
  last_error: Option<SourceError>,
}

impl<S: PagedListSource> ListSession<S> {
  pub fn new(source: S, page_size: u32, filters: Filters) -> Result<Self> {
    if page_size == 0 {
      return Err(Error::ZeroPageSize);
    }
    Ok(Self {
      source,
      aggregator: ListAggregator::new(filters.signature()),
      page_size,
      filters,
      total: None,
      last_error: None,
    })
  }

  // ── UI-facing state ───────────────────────────────────────────────────────

  pub fn source(&self) -> &S { &self.source }

  pub fn items(&self) -> &[S::Item] { self.aggregator.items() }

  pub fn has_more(&self) -> bool { self.aggregator.has_more() }

  pub fn is_loading_first_page(&self) -> bool {
    self.aggregator.is_loading_first_page()
  }

  pub fn is_fetching_more(&self) -> bool { self.aggregator.is_fetching_more() }

  pub fn current_page(&self) -> u32 { self.aggregator.current_page() }

  pub fn page_size(&self) -> u32 { self.page_size }

  pub fn filters(&self) -> &Filters { &self.filters }

  /// Server-side match count, once a page has landed.
  pub fn total(&self) -> Option<u64> { self.total }

  pub fn last_error(&self) -> Option<&SourceError> { self.last_error.as_ref() }

  pub fn aggregator(&self) -> &ListAggregator<S::Item> { &self.aggregator }

  // ── Split API ─────────────────────────────────────────────────────────────

  fn pending(&self, page: u32) -> PendingFetch {
    PendingFetch {
      ticket:  self.aggregator.ticket(page),
      request: PageRequest {
        page,
        page_size: self.page_size,
        filters: self.filters.clone(),
      },
    }
  }

  /// Next-page fetch, unless exhausted or one is already outstanding.
  pub fn begin_load_more(&mut self) -> Option<PendingFetch> {
    let page = self.aggregator.request_next_page()?;
    Some(self.pending(page))
  }

  /// Like [`begin_load_more`](Self::begin_load_more), gated on `trigger`.
  pub fn begin_scroll(
    &mut self,
    position: ScrollPosition,
    trigger: ScrollTrigger,
  ) -> Option<PendingFetch> {
    let page = self.aggregator.on_scroll(position, trigger)?;
    Some(self.pending(page))
  }

  /// Reset to `filters` and return the page-1 fetch. `None` when `filters`
  /// match the active ones.
  pub fn begin_filter_change(&mut self, filters: Filters) -> Option<PendingFetch> {
    let signature = filters.signature();
    if &signature == self.aggregator.signature() {
      return None;
    }
    self.filters = filters;
    self.total = None;
    self.last_error = None;
    self.aggregator.reset(signature);
    let page = self.aggregator.request_next_page()?;
    Some(self.pending(page))
  }

  /// Refetch page 1, keeping the current items visible until it lands.
  pub fn begin_refresh(&mut self) -> PendingFetch {
    self.last_error = None;
    let page = self.aggregator.restart();
    self.pending(page)
  }

  /// Apply the result of a fetch issued under `ticket`.
  pub fn complete(
    &mut self,
    ticket: &FetchTicket,
    result: std::result::Result<PageResponse<S::Item>, SourceError>,
  ) -> Completion {
    if !self.aggregator.is_current(ticket) {
      debug!(page = ticket.page(), "dropping result of superseded fetch");
      return Completion::Discarded;
    }

    match result {
      Ok(response) => {
        let count = response.count;
        match self.aggregator.apply_response(ticket, response) {
          Applied::Page { page, added } => {
            self.total = Some(count);
            self.last_error = None;
            Completion::Applied { page, added }
          }
          Applied::Stale => Completion::Discarded,
        }
      }
      Err(SourceError::NotFound) if ticket.page() > 1 => {
        warn!(page = ticket.page(), "page vanished, restarting from page 1");
        self.aggregator.page_missing();
        let page = self.aggregator.restart();
        Completion::Restart(self.pending(page))
      }
      Err(e) => {
        warn!(page = ticket.page(), error = %e, "page fetch failed");
        self.aggregator.fetch_failed();
        self.last_error = Some(e.clone());
        Completion::Failed(e)
      }
    }
  }

  // ── Sequential API ────────────────────────────────────────────────────────

  /// Run `pending` (and any page-1 restart it leads to) to completion.
  /// Returns the number of new items.
  async fn drive(
    &mut self,
    mut pending: PendingFetch,
  ) -> std::result::Result<usize, SourceError> {
    loop {
      let result = self.source.fetch_page(&pending.request).await;
      match self.complete(&pending.ticket, result) {
        Completion::Applied { added, .. } => return Ok(added),
        Completion::Discarded => return Ok(0),
        Completion::Restart(next) => pending = next,
        Completion::Failed(e) => return Err(e),
      }
    }
  }

  /// Fetch and apply the next page. `Ok(None)` when there was nothing to
  /// fetch.
  pub async fn load_more(&mut self) -> std::result::Result<Option<usize>, SourceError> {
    match self.begin_load_more() {
      Some(pending) => self.drive(pending).await.map(Some),
      None => Ok(None),
    }
  }

  pub async fn on_scroll(
    &mut self,
    position: ScrollPosition,
    trigger: ScrollTrigger,
  ) -> std::result::Result<Option<usize>, SourceError> {
    match self.begin_scroll(position, trigger) {
      Some(pending) => self.drive(pending).await.map(Some),
      None => Ok(None),
    }
  }

  /// Drop the last page. Returns the new current page, `None` on page 1.
  pub fn load_less(&mut self) -> Option<u32> {
    self.aggregator.trim_last_page(self.page_size as usize)
  }

  pub async fn on_filter_change(
    &mut self,
    filters: Filters,
  ) -> std::result::Result<(), SourceError> {
    match self.begin_filter_change(filters) {
      Some(pending) => self.drive(pending).await.map(drop),
      None => Ok(()),
    }
  }

  pub async fn refresh(&mut self) -> std::result::Result<(), SourceError> {
    let pending = self.begin_refresh();
    self.drive(pending).await.map(drop)
  }
}
