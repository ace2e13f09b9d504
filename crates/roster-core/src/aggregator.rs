//! [`ListAggregator`] — accumulates paged results into one deduplicated list.
//!
//! The aggregator performs no I/O. Callers ask it which page to fetch
//! ([`ListAggregator::request_next_page`]), fetch it however they like, and
//! hand the result back ([`ListAggregator::apply_response`] or
//! [`ListAggregator::fetch_failed`]). Every fetch is tagged with a
//! [`FetchTicket`]; a response whose ticket predates the latest reset is
//! dropped instead of applied.

use std::collections::HashSet;

use tracing::debug;

use crate::{
  filter::FilterSignature,
  page::PageResponse,
  record::Identified,
  scroll::{ScrollPosition, ScrollTrigger},
};

// ─── Tickets ─────────────────────────────────────────────────────────────────

/// Identifies one dispatched fetch: the page asked for and the filter state it
/// was asked under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
  page:       u32,
  signature:  FilterSignature,
  generation: u64,
}

impl FetchTicket {
  pub fn page(&self) -> u32 { self.page }
}

/// Outcome of [`ListAggregator::apply_response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
  /// The page was applied; `added` items were new.
  Page { page: u32, added: usize },
  /// The ticket was issued before the last reset; nothing changed.
  Stale,
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

/// Page state for one list view.
#[derive(Debug, Clone)]
pub struct ListAggregator<T: Identified> {
  items:        Vec<T>,
  seen:         HashSet<T::Key>,
  /// Items each applied page contributed, page 1 first.
  page_lengths: Vec<usize>,
  current_page: u32,
  /// Whether `current_page` has been applied since the last reset. When it
  /// has not, `current_page` is the page to fetch next.
  page_applied: bool,
  has_more:     bool,
  /// Page currently being fetched, if any. Doubles as the re-entrancy guard.
  in_flight:    Option<u32>,
  signature:    FilterSignature,
  generation:   u64,
}

impl<T: Identified> ListAggregator<T> {
  pub fn new(signature: FilterSignature) -> Self {
    Self {
      items: Vec::new(),
      seen: HashSet::new(),
      page_lengths: Vec::new(),
      current_page: 1,
      page_applied: false,
      has_more: true,
      in_flight: None,
      signature,
      generation: 0,
    }
  }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn items(&self) -> &[T] { &self.items }

  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  pub fn current_page(&self) -> u32 { self.current_page }

  pub fn has_more(&self) -> bool { self.has_more }

  pub fn signature(&self) -> &FilterSignature { &self.signature }

  /// Whether a fetch is outstanding.
  pub fn is_fetching(&self) -> bool { self.in_flight.is_some() }

  pub fn is_loading_first_page(&self) -> bool { self.in_flight == Some(1) }

  pub fn is_fetching_more(&self) -> bool {
    self.in_flight.is_some_and(|page| page > 1)
  }

  pub fn contains(&self, key: &T::Key) -> bool { self.seen.contains(key) }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Discard everything and start over under `signature`.
  ///
  /// Any fetch issued before this call becomes stale.
  pub fn reset(&mut self, signature: FilterSignature) {
    debug!(
      signature = signature.as_str(),
      dropped = self.items.len(),
      "resetting list"
    );
    self.items.clear();
    self.seen.clear();
    self.page_lengths.clear();
    self.current_page = 1;
    self.page_applied = false;
    self.has_more = true;
    self.in_flight = None;
    self.signature = signature;
    self.generation += 1;
  }

  /// Apply one page of results. Returns how many items were new.
  ///
  /// Page 1 replaces the list; later pages append, dropping any item whose
  /// key has already been seen. Clears the fetch guard.
  pub fn apply_page(&mut self, page: u32, results: Vec<T>, has_next: bool) -> usize {
    let page = page.max(1);
    if page == 1 {
      self.items.clear();
      self.seen.clear();
      self.page_lengths.clear();
    }

    let before = self.items.len();
    for item in results {
      if self.seen.insert(item.identity()) {
        self.items.push(item);
      }
    }
    let added = self.items.len() - before;
    match self.page_lengths.get_mut(page as usize - 1) {
      Some(len) => *len += added,
      None => self.page_lengths.push(added),
    }

    self.has_more = has_next;
    self.current_page = page;
    self.page_applied = true;
    self.in_flight = None;

    debug!(page, added, total = self.items.len(), has_next, "applied page");
    added
  }

  /// Latch the fetch guard and return the page to fetch, or `None` when there
  /// is nothing more to load or a fetch is already outstanding.
  pub fn request_next_page(&mut self) -> Option<u32> {
    if !self.has_more || self.in_flight.is_some() {
      return None;
    }
    let next = if self.page_applied {
      self.current_page + 1
    } else {
      self.current_page
    };
    self.in_flight = Some(next);
    Some(next)
  }

  /// [`request_next_page`](Self::request_next_page), but only once `position`
  /// has crossed `trigger`.
  pub fn on_scroll(
    &mut self,
    position: ScrollPosition,
    trigger: ScrollTrigger,
  ) -> Option<u32> {
    if !trigger.is_reached(position) {
      return None;
    }
    self.request_next_page()
  }

  /// Refetch page 1 without clearing the visible items. Outstanding fetches
  /// become stale; the page-1 response will replace the list.
  pub fn restart(&mut self) -> u32 {
    self.generation += 1;
    self.in_flight = Some(1);
    1
  }

  /// The outstanding fetch failed. Only the guard is cleared.
  pub fn fetch_failed(&mut self) {
    self.in_flight = None;
  }

  /// A page beyond the first no longer exists (the dataset shrank).
  ///
  /// Falls back to page 1 with `has_more = false`. Items stay visible until
  /// the caller's page-1 refetch replaces them.
  pub fn page_missing(&mut self) {
    debug!(page = ?self.in_flight, "requested page no longer exists");
    self.current_page = 1;
    self.page_applied = false;
    self.page_lengths.clear();
    self.has_more = false;
    self.in_flight = None;
  }

  /// Drop the most recently appended page and step back one page. Returns
  /// the new current page, or `None` when already on page 1 or while page 1
  /// is being refetched.
  ///
  /// Removes exactly the items that page added, which is fewer than
  /// `page_size` for a short last page or one thinned by dedup. `page_size`
  /// is only used if that count is unknown.
  ///
  /// This does not refetch: the remaining items are shown as they were.
  /// An outstanding later-page fetch is invalidated, since it was for the
  /// page after the one being removed.
  pub fn trim_last_page(&mut self, page_size: usize) -> Option<u32> {
    if self.current_page <= 1 || self.is_loading_first_page() {
      return None;
    }
    if self.in_flight.take().is_some() {
      self.generation += 1;
    }

    let dropped = self.page_lengths.pop().unwrap_or(page_size);
    let keep = self.items.len().saturating_sub(dropped);
    for item in self.items.drain(keep..) {
      self.seen.remove(&item.identity());
    }
    self.current_page -= 1;
    // The page just dropped is known to exist.
    self.has_more = true;

    debug!(page = self.current_page, total = self.items.len(), "trimmed last page");
    Some(self.current_page)
  }

  // ── Tickets ───────────────────────────────────────────────────────────────

  /// Tag a fetch for `page` with the current filter state.
  pub fn ticket(&self, page: u32) -> FetchTicket {
    FetchTicket {
      page,
      signature: self.signature.clone(),
      generation: self.generation,
    }
  }

  /// Whether a response for `ticket` may still be applied.
  pub fn is_current(&self, ticket: &FetchTicket) -> bool {
    ticket.generation == self.generation && ticket.signature == self.signature
  }

  /// Apply `response` if `ticket` is still current.
  pub fn apply_response(
    &mut self,
    ticket: &FetchTicket,
    response: PageResponse<T>,
  ) -> Applied {
    if !self.is_current(ticket) {
      debug!(
        page = ticket.page,
        signature = ticket.signature.as_str(),
        "discarding stale page"
      );
      return Applied::Stale;
    }
    let has_next = response.has_next();
    let added = self.apply_page(ticket.page, response.results, has_next);
    Applied::Page { page: ticket.page, added }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::filter::Filters;

  #[derive(Debug, Clone, PartialEq)]
  struct Row {
    id:    u32,
    label: &'static str,
  }

  impl Identified for Row {
    type Key = u32;

    fn identity(&self) -> u32 { self.id }
  }

  fn rows(ids: impl IntoIterator<Item = u32>) -> Vec<Row> {
    ids.into_iter().map(|id| Row { id, label: "" }).collect()
  }

  fn ids(agg: &ListAggregator<Row>) -> Vec<u32> {
    agg.items().iter().map(|r| r.id).collect()
  }

  fn fresh() -> ListAggregator<Row> { ListAggregator::new(Filters::new().signature()) }

  // ── Dedup & ordering ─────────────────────────────────────────────────────

  #[test]
  fn overlapping_pages_keep_each_key_once() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=5), true);
    agg.apply_page(2, rows(4..=8), true);
    agg.apply_page(3, rows([2, 8, 9, 9, 10]), false);
    assert_eq!(ids(&agg), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
  }

  #[test]
  fn first_arrival_wins_on_collision() {
    let mut agg = fresh();
    agg.apply_page(1, vec![Row { id: 1, label: "first" }], true);
    agg.apply_page(2, vec![Row { id: 1, label: "second" }], false);
    assert_eq!(agg.len(), 1);
    assert_eq!(agg.items()[0].label, "first");
  }

  #[test]
  fn page_one_replaces_instead_of_appending() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=3), true);
    agg.apply_page(1, rows(7..=8), false);
    assert_eq!(ids(&agg), vec![7, 8]);
    assert!(!agg.has_more());
  }

  #[test]
  fn reapplying_a_later_page_is_a_no_op() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=3), true);
    agg.apply_page(2, rows(4..=6), true);
    let added = agg.apply_page(2, rows(4..=6), true);
    assert_eq!(added, 0);
    assert_eq!(ids(&agg), vec![1, 2, 3, 4, 5, 6]);
  }

  #[test]
  fn empty_first_page_empties_the_list() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=3), true);
    agg.apply_page(1, Vec::new(), false);
    assert!(agg.is_empty());
    assert!(!agg.has_more());
  }

  // ── Reset ────────────────────────────────────────────────────────────────

  #[test]
  fn reset_clears_state() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    agg.apply_page(2, rows(11..=20), false);
    agg.request_next_page();
    agg.reset(Filters::new().with("status", "pending").signature());
    assert!(agg.is_empty());
    assert_eq!(agg.current_page(), 1);
    assert!(agg.has_more());
    assert!(!agg.is_fetching());
    assert!(!agg.contains(&3));
  }

  #[test]
  fn first_request_after_reset_is_page_one() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    agg.apply_page(2, rows(11..=20), true);
    agg.reset(Filters::new().signature());
    assert_eq!(agg.request_next_page(), Some(1));
    assert!(agg.is_loading_first_page());
  }

  // ── Guard ────────────────────────────────────────────────────────────────

  #[test]
  fn guard_blocks_second_request() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    assert_eq!(agg.request_next_page(), Some(2));
    assert!(agg.is_fetching_more());
    assert_eq!(agg.request_next_page(), None);
  }

  #[test]
  fn failure_clears_guard_and_keeps_state() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    assert_eq!(agg.request_next_page(), Some(2));
    agg.fetch_failed();
    assert_eq!(agg.len(), 10);
    assert_eq!(agg.current_page(), 1);
    assert!(agg.has_more());
    assert_eq!(agg.request_next_page(), Some(2));
  }

  #[test]
  fn no_request_when_exhausted() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=3), false);
    assert_eq!(agg.request_next_page(), None);
    assert!(!agg.is_fetching());
  }

  #[test]
  fn scroll_below_threshold_does_not_latch() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    let top = ScrollPosition::new(0, 3, 10);
    assert_eq!(agg.on_scroll(top, ScrollTrigger::DROPDOWN), None);
    assert!(!agg.is_fetching());

    let bottom = ScrollPosition::new(6, 3, 10);
    assert_eq!(agg.on_scroll(bottom, ScrollTrigger::DROPDOWN), Some(2));
    assert_eq!(agg.on_scroll(bottom, ScrollTrigger::DROPDOWN), None);
  }

  // ── Trim ─────────────────────────────────────────────────────────────────

  #[test]
  fn trim_undoes_an_append_size_wise() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    let (len, page) = (agg.len(), agg.current_page());

    agg.apply_page(2, rows(11..=20), true);
    assert_eq!(agg.trim_last_page(10), Some(1));
    assert_eq!(agg.len(), len);
    assert_eq!(agg.current_page(), page);
    assert!(!agg.contains(&15));
    assert!(agg.has_more());
  }

  #[test]
  fn trimmed_items_can_be_loaded_again() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=5), true);
    agg.apply_page(2, rows(6..=10), false);
    agg.trim_last_page(5);
    assert_eq!(agg.request_next_page(), Some(2));
    assert_eq!(agg.apply_page(2, rows(6..=10), false), 5);
    assert_eq!(agg.len(), 10);
  }

  #[test]
  fn trim_on_first_page_is_a_no_op() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    assert_eq!(agg.trim_last_page(10), None);
    assert_eq!(agg.len(), 10);
    assert_eq!(agg.current_page(), 1);
  }

  #[test]
  fn trim_removes_only_a_short_last_page() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    agg.apply_page(2, rows(11..=13), false);

    assert_eq!(agg.trim_last_page(10), Some(1));
    assert_eq!(ids(&agg), (1..=10).collect::<Vec<_>>());
    assert_eq!(agg.request_next_page(), Some(2));
    assert_eq!(agg.apply_page(2, rows(11..=13), false), 3);
    assert_eq!(agg.len(), 13);
  }

  #[test]
  fn trim_removes_only_what_a_deduped_page_added() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=5), true);
    agg.apply_page(2, rows(4..=8), true);
    agg.apply_page(3, rows(9..=13), true);
    assert_eq!(agg.len(), 13);

    assert_eq!(agg.trim_last_page(5), Some(2));
    assert_eq!(agg.trim_last_page(5), Some(1));
    assert_eq!(ids(&agg), vec![1, 2, 3, 4, 5]);
  }

  #[test]
  fn trim_during_first_page_refetch_is_a_no_op() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    agg.apply_page(2, rows(11..=20), true);
    let page = agg.restart();
    let ticket = agg.ticket(page);

    assert_eq!(agg.trim_last_page(10), None);
    assert_eq!(agg.len(), 20);
    assert!(agg.is_loading_first_page());
    assert!(agg.is_current(&ticket));
  }

  #[test]
  fn trim_invalidates_outstanding_fetch() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=5), true);
    agg.apply_page(2, rows(6..=10), true);
    let page = agg.request_next_page().unwrap();
    let ticket = agg.ticket(page);
    agg.trim_last_page(5);
    assert!(!agg.is_fetching());
    let outcome = agg.apply_response(&ticket, PageResponse {
      results: rows(11..=15),
      count:   15,
      next:    None,
    });
    assert_eq!(outcome, Applied::Stale);
    assert_eq!(agg.len(), 5);
  }

  // ── Tickets ──────────────────────────────────────────────────────────────

  #[test]
  fn stale_ticket_is_discarded() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=3), true);
    let page = agg.request_next_page().unwrap();
    let old = agg.ticket(page);

    agg.reset(Filters::new().with("status", "pending").signature());
    let fresh_page = agg.request_next_page().unwrap();
    let new = agg.ticket(fresh_page);

    let stale = agg.apply_response(&old, PageResponse {
      results: rows(4..=6),
      count:   6,
      next:    None,
    });
    assert_eq!(stale, Applied::Stale);
    assert!(agg.is_loading_first_page());

    let applied = agg.apply_response(&new, PageResponse {
      results: rows([100, 101]),
      count:   2,
      next:    None,
    });
    assert_eq!(applied, Applied::Page { page: 1, added: 2 });
    assert_eq!(ids(&agg), vec![100, 101]);
  }

  #[test]
  fn reset_to_same_filters_still_invalidates() {
    let mut agg = fresh();
    let page = agg.request_next_page().unwrap();
    let ticket = agg.ticket(page);
    agg.reset(Filters::new().signature());
    assert!(!agg.is_current(&ticket));
  }

  // ── Scenarios ────────────────────────────────────────────────────────────

  #[test]
  fn scenario_repeated_item_across_pages() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    assert_eq!(agg.len(), 10);
    assert!(agg.has_more());

    assert_eq!(agg.request_next_page(), Some(2));
    // Page 2 repeats id 10 and carries 11..=19.
    let mut page_two = rows([10]);
    page_two.extend(rows(11..=19));
    let added = agg.apply_page(2, page_two, false);
    assert_eq!(added, 9);
    assert_eq!(agg.len(), 19);
    assert!(!agg.has_more());
  }

  #[test]
  fn missing_page_falls_back_to_first() {
    let mut agg = fresh();
    agg.apply_page(1, rows(1..=10), true);
    agg.apply_page(2, rows(11..=20), true);
    agg.apply_page(3, rows(21..=30), true);
    assert_eq!(agg.request_next_page(), Some(4));

    agg.page_missing();
    assert_eq!(agg.current_page(), 1);
    assert!(!agg.has_more());
    assert!(!agg.is_fetching());
    assert_eq!(agg.len(), 30);

    assert_eq!(agg.restart(), 1);
    let ticket = agg.ticket(1);
    agg.apply_response(&ticket, PageResponse {
      results: rows(1..=10),
      count:   10,
      next:    None,
    });
    assert_eq!(agg.len(), 10);
    assert!(!agg.has_more());
  }
}
