//! Page slicing and `next` links for list endpoints.

use roster_core::page::PageResponse;
use serde::Deserialize;

use crate::error::ApiError;

/// Page-size bounds applied to every list endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageLimits {
  pub default_page_size: u32,
  pub max_page_size:     u32,
}

impl Default for PageLimits {
  fn default() -> Self {
    Self {
      default_page_size: 20,
      max_page_size:     100,
    }
  }
}

/// Return page `page` of `items`.
///
/// Page 1 always succeeds, even when empty. Any later page that starts past
/// the end is [`ApiError::InvalidPage`]. `page_size` is clamped to
/// `limits.max_page_size`.
pub fn paginate<T: Clone>(
  items: &[T],
  page: Option<u32>,
  page_size: Option<u32>,
  limits: PageLimits,
  path: &str,
  raw_query: Option<&str>,
) -> Result<PageResponse<T>, ApiError> {
  let page = page.unwrap_or(1);
  let page_size = page_size
    .unwrap_or(limits.default_page_size)
    .min(limits.max_page_size);
  if page == 0 {
    return Err(ApiError::BadRequest("page must be at least 1".into()));
  }
  if page_size == 0 {
    return Err(ApiError::BadRequest("page_size must be at least 1".into()));
  }

  let size = page_size as usize;
  let start = (page as usize - 1).saturating_mul(size);
  if page > 1 && start >= items.len() {
    return Err(ApiError::InvalidPage);
  }
  let end = start.saturating_add(size).min(items.len());

  let next = (end < items.len()).then(|| next_link(path, raw_query, page + 1));
  Ok(PageResponse {
    results: items[start.min(end)..end].to_vec(),
    count: items.len() as u64,
    next,
  })
}

/// `path` with the original query string, `page` replaced by `next_page`.
pub fn next_link(path: &str, raw_query: Option<&str>, next_page: u32) -> String {
  let page = format!("page={next_page}");
  let mut pairs: Vec<&str> = raw_query
    .unwrap_or_default()
    .split('&')
    .filter(|pair| !pair.is_empty() && !pair.starts_with("page="))
    .collect();
  pairs.push(&page);
  format!("{path}?{}", pairs.join("&"))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn limits() -> PageLimits { PageLimits::default() }

  #[test]
  fn slices_pages_and_links_next() {
    let items: Vec<u32> = (1..=25).collect();
    let p = paginate(&items, Some(2), Some(10), limits(), "/api/x", Some("page=2&page_size=10"))
      .unwrap();
    assert_eq!(p.results, (11..=20).collect::<Vec<_>>());
    assert_eq!(p.count, 25);
    assert_eq!(p.next.as_deref(), Some("/api/x?page_size=10&page=3"));

    let last = paginate(&items, Some(3), Some(10), limits(), "/api/x", None).unwrap();
    assert_eq!(last.results.len(), 5);
    assert!(last.next.is_none());
  }

  #[test]
  fn empty_first_page_is_fine_but_later_pages_are_invalid() {
    let items: Vec<u32> = Vec::new();
    let p = paginate(&items, None, None, limits(), "/api/x", None).unwrap();
    assert!(p.results.is_empty());
    assert!(p.next.is_none());
    assert!(matches!(
      paginate(&items, Some(2), None, limits(), "/api/x", None),
      Err(ApiError::InvalidPage)
    ));
  }

  #[test]
  fn page_size_is_clamped_and_zero_rejected() {
    let items: Vec<u32> = (1..=500).collect();
    let p = paginate(&items, None, Some(1000), limits(), "/api/x", None).unwrap();
    assert_eq!(p.results.len(), 100);
    assert!(matches!(
      paginate(&items, Some(0), None, limits(), "/api/x", None),
      Err(ApiError::BadRequest(_))
    ));
    assert!(matches!(
      paginate(&items, None, Some(0), limits(), "/api/x", None),
      Err(ApiError::BadRequest(_))
    ));
  }

  #[test]
  fn next_link_keeps_filters() {
    let link = next_link("/api/employees", Some("search=ada&page=1&status=active"), 2);
    assert_eq!(link, "/api/employees?search=ada&status=active&page=2");
  }
}
