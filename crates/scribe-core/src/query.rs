//! Filter and pagination parameters for article queries.

use uuid::Uuid;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A 1-based page of `limit` items.
///
/// Missing or non-positive values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  page:  i64,
  limit: i64,
}

impl Pagination {
  pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
    let page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
    let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
    Self { page, limit }
  }

  pub fn page(&self) -> i64 { self.page }

  pub fn limit(&self) -> i64 { self.limit }

  /// `limit * page - limit`, saturating.
  pub fn offset(&self) -> i64 { self.limit.saturating_mul(self.page - 1) }
}

impl Default for Pagination {
  fn default() -> Self { Self::new(None, None) }
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Case-insensitive substring filters. A `None` filter matches everything;
/// present filters are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
  /// Matched against any tag name on the article.
  pub tag:          Option<String>,
  /// Matched against the author's username.
  pub author:       Option<String>,
  /// Matched against the username of any user who favorited the article.
  pub favorited_by: Option<String>,
}

impl ArticleFilter {
  /// Blank filters (e.g. `?tag=`) count as absent.
  pub fn normalized(self) -> Self {
    let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    Self {
      tag:          keep(self.tag),
      author:       keep(self.author),
      favorited_by: keep(self.favorited_by),
    }
  }
}

/// Parameters for [`crate::store::BlogStore::query_articles`].
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
  pub filter:      ArticleFilter,
  /// Restrict to authors this user follows (feed semantics).
  pub followed_by: Option<Uuid>,
  /// Restrict to a single article.
  pub article_id:  Option<Uuid>,
  pub page:        Pagination,
}

impl ArticleQuery {
  pub fn single(article_id: Uuid) -> Self {
    Self { article_id: Some(article_id), ..Default::default() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_when_absent() {
    let p = Pagination::new(None, None);
    assert_eq!((p.page(), p.limit(), p.offset()), (1, 10, 0));
  }

  #[test]
  fn offset_is_limit_times_page_minus_limit() {
    let p = Pagination::new(Some(3), Some(20));
    assert_eq!(p.offset(), 40);
  }

  #[test]
  fn non_positive_values_clamp_to_defaults() {
    assert_eq!(Pagination::new(Some(0), Some(-5)), Pagination::default());
    assert_eq!(Pagination::new(Some(-2), Some(5)).offset(), 0);
  }

  #[test]
  fn large_limits_are_honoured() {
    assert_eq!(Pagination::new(Some(1), Some(200)).limit(), 200);
    assert_eq!(Pagination::new(Some(2), Some(120)).offset(), 120);
  }

  #[test]
  fn huge_page_saturates() {
    assert_eq!(Pagination::new(Some(i64::MAX), Some(100)).offset(), i64::MAX);
  }

  #[test]
  fn blank_filters_are_absent() {
    let f = ArticleFilter {
      tag:          Some("  ".into()),
      author:       Some("jake".into()),
      favorited_by: Some(String::new()),
    }
    .normalized();
    assert_eq!(f.tag, None);
    assert_eq!(f.author.as_deref(), Some("jake"));
    assert_eq!(f.favorited_by, None);
  }
}
