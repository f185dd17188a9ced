//! Tag name normalization.
//!
//! Resolution of names to tag identities lives with the store, which can do
//! it inside the same transaction that inserts the article.

use std::collections::HashSet;

/// Trimmed and lower-cased; `None` when nothing is left.
pub fn normalize_tag(raw: &str) -> Option<String> {
  let name = raw.trim().to_lowercase();
  (!name.is_empty()).then_some(name)
}

/// Normalize every name and drop duplicates, keeping first occurrences in
/// input order.
pub fn normalize_tags<I>(names: I) -> Vec<String>
where
  I: IntoIterator,
  I::Item: AsRef<str>,
{
  let mut seen = HashSet::new();
  names
    .into_iter()
    .filter_map(|name| normalize_tag(name.as_ref()))
    .filter(|name| seen.insert(name.clone()))
    .collect()
}
