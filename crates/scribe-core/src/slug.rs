//! Slug derivation.
//!
//! Slugs are not unique: two articles with the same title share a slug, and
//! lookups by slug resolve to the most recently created one.

/// Trim, lower-case, and join whitespace-separated words with `-`.
///
/// Runs of whitespace collapse to a single hyphen; punctuation is kept.
pub fn generate_slug(title: &str) -> String {
  title
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("-")
}

#[cfg(test)]
mod tests {
  use super::generate_slug;

  #[test]
  fn words_are_hyphenated() {
    assert_eq!(generate_slug("My Title Here"), "my-title-here");
  }

  #[test]
  fn whitespace_runs_collapse_and_ends_trim() {
    assert_eq!(generate_slug("  Already   spaced "), "already-spaced");
    assert_eq!(generate_slug("tab\tand\nnewline"), "tab-and-newline");
  }

  #[test]
  fn blank_title_gives_empty_slug() {
    assert_eq!(generate_slug("   "), "");
  }
}
