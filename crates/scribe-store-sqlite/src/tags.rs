//! Tag resolution: map raw tag names to persisted tag ids, creating any that
//! are missing, and link them to an article.

use rusqlite::Transaction;
use scribe_core::tags::normalize_tags;

/// Normalize `names`, ensure a `tags` row exists for each, and link each to
/// `article_id`. Runs inside the caller's transaction.
///
/// Returns the tag ids in first-occurrence order of the normalized names.
pub fn resolve_tags(
  tx: &Transaction<'_>,
  article_id: &str,
  names: &[String],
) -> rusqlite::Result<Vec<i64>> {
  let mut ids = Vec::new();

  for name in normalize_tags(names) {
    tx.execute(
      "INSERT INTO tags (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
      rusqlite::params![name],
    )?;

    let tag_id: i64 = tx.query_row(
      "SELECT tag_id FROM tags WHERE name = ?1",
      rusqlite::params![name],
      |r| r.get(0),
    )?;

    tx.execute(
      "INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?1, ?2)",
      rusqlite::params![article_id, tag_id],
    )?;
    ids.push(tag_id);
  }

  Ok(ids)
}
