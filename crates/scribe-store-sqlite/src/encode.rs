//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 UTC strings with a fixed microsecond precision, so
//! lexical order in SQL matches chronological order. UUIDs are hyphenated
//! lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use scribe_core::{
  article::{Article, ArticleRow, TagRow},
  comment::{Comment, CommentRow},
  user::{AuthorRow, User},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `dt` truncated to the precision the store keeps, so values handed back
/// from a write compare equal to what a later read returns.
pub fn at_rest(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// A lower-cased `%needle%` pattern for `LIKE ... ESCAPE '\'`, with the
/// needle's own wildcards escaped. Match it against `unicode_lower(column)`.
pub fn like_pattern(needle: &str) -> String {
  let needle = needle.trim().to_lowercase();
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub bio:           Option<String>,
  pub image:         Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  /// Columns in `SELECT user_id, username, email, password_hash, bio, image,
  /// created_at, updated_at` order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      bio:           row.get(4)?,
      image:         row.get(5)?,
      created_at:    row.get(6)?,
      updated_at:    row.get(7)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      bio:           self.bio,
      image:         self.image,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from an `articles` row.
pub struct RawArticle {
  pub article_id:  String,
  pub author_id:   String,
  pub slug:        String,
  pub title:       String,
  pub description: String,
  pub body:        String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawArticle {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id:  row.get(0)?,
      author_id:   row.get(1)?,
      slug:        row.get(2)?,
      title:       row.get(3)?,
      description: row.get(4)?,
      body:        row.get(5)?,
      created_at:  row.get(6)?,
      updated_at:  row.get(7)?,
    })
  }

  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      article_id:  decode_uuid(&self.article_id)?,
      author_id:   decode_uuid(&self.author_id)?,
      slug:        self.slug,
      title:       self.title,
      description: self.description,
      body:        self.body,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// An `articles` row joined with its author and the viewer's edges.
pub struct RawArticleRow {
  pub article_id:      String,
  pub slug:            String,
  pub title:           String,
  pub description:     String,
  pub body:            String,
  pub created_at:      String,
  pub updated_at:      String,
  pub username:        String,
  pub bio:             Option<String>,
  pub image:           Option<String>,
  pub following:       bool,
  pub favorited:       bool,
  pub favorites_count: i64,
}

impl RawArticleRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id:      row.get(0)?,
      slug:            row.get(1)?,
      title:           row.get(2)?,
      description:     row.get(3)?,
      body:            row.get(4)?,
      created_at:      row.get(5)?,
      updated_at:      row.get(6)?,
      username:        row.get(7)?,
      bio:             row.get(8)?,
      image:           row.get(9)?,
      following:       row.get(10)?,
      favorited:       row.get(11)?,
      favorites_count: row.get(12)?,
    })
  }

  pub fn into_row(self) -> Result<ArticleRow> {
    Ok(ArticleRow {
      article_id:      decode_uuid(&self.article_id)?,
      slug:            self.slug,
      title:           self.title,
      description:     self.description,
      body:            self.body,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
      author:          AuthorRow { username: self.username, bio: self.bio, image: self.image },
      following:       self.following,
      favorited:       self.favorited,
      favorites_count: self.favorites_count,
    })
  }
}

pub struct RawTagRow {
  pub article_id: String,
  pub name:       String,
}

impl RawTagRow {
  pub fn into_row(self) -> Result<TagRow> {
    Ok(TagRow { article_id: decode_uuid(&self.article_id)?, name: self.name })
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: i64,
  pub article_id: String,
  pub author_id:  String,
  pub body:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: self.comment_id,
      article_id: decode_uuid(&self.article_id)?,
      author_id:  decode_uuid(&self.author_id)?,
      body:       self.body,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// A `comments` row joined with its author and the viewer's follow edge.
pub struct RawCommentRow {
  pub comment_id: i64,
  pub body:       String,
  pub created_at: String,
  pub updated_at: String,
  pub username:   String,
  pub bio:        Option<String>,
  pub image:      Option<String>,
  pub following:  bool,
}

impl RawCommentRow {
  pub fn into_row(self) -> Result<CommentRow> {
    Ok(CommentRow {
      comment_id: self.comment_id,
      body:       self.body,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      author:     AuthorRow { username: self.username, bio: self.bio, image: self.image },
      following:  self.following,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("go"), "%go%");
    assert_eq!(like_pattern(" 100%_off "), "%100\\%\\_off%");
    assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
  }

  #[test]
  fn like_pattern_folds_unicode_case() {
    assert_eq!(like_pattern("ÉTÉ"), "%été%");
    assert_eq!(like_pattern("ZoË"), "%zoë%");
  }

  #[test]
  fn timestamps_sort_lexically() {
    let early = chrono::DateTime::parse_from_rfc3339("2026-01-01T00:00:00.5Z")
      .unwrap()
      .with_timezone(&Utc);
    let late = early + chrono::Duration::microseconds(1);
    assert!(encode_dt(early) < encode_dt(late));
    assert_eq!(decode_dt(&encode_dt(late)).unwrap(), late);
  }
}
