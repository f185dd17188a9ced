//! Comments on articles.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::user::{AuthorRow, Profile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
  pub comment_id: i64,
  pub article_id: Uuid,
  pub author_id:  Uuid,
  pub body:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::BlogStore::create_comment`].
#[derive(Debug, Clone)]
pub struct NewComment {
  pub article_id: Uuid,
  pub author_id:  Uuid,
  pub body:       String,
  pub created_at: DateTime<Utc>,
}

/// Selects which comments [`crate::store::BlogStore::query_comments`]
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentQuery {
  /// Every comment on an article.
  ForArticle(Uuid),
  /// A single comment by id.
  Single(i64),
}

/// A comment joined with its author and the viewer's follow edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
  pub comment_id: i64,
  pub body:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub author:     AuthorRow,
  pub following:  bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
  pub id:         i64,
  #[serde(serialize_with = "crate::timestamp::serialize")]
  pub created_at: DateTime<Utc>,
  #[serde(serialize_with = "crate::timestamp::serialize")]
  pub updated_at: DateTime<Utc>,
  pub body:       String,
  pub author:     Profile,
}
