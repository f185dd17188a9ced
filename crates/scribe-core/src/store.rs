//! The `BlogStore` trait: the graph store contract.
//!
//! Implemented by storage backends (e.g. `scribe-store-sqlite`). The service
//! and HTTP layers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  article::{Article, ArticleChanges, ArticleRow, NewArticle, TagRow},
  comment::{Comment, CommentQuery, CommentRow, NewComment},
  query::ArticleQuery,
  user::{NewUser, Profile, User},
};

/// Abstraction over the persisted relations: users, sessions, articles, tags
/// and their memberships, follow edges, favorite edges, and comments.
///
/// Edge insertions (follow, favorite, article tag) are idempotent: inserting
/// an edge that already exists succeeds without change. Edge and comment
/// deletions of missing rows are no-ops.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait BlogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new account. Fails if the username or email is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_username(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Overwrite the mutable account columns; `updated_at` is set by the
  /// store.
  fn update_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Remember a login. Only a digest of the bearer token is stored.
  fn create_session(
    &self,
    user_id: Uuid,
    token_digest: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn find_session_user(
    &self,
    token_digest: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn delete_session(
    &self,
    token_digest: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Follow graph ──────────────────────────────────────────────────────

  /// `username`'s profile with `following` computed for `viewer_id`.
  fn get_profile(
    &self,
    viewer_id: Option<Uuid>,
    username: String,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn follow(
    &self,
    follower_id: Uuid,
    followee_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn unfollow(
    &self,
    follower_id: Uuid,
    followee_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Articles ──────────────────────────────────────────────────────────

  /// Insert the article and resolve-and-link its tags in one transaction.
  fn create_article(
    &self,
    input: NewArticle,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  /// The most recently created article with `slug`, if any.
  fn find_article_by_slug(
    &self,
    slug: String,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  /// Returns `false` if no article has `article_id`.
  fn update_article(
    &self,
    article_id: Uuid,
    changes: ArticleChanges,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete the article [`Self::find_article_by_slug`] would return, along
  /// with its tag links, favorite edges and comments. Returns whether a row
  /// was removed.
  fn delete_article_by_slug(
    &self,
    slug: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Phase one of the article projection: one row per matching article,
  /// ordered newest first and paginated, with the viewer's follow and
  /// favorite edges and the favorites count attached.
  fn query_articles<'a>(
    &'a self,
    viewer_id: Option<Uuid>,
    query: &'a ArticleQuery,
  ) -> impl Future<Output = Result<Vec<ArticleRow>, Self::Error>> + Send + 'a;

  /// Phase two: tag memberships for exactly `article_ids`.
  fn article_tags(
    &self,
    article_ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<Vec<TagRow>, Self::Error>> + Send + '_;

  fn favorite(
    &self,
    user_id: Uuid,
    article_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn unfavorite(
    &self,
    user_id: Uuid,
    article_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Every tag name, sorted.
  fn list_tags(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  fn create_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  fn get_comment(
    &self,
    comment_id: i64,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Comments joined with their authors and the viewer's follow edges,
  /// oldest first.
  fn query_comments(
    &self,
    viewer_id: Option<Uuid>,
    query: CommentQuery,
  ) -> impl Future<Output = Result<Vec<CommentRow>, Self::Error>> + Send + '_;

  fn delete_comment(
    &self,
    comment_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
