use chrono::Utc;
use tracing::debug;

use super::BlogService;
use crate::{
  Error, Result, ValidationErrors,
  comment::{Comment, CommentQuery, CommentView, NewComment},
  projection::project_comments,
  store::BlogStore,
  user::Viewer,
};

impl<S: BlogStore> BlogService<S> {
  /// Comment on the article behind `slug` as `viewer`.
  pub async fn add_comment(&self, viewer: &Viewer, slug: &str, body: String) -> Result<CommentView> {
    let mut errors = ValidationErrors::default();
    errors.require("body", &body);
    errors.into_result()?;

    let article = self.article_by_slug(slug).await?;
    let comment = self
      .store
      .create_comment(NewComment {
        article_id: article.article_id,
        author_id: viewer.user_id,
        body,
        created_at: Utc::now(),
      })
      .await
      .map_err(Error::store)?;
    debug!(id = comment.comment_id, %slug, "added comment");

    let rows = self
      .store
      .query_comments(Some(viewer.user_id), CommentQuery::Single(comment.comment_id))
      .await
      .map_err(Error::store)?;
    project_comments(Some(viewer), rows)
      .into_iter()
      .next()
      .ok_or_else(|| Error::not_found(format!("comment {}", comment.comment_id)))
  }

  /// All comments on the article behind `slug`, oldest first.
  pub async fn list_comments(&self, viewer: Option<&Viewer>, slug: &str) -> Result<Vec<CommentView>> {
    let article = self.article_by_slug(slug).await?;
    let rows = self
      .store
      .query_comments(viewer.map(|v| v.user_id), CommentQuery::ForArticle(article.article_id))
      .await
      .map_err(Error::store)?;
    Ok(project_comments(viewer, rows))
  }

  /// The stored comment, for authorship checks.
  pub async fn comment(&self, comment_id: i64) -> Result<Comment> {
    self
      .store
      .get_comment(comment_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(format!("comment {comment_id}")))
  }

  pub async fn delete_comment(&self, comment_id: i64) -> Result<()> {
    self.store.delete_comment(comment_id).await.map_err(Error::store)?;
    debug!(id = comment_id, "deleted comment");
    Ok(())
  }
}
