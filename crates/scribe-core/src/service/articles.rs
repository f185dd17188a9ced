//! Article create/list/feed/get/update/favorite/unfavorite/delete.

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::BlogService;
use crate::{
  Error, Result,
  article::{Article, ArticleList, ArticleView, CreateArticle, NewArticle, UpdateArticle},
  projection::project_articles,
  query::{ArticleFilter, ArticleQuery, Pagination},
  slug::generate_slug,
  store::BlogStore,
  user::Viewer,
};

impl<S: BlogStore> BlogService<S> {
  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Run both query phases and fold the result.
  async fn project(&self, viewer: Option<&Viewer>, query: &ArticleQuery) -> Result<Vec<ArticleView>> {
    let rows = self
      .store
      .query_articles(viewer.map(|v| v.user_id), query)
      .await
      .map_err(Error::store)?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.article_id).collect();
    let tags = if ids.is_empty() {
      Vec::new()
    } else {
      self.store.article_tags(ids).await.map_err(Error::store)?
    };

    Ok(project_articles(viewer, rows, tags))
  }

  async fn reread(&self, viewer: Option<&Viewer>, article_id: Uuid) -> Result<Option<ArticleView>> {
    let found = self
      .project(viewer, &ArticleQuery::single(article_id))
      .await?
      .into_iter()
      .next();
    if found.is_none() {
      warn!(article = %article_id, "article vanished before re-read");
    }
    Ok(found)
  }

  /// Re-read a single article for `viewer`.
  async fn view(&self, viewer: Option<&Viewer>, article_id: Uuid) -> Result<ArticleView> {
    self
      .reread(viewer, article_id)
      .await?
      .ok_or_else(|| Error::not_found(format!("article {article_id}")))
  }

  /// The stored article behind `slug`, without social facts. Used for
  /// authorship checks.
  pub async fn article_by_slug(&self, slug: &str) -> Result<Article> {
    self
      .store
      .find_article_by_slug(slug.to_owned())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(format!("article {slug:?}")))
  }

  /// Articles matching `filter`, newest first.
  pub async fn list_articles(
    &self,
    viewer: Option<&Viewer>,
    filter: ArticleFilter,
    page: Pagination,
  ) -> Result<ArticleList> {
    let query = ArticleQuery { filter: filter.normalized(), page, ..Default::default() };
    let articles = self.project(viewer, &query).await?;
    debug!(count = articles.len(), page = page.page(), "listed articles");
    Ok(articles.into())
  }

  /// Articles by authors `viewer` follows. Following nobody yields an empty
  /// feed.
  pub async fn feed(&self, viewer: &Viewer, page: Pagination) -> Result<ArticleList> {
    let query = ArticleQuery { followed_by: Some(viewer.user_id), page, ..Default::default() };
    let articles = self.project(Some(viewer), &query).await?;
    debug!(viewer = %viewer.username, count = articles.len(), "built feed");
    Ok(articles.into())
  }

  pub async fn get_article(&self, viewer: Option<&Viewer>, slug: &str) -> Result<ArticleView> {
    let article = self.article_by_slug(slug).await?;
    self.view(viewer, article.article_id).await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Create an article authored by `viewer`. The slug is derived from the
  /// title and is not checked for uniqueness.
  pub async fn create_article(&self, viewer: &Viewer, input: CreateArticle) -> Result<ArticleView> {
    input.validate()?;

    let new = NewArticle {
      author_id:   viewer.user_id,
      slug:        generate_slug(&input.title),
      title:       input.title,
      description: input.description,
      body:        input.body,
      tag_list:    input.tag_list,
      created_at:  Utc::now(),
    };

    let article = self.store.create_article(new).await.map_err(Error::store)?;
    debug!(slug = %article.slug, author = %viewer.username, "created article");

    // The row was just written; losing it here is a store fault.
    self
      .reread(Some(viewer), article.article_id)
      .await?
      .ok_or_else(|| Error::Vanished(format!("article {}", article.article_id)))
  }

  /// Apply a partial update. A new title also changes the slug.
  pub async fn update_article(
    &self,
    viewer: &Viewer,
    slug: &str,
    update: UpdateArticle,
  ) -> Result<ArticleView> {
    let article = self.article_by_slug(slug).await?;
    let changes = update.apply(&article, Utc::now());
    let new_slug = changes.slug.clone();

    let updated = self
      .store
      .update_article(article.article_id, changes)
      .await
      .map_err(Error::store)?;
    if !updated {
      return Err(Error::not_found(format!("article {slug:?}")));
    }
    debug!(from = %slug, to = %new_slug, "updated article");

    self.view(Some(viewer), article.article_id).await
  }

  /// Delete by slug. Deleting a missing slug succeeds.
  pub async fn delete_article(&self, slug: &str) -> Result<()> {
    let removed = self
      .store
      .delete_article_by_slug(slug.to_owned())
      .await
      .map_err(Error::store)?;
    debug!(%slug, removed, "deleted article");
    Ok(())
  }

  /// Record that `viewer` favorites the article. Repeating is harmless.
  pub async fn favorite(&self, viewer: &Viewer, slug: &str) -> Result<ArticleView> {
    let article = self.article_by_slug(slug).await?;
    self
      .store
      .favorite(viewer.user_id, article.article_id)
      .await
      .map_err(Error::store)?;
    self.view(Some(viewer), article.article_id).await
  }

  /// Remove `viewer`'s favorite edge, if there is one.
  pub async fn unfavorite(&self, viewer: &Viewer, slug: &str) -> Result<ArticleView> {
    let article = self.article_by_slug(slug).await?;
    self
      .store
      .unfavorite(viewer.user_id, article.article_id)
      .await
      .map_err(Error::store)?;
    self.view(Some(viewer), article.article_id).await
  }

  /// Every tag name in use, sorted.
  pub async fn tags(&self) -> Result<Vec<String>> {
    self.store.list_tags().await.map_err(Error::store)
  }
}
