//! Handlers for `/articles` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/articles` | `?tag`, `?author`, `?favorited`, `?page`, `?limit` |
//! | `POST`   | `/articles` | Returns 201 |
//! | `GET`    | `/articles/feed` | Authors the caller follows |
//! | `GET`    | `/articles/{slug}` | 404 if not found |
//! | `PUT`    | `/articles/{slug}` | Author only |
//! | `DELETE` | `/articles/{slug}` | Author only; missing slug is a no-op |
//! | `POST`   | `/articles/{slug}/favorite` | Idempotent |
//! | `DELETE` | `/articles/{slug}/favorite` | Idempotent |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use scribe_core::{
  BlogService, BlogStore,
  article::{ArticleList, ArticleView, CreateArticle, UpdateArticle},
  query::{ArticleFilter, Pagination},
};
use serde::{Deserialize, Serialize};

use crate::{
  auth::{CurrentUser, MaybeUser},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
  pub article: T,
}

#[derive(Debug, Serialize)]
pub struct ArticleBody {
  pub article: ArticleView,
}

// ─── List / feed ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub tag:       Option<String>,
  pub author:    Option<String>,
  /// Username of a user who favorited the article.
  pub favorited: Option<String>,
  pub page:      Option<i64>,
  pub limit:     Option<i64>,
}

/// `GET /articles`
pub async fn list<S>(
  State(service): State<BlogService<S>>,
  MaybeUser(viewer): MaybeUser,
  Query(params): Query<ListParams>,
) -> Result<Json<ArticleList>, ApiError>
where
  S: BlogStore + 'static,
{
  let filter = ArticleFilter {
    tag:          params.tag,
    author:       params.author,
    favorited_by: params.favorited,
  };
  let page = Pagination::new(params.page, params.limit);
  Ok(Json(service.list_articles(viewer.as_ref(), filter, page).await?))
}

#[derive(Debug, Deserialize, Default)]
pub struct PageParams {
  pub page:  Option<i64>,
  pub limit: Option<i64>,
}

/// `GET /articles/feed`
pub async fn feed<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Query(params): Query<PageParams>,
) -> Result<Json<ArticleList>, ApiError>
where
  S: BlogStore + 'static,
{
  let page = Pagination::new(params.page, params.limit);
  Ok(Json(service.feed(&current.viewer(), page).await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateFields {
  pub title:       String,
  pub description: String,
  pub body:        String,
  pub tag_list:    Vec<String>,
}

/// `POST /articles`
pub async fn create<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Json(body): Json<Envelope<CreateFields>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BlogStore + 'static,
{
  let fields = body.article;
  let input = CreateArticle {
    title:       fields.title,
    description: fields.description,
    body:        fields.body,
    tag_list:    fields.tag_list,
  };
  let article = service.create_article(&current.viewer(), input).await?;
  Ok((StatusCode::CREATED, Json(ArticleBody { article })))
}

// ─── Single article ──────────────────────────────────────────────────────────

/// `GET /articles/{slug}`
pub async fn get_one<S>(
  State(service): State<BlogService<S>>,
  MaybeUser(viewer): MaybeUser,
  Path(slug): Path<String>,
) -> Result<Json<ArticleBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let article = service.get_article(viewer.as_ref(), &slug).await?;
  Ok(Json(ArticleBody { article }))
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdateFields {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub body:        Option<String>,
}

/// `PUT /articles/{slug}`
pub async fn update<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  Json(body): Json<Envelope<UpdateFields>>,
) -> Result<Json<ArticleBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let existing = service.article_by_slug(&slug).await?;
  if existing.author_id != current.user.user_id {
    return Err(ApiError::Forbidden);
  }

  let fields = body.article;
  let update = UpdateArticle {
    title:       fields.title,
    description: fields.description,
    body:        fields.body,
  };
  let article = service.update_article(&current.viewer(), &slug, update).await?;
  Ok(Json(ArticleBody { article }))
}

/// `DELETE /articles/{slug}`
pub async fn remove<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: BlogStore + 'static,
{
  match service.article_by_slug(&slug).await {
    Ok(existing) if existing.author_id != current.user.user_id => {
      return Err(ApiError::Forbidden);
    }
    Ok(_) | Err(scribe_core::Error::NotFound(_)) => {}
    Err(e) => return Err(e.into()),
  }

  service.delete_article(&slug).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Favorites ───────────────────────────────────────────────────────────────

/// `POST /articles/{slug}/favorite`
pub async fn favorite<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<Json<ArticleBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let article = service.favorite(&current.viewer(), &slug).await?;
  Ok(Json(ArticleBody { article }))
}

/// `DELETE /articles/{slug}/favorite`
pub async fn unfavorite<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<Json<ArticleBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let article = service.unfavorite(&current.viewer(), &slug).await?;
  Ok(Json(ArticleBody { article }))
}
