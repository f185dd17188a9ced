//! Handlers for `/articles/{slug}/comments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/articles/{slug}/comments` | Oldest first |
//! | `POST`   | `/articles/{slug}/comments` | Returns 201 |
//! | `DELETE` | `/articles/{slug}/comments/{id}` | Comment author only; missing id is a no-op |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use scribe_core::{BlogService, BlogStore, comment::CommentView};
use serde::{Deserialize, Serialize};

use crate::{
  auth::{CurrentUser, MaybeUser},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct Envelope {
  pub comment: CommentFields,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CommentFields {
  pub body: String,
}

#[derive(Debug, Serialize)]
pub struct CommentBody {
  pub comment: CommentView,
}

#[derive(Debug, Serialize)]
pub struct CommentsBody {
  pub comments: Vec<CommentView>,
}

/// `GET /articles/{slug}/comments`
pub async fn list<S>(
  State(service): State<BlogService<S>>,
  MaybeUser(viewer): MaybeUser,
  Path(slug): Path<String>,
) -> Result<Json<CommentsBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let comments = service.list_comments(viewer.as_ref(), &slug).await?;
  Ok(Json(CommentsBody { comments }))
}

/// `POST /articles/{slug}/comments`
pub async fn create<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  Json(body): Json<Envelope>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BlogStore + 'static,
{
  let comment = service
    .add_comment(&current.viewer(), &slug, body.comment.body)
    .await?;
  Ok((StatusCode::CREATED, Json(CommentBody { comment })))
}

/// `DELETE /articles/{slug}/comments/{id}`
pub async fn remove<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Path((_slug, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError>
where
  S: BlogStore + 'static,
{
  match service.comment(id).await {
    Ok(existing) if existing.author_id != current.user.user_id => {
      return Err(ApiError::Forbidden);
    }
    Ok(_) | Err(scribe_core::Error::NotFound(_)) => {}
    Err(e) => return Err(e.into()),
  }

  service.delete_comment(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
