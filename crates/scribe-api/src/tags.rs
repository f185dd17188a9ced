//! Handler for `GET /tags`.

use axum::{Json, extract::State};
use scribe_core::{BlogService, BlogStore};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct TagsBody {
  pub tags: Vec<String>,
}

/// `GET /tags`
pub async fn list<S>(State(service): State<BlogService<S>>) -> Result<Json<TagsBody>, ApiError>
where
  S: BlogStore + 'static,
{
  Ok(Json(TagsBody { tags: service.tags().await? }))
}
