//! Handlers for `/profiles/{username}` endpoints.

use axum::{
  Json,
  extract::{Path, State},
};
use scribe_core::{BlogService, BlogStore, user::Profile};
use serde::Serialize;

use crate::{
  auth::{CurrentUser, MaybeUser},
  error::ApiError,
};

#[derive(Debug, Serialize)]
pub struct ProfileBody {
  pub profile: Profile,
}

/// `GET /profiles/{username}`
pub async fn get_one<S>(
  State(service): State<BlogService<S>>,
  MaybeUser(viewer): MaybeUser,
  Path(username): Path<String>,
) -> Result<Json<ProfileBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let profile = service.profile(viewer.as_ref(), &username).await?;
  Ok(Json(ProfileBody { profile }))
}

/// `POST /profiles/{username}/follow`
pub async fn follow<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Path(username): Path<String>,
) -> Result<Json<ProfileBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let profile = service.follow(&current.viewer(), &username).await?;
  Ok(Json(ProfileBody { profile }))
}

/// `DELETE /profiles/{username}/follow`
pub async fn unfollow<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Path(username): Path<String>,
) -> Result<Json<ProfileBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let profile = service.unfollow(&current.viewer(), &username).await?;
  Ok(Json(ProfileBody { profile }))
}
