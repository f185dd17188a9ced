//! Handlers for accounts and sessions.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Register; returns 201 + token |
//! | `POST` | `/users/login` | Email is matched case-insensitively |
//! | `POST` | `/users/logout` | Revokes the presented token |
//! | `GET`  | `/user` | The current account |
//! | `PUT`  | `/user` | Partial update |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use scribe_core::{
  BlogService, BlogStore, ValidationErrors,
  user::{NewUser, User},
};
use serde::{Deserialize, Serialize};

use crate::{
  auth::{CurrentUser, hash_password, issue_token, token_digest, verify_password},
  error::ApiError,
};

// ─── Bodies ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
  pub user: T,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RegisterFields {
  pub username: String,
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoginFields {
  pub email:    String,
  pub password: String,
}

/// Absent fields keep their stored value.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdateFields {
  pub username: Option<String>,
  pub email:    Option<String>,
  pub password: Option<String>,
  pub bio:      Option<String>,
  pub image:    Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserView {
  pub email:    String,
  pub username: String,
  pub bio:      Option<String>,
  pub image:    Option<String>,
  pub token:    String,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
  pub user: UserView,
}

impl UserBody {
  fn new(user: User, token: String) -> Self {
    Self {
      user: UserView {
        email: user.email,
        username: user.username,
        bio: user.bio,
        image: user.image,
        token,
      },
    }
  }
}

fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// Record "has already been taken" unless the owner of `value` is `owner`.
async fn check_taken<S: BlogStore>(
  service: &BlogService<S>,
  errors: &mut ValidationErrors,
  owner: Option<&User>,
  username: Option<&str>,
  email: Option<&str>,
) -> Result<(), ApiError> {
  let is_other = |found: Option<User>| match (found, owner) {
    (Some(found), Some(owner)) => found.user_id != owner.user_id,
    (Some(_), None) => true,
    (None, _) => false,
  };

  if let Some(username) = username {
    let found = service
      .store()
      .find_user_by_username(username.to_owned())
      .await
      .map_err(ApiError::store)?;
    if is_other(found) {
      errors.add("username", "has already been taken");
    }
  }
  if let Some(email) = email {
    let found = service
      .store()
      .find_user_by_email(email.to_owned())
      .await
      .map_err(ApiError::store)?;
    if is_other(found) {
      errors.add("email", "has already been taken");
    }
  }
  Ok(())
}

// ─── Register ────────────────────────────────────────────────────────────────

/// `POST /users`
pub async fn register<S>(
  State(service): State<BlogService<S>>,
  Json(body): Json<Envelope<RegisterFields>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BlogStore + 'static,
{
  let fields = body.user;
  let username = fields.username.trim().to_owned();
  let email = normalize_email(&fields.email);

  let mut errors = ValidationErrors::default();
  errors.require("username", &username);
  errors.require("email", &email);
  errors.require("password", &fields.password);
  errors.into_result()?;

  let mut errors = ValidationErrors::default();
  check_taken(&service, &mut errors, None, Some(&username), Some(&email)).await?;
  errors.into_result()?;

  let user = service
    .store()
    .create_user(NewUser {
      username,
      email,
      password_hash: hash_password(&fields.password)?,
    })
    .await
    .map_err(ApiError::store)?;
  tracing::info!(username = %user.username, "registered user");

  let token = issue_token(&service, &user).await?;
  Ok((StatusCode::CREATED, Json(UserBody::new(user, token))))
}

// ─── Login / logout ──────────────────────────────────────────────────────────

/// `POST /users/login`
pub async fn login<S>(
  State(service): State<BlogService<S>>,
  Json(body): Json<Envelope<LoginFields>>,
) -> Result<Json<UserBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let fields = body.user;
  let invalid = || ApiError::Validation(ValidationErrors::single("email or password", "is invalid"));

  let user = service
    .store()
    .find_user_by_email(normalize_email(&fields.email))
    .await
    .map_err(ApiError::store)?
    .ok_or_else(invalid)?;

  if !verify_password(&fields.password, &user.password_hash) {
    return Err(invalid());
  }

  let token = issue_token(&service, &user).await?;
  Ok(Json(UserBody::new(user, token)))
}

/// `POST /users/logout`
pub async fn logout<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
) -> Result<StatusCode, ApiError>
where
  S: BlogStore + 'static,
{
  service
    .store()
    .delete_session(token_digest(&current.token))
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Current user ────────────────────────────────────────────────────────────

/// `GET /user`
pub async fn current(current: CurrentUser) -> Json<UserBody> {
  Json(UserBody::new(current.user, current.token))
}

/// `PUT /user`
pub async fn update<S>(
  State(service): State<BlogService<S>>,
  current: CurrentUser,
  Json(body): Json<Envelope<UpdateFields>>,
) -> Result<Json<UserBody>, ApiError>
where
  S: BlogStore + 'static,
{
  let fields = body.user;
  let username = fields.username.map(|u| u.trim().to_owned());
  let email = fields.email.as_deref().map(normalize_email);

  let mut errors = ValidationErrors::default();
  if let Some(username) = &username {
    errors.require("username", username);
  }
  if let Some(email) = &email {
    errors.require("email", email);
  }
  if let Some(password) = &fields.password {
    errors.require("password", password);
  }
  errors.into_result()?;

  let mut errors = ValidationErrors::default();
  check_taken(
    &service,
    &mut errors,
    Some(&current.user),
    username.as_deref(),
    email.as_deref(),
  )
  .await?;
  errors.into_result()?;

  let CurrentUser { user, token } = current;
  let password_hash = match fields.password {
    Some(password) => hash_password(&password)?,
    None => user.password_hash.clone(),
  };
  // An empty string clears the optional profile fields.
  let clearable = |new: Option<String>, old: Option<String>| match new {
    Some(v) if v.trim().is_empty() => None,
    Some(v) => Some(v),
    None => old,
  };

  let updated = User {
    username: username.unwrap_or(user.username),
    email: email.unwrap_or(user.email),
    password_hash,
    bio: clearable(fields.bio, user.bio),
    image: clearable(fields.image, user.image),
    ..user
  };

  let updated = service
    .store()
    .update_user(updated)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(UserBody::new(updated, token)))
}
