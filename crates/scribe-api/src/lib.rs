//! RealWorld-style JSON API for Scribe.
//!
//! Exposes an axum [`Router`] backed by a [`BlogService`] over any
//! [`BlogStore`]. Every route lives under `/api`.

pub mod articles;
pub mod auth;
pub mod comments;
pub mod error;
pub mod profiles;
pub mod tags;
pub mod users;

use std::path::PathBuf;

use axum::{
  Json, Router,
  routing::{delete, get, post},
};
use scribe_core::{BlogService, BlogStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SCRIBE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("scribe.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router for `service`.
pub fn router<S>(service: BlogService<S>) -> Router
where
  S: BlogStore + 'static,
{
  let api = Router::new()
    // Users
    .route("/users", post(users::register::<S>))
    .route("/users/login", post(users::login::<S>))
    .route("/users/logout", post(users::logout::<S>))
    .route("/user", get(users::current).put(users::update::<S>))
    // Profiles
    .route("/profiles/{username}", get(profiles::get_one::<S>))
    .route(
      "/profiles/{username}/follow",
      post(profiles::follow::<S>).delete(profiles::unfollow::<S>),
    )
    // Articles
    .route("/articles", get(articles::list::<S>).post(articles::create::<S>))
    .route("/articles/feed", get(articles::feed::<S>))
    .route(
      "/articles/{slug}",
      get(articles::get_one::<S>)
        .put(articles::update::<S>)
        .delete(articles::remove::<S>),
    )
    .route(
      "/articles/{slug}/favorite",
      post(articles::favorite::<S>).delete(articles::unfavorite::<S>),
    )
    // Comments
    .route(
      "/articles/{slug}/comments",
      get(comments::list::<S>).post(comments::create::<S>),
    )
    .route("/articles/{slug}/comments/{id}", delete(comments::remove::<S>))
    // Tags
    .route("/tags", get(tags::list::<S>))
    .route("/healthchecker", get(healthchecker));

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(service)
}

/// `GET /api/healthchecker`
async fn healthchecker() -> Json<Value> { Json(json!({ "status": "success" })) }
