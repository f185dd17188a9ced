//! Accounts, the requesting identity, and author profiles.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A persisted account. Credentials are opaque to the core; only the API
/// layer interprets `password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  pub email:         String,
  /// argon2 PHC string.
  pub password_hash: String,
  pub bio:           Option<String>,
  pub image:         Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl User {
  pub fn viewer(&self) -> Viewer {
    Viewer {
      user_id:  self.user_id,
      username: self.username.clone(),
      bio:      self.bio.clone(),
      image:    self.image.clone(),
    }
  }
}

/// Input to [`crate::store::BlogStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
}

/// The authenticated identity making a request.
///
/// Anonymous requests are modelled as `Option<&Viewer>::None`; every core
/// operation takes the viewer explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
  pub user_id:  Uuid,
  pub username: String,
  pub bio:      Option<String>,
  pub image:    Option<String>,
}

/// An author as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
  pub username:  String,
  pub bio:       Option<String>,
  pub image:     Option<String>,
  /// True iff the viewer follows this user; always false for anonymous
  /// viewers.
  pub following: bool,
}

/// Author columns as they come out of a join, before the follow flag is
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRow {
  pub username: String,
  pub bio:      Option<String>,
  pub image:    Option<String>,
}

impl AuthorRow {
  pub fn into_profile(self, following: bool) -> Profile {
    Profile {
      username: self.username,
      bio: self.bio,
      image: self.image,
      following,
    }
  }
}
