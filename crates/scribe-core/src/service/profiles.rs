use tracing::debug;

use super::BlogService;
use crate::{
  Error, Result,
  store::BlogStore,
  user::{Profile, User, Viewer},
};

impl<S: BlogStore> BlogService<S> {
  async fn user_by_username(&self, username: &str) -> Result<User> {
    self
      .store
      .find_user_by_username(username.to_owned())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(format!("profile {username:?}")))
  }

  pub async fn profile(&self, viewer: Option<&Viewer>, username: &str) -> Result<Profile> {
    let profile = self
      .store
      .get_profile(viewer.map(|v| v.user_id), username.to_owned())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(format!("profile {username:?}")))?;

    // The follow flag is only meaningful for an authenticated viewer.
    Ok(Profile { following: viewer.is_some() && profile.following, ..profile })
  }

  /// Add a follow edge from `viewer` to `username`. Following twice is a
  /// no-op.
  pub async fn follow(&self, viewer: &Viewer, username: &str) -> Result<Profile> {
    let target = self.user_by_username(username).await?;
    self
      .store
      .follow(viewer.user_id, target.user_id)
      .await
      .map_err(Error::store)?;
    debug!(follower = %viewer.username, followee = %username, "followed");
    self.profile(Some(viewer), username).await
  }

  pub async fn unfollow(&self, viewer: &Viewer, username: &str) -> Result<Profile> {
    let target = self.user_by_username(username).await?;
    self
      .store
      .unfollow(viewer.user_id, target.user_id)
      .await
      .map_err(Error::store)?;
    debug!(follower = %viewer.username, followee = %username, "unfollowed");
    self.profile(Some(viewer), username).await
  }
}
