//! Identity context: password hashing, session tokens, and the extractors
//! that turn an `Authorization` header into a viewer.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand_core::{OsRng, RngCore as _};
use scribe_core::{
  BlogService, BlogStore,
  user::{User, Viewer},
};
use sha2::{Digest as _, Sha256};

use crate::error::ApiError;

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}").into()))
}

/// False for a wrong password and for an unparsable stored hash.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// A fresh opaque bearer token: 32 random bytes, URL-safe base64.
pub fn new_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

/// The hex SHA-256 digest under which a token's session is stored.
pub fn token_digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

/// The token from `Authorization: Token <t>` or `Authorization: Bearer <t>`.
///
/// `Ok(None)` when the header is absent; `Err` when it is present but
/// unusable.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };
  let value = value.to_str().map_err(|_| ApiError::Unauthorized)?;

  let token = value
    .strip_prefix("Token ")
    .or_else(|| value.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or(ApiError::Unauthorized)?;
  Ok(Some(token))
}

/// Create a session for `user` and return its bearer token.
pub async fn issue_token<S: BlogStore>(
  service: &BlogService<S>,
  user: &User,
) -> Result<String, ApiError> {
  let token = new_token();
  service
    .store()
    .create_session(user.user_id, token_digest(&token))
    .await
    .map_err(ApiError::store)?;
  Ok(token)
}

async fn resolve<S: BlogStore>(
  service: &BlogService<S>,
  token: &str,
) -> Result<User, ApiError> {
  service
    .store()
    .find_session_user(token_digest(token))
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// An authenticated request. Rejects with 401 otherwise.
pub struct CurrentUser {
  pub user:  User,
  /// The raw bearer token, echoed back in user responses.
  pub token: String,
}

impl CurrentUser {
  pub fn viewer(&self) -> Viewer { self.user.viewer() }
}

impl<S> FromRequestParts<BlogService<S>> for CurrentUser
where
  S: BlogStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &BlogService<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?.ok_or(ApiError::Unauthorized)?;
    let user = resolve(state, token).await?;
    Ok(CurrentUser { user, token: token.to_owned() })
  }
}

/// An optionally authenticated request. No header means anonymous; a header
/// with an unknown token is still a 401.
pub struct MaybeUser(pub Option<Viewer>);

impl<S> FromRequestParts<BlogService<S>> for MaybeUser
where
  S: BlogStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &BlogService<S>,
  ) -> Result<Self, Self::Rejection> {
    match bearer_token(&parts.headers)? {
      Some(token) => Ok(MaybeUser(Some(resolve(state, token).await?.viewer()))),
      None => Ok(MaybeUser(None)),
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  #[test]
  fn password_round_trip() {
    let hash = hash_password("hunter2").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter2", &hash));
    assert!(!verify_password("hunter3", &hash));
    assert!(!verify_password("hunter2", "not a phc string"));
  }

  #[test]
  fn tokens_are_unique_and_url_safe() {
    let (a, b) = (new_token(), new_token());
    assert_ne!(a, b);
    assert_eq!(a.len(), 43);
    assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
  }

  #[test]
  fn digest_is_stable_hex() {
    let d = token_digest("abc");
    assert_eq!(d, token_digest("abc"));
    assert_eq!(d.len(), 64);
    assert_ne!(d, token_digest("abd"));
  }

  #[test]
  fn accepts_token_and_bearer_schemes() {
    assert_eq!(bearer_token(&headers("Token abc")).unwrap(), Some("abc"));
    assert_eq!(bearer_token(&headers("Bearer abc")).unwrap(), Some("abc"));
    assert_eq!(bearer_token(&HeaderMap::new()).unwrap(), None);
  }

  #[test]
  fn rejects_other_schemes() {
    assert!(matches!(bearer_token(&headers("Basic abc")), Err(ApiError::Unauthorized)));
    assert!(matches!(bearer_token(&headers("Token ")), Err(ApiError::Unauthorized)));
  }
}
