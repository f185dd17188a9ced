//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has the RealWorld shape `{"errors": {"<field>": [..]}}`.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use scribe_core::ValidationErrors;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  /// Missing, malformed, or unknown token.
  #[error("unauthorized")]
  Unauthorized,

  /// Authenticated, but not the owner of the target.
  #[error("forbidden")]
  Forbidden,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal(Box::new(err))
  }
}

impl From<scribe_core::Error> for ApiError {
  fn from(err: scribe_core::Error) -> Self {
    match err {
      scribe_core::Error::NotFound(_) => ApiError::NotFound(err.to_string()),
      scribe_core::Error::Validation(errors) => ApiError::Validation(errors),
      scribe_core::Error::Vanished(_) => ApiError::Internal(err.to_string().into()),
      scribe_core::Error::Store(e) => ApiError::Internal(e),
    }
  }
}

impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self { ApiError::Validation(errors) }
}

fn body_error(status: StatusCode, message: &str) -> Response {
  (status, Json(json!({ "errors": { "body": [message] } }))).into_response()
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => body_error(StatusCode::NOT_FOUND, &m),
      ApiError::Validation(errors) => {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors }))).into_response()
      }
      ApiError::Unauthorized => {
        let mut res = body_error(StatusCode::UNAUTHORIZED, "unauthorized");
        res
          .headers_mut()
          .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
        res
      }
      ApiError::Forbidden => body_error(StatusCode::FORBIDDEN, "forbidden"),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        body_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
      }
    }
  }
}
