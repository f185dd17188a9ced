//! Error types for `scribe-core`.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A slug, id, or username has no matching row.
  #[error("{0} not found")]
  NotFound(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  /// A row written by this operation was missing on the re-read.
  #[error("{0} vanished after write")]
  Vanished(String),

  /// The graph store reported an unexpected failure.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(what: impl Into<String>) -> Self { Self::NotFound(what.into()) }

  /// Wrap a backend error; used as `.map_err(Error::store)`.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Validation ──────────────────────────────────────────────────────────────

/// Messages keyed by the offending input field.
///
/// Serialises as `{"title": ["can't be blank"], ...}`, the shape RealWorld
/// clients expect under `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = Self::default();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  /// Record `field` as blank if `value` is empty after trimming.
  pub fn require(&mut self, field: &str, value: &str) {
    if value.trim().is_empty() {
      self.add(field, "can't be blank");
    }
  }

  pub fn merge(&mut self, other: ValidationErrors) {
    for (field, messages) in other.0 {
      self.0.entry(field).or_default().extend(messages);
    }
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn messages(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or_default()
  }

  /// `Ok(())` when nothing was recorded, otherwise [`Error::Validation`].
  pub fn into_result(self) -> Result<()> {
    if self.is_empty() { Ok(()) } else { Err(Error::Validation(self)) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field} {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn require_flags_blank_values_only() {
    let mut errors = ValidationErrors::default();
    errors.require("title", "  ");
    errors.require("body", "text");
    assert_eq!(errors.messages("title"), ["can't be blank"]);
    assert!(errors.messages("body").is_empty());
  }

  #[test]
  fn merge_appends_per_field() {
    let mut a = ValidationErrors::single("email", "is invalid");
    a.merge(ValidationErrors::single("email", "has already been taken"));
    assert_eq!(a.messages("email").len(), 2);
    assert_eq!(
      serde_json::to_value(&a).unwrap(),
      serde_json::json!({ "email": ["is invalid", "has already been taken"] })
    );
  }

  #[test]
  fn empty_errors_are_ok() {
    assert!(ValidationErrors::default().into_result().is_ok());
    assert!(matches!(
      ValidationErrors::single("body", "can't be blank").into_result(),
      Err(Error::Validation(_))
    ));
  }
}
