//! Error type for `scribe-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row written in this call could not be read back.
  #[error("{0} vanished after insert")]
  Vanished(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
