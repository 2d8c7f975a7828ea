//! Error type for `itinera-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A `NOT NULL`, `CHECK`, `UNIQUE`, or foreign-key constraint rejected a
  /// write. The surrounding transaction has already been rolled back.
  #[error("integrity violation: {0}")]
  Integrity(String),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
        failure,
        message,
      )) if failure.code == rusqlite::ErrorCode::ConstraintViolation => {
        Error::Integrity(message.unwrap_or_else(|| failure.to_string()))
      }
      other => Error::Database(other),
    }
  }
}

impl From<Error> for itinera_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Integrity(m) => itinera_core::Error::Integrity(m),
      other => itinera_core::Error::Storage(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
