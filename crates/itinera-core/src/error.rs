//! Error types for `itinera-core`.

use thiserror::Error;

use crate::itinerary::TripId;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed input, rejected before storage is touched.
  #[error("validation failed: {0}")]
  Validation(String),

  /// The store refused a write because it would break a constraint.
  #[error("integrity violation: {0}")]
  Integrity(String),

  #[error("trip not found: {0}")]
  NotFound(TripId),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
