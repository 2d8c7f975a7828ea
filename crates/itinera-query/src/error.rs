//! Error type for the query service. Every variant is reported to the client
//! as a single-field JSON error payload; none of them stop the listener.

use std::time::Duration;

use serde_json::{Value, json};
use thiserror::Error;

/// Payload message for anything the client got wrong.
pub const INVALID_REQUEST: &str = "invalid request format";
/// Payload message for failures on our side of the connection.
pub const QUERY_FAILED: &str = "query failed";

#[derive(Debug, Error)]
pub enum QueryError {
  #[error("malformed request: {0}")]
  Protocol(#[source] serde_json::Error),

  #[error("request exceeds {0} bytes")]
  Oversized(usize),

  #[error("no complete request within {0:?}")]
  Timeout(Duration),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("lookup failed: {0}")]
  Store(#[from] itinera_core::Error),

  #[error("failed to encode response: {0}")]
  Encode(#[source] serde_json::Error),
}

impl QueryError {
  /// The JSON object sent back in place of a result set.
  pub fn payload(&self) -> Value {
    let message = match self {
      QueryError::Protocol(_)
      | QueryError::Oversized(_)
      | QueryError::Timeout(_)
      | QueryError::Io(_) => INVALID_REQUEST,
      QueryError::Store(_) | QueryError::Encode(_) => QUERY_FAILED,
    };
    json!({ "error": message })
  }
}

pub type Result<T, E = QueryError> = std::result::Result<T, E>;
