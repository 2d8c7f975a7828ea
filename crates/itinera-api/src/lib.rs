//! JSON REST API for Itinera.
//!
//! Exposes an axum [`Router`] backed by any
//! [`itinera_core::store::ItineraryStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/health` | Liveness marker |
//! | `*`    | `/itineraries[/{id}]` | See [`itineraries`] |
//! | `GET`  | `/recommended?nights=<n>` | See [`recommended`] |
//!
//! The collection paths also answer with a trailing slash.

pub mod error;
pub mod itineraries;
pub mod recommended;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use itinera_core::{ItineraryReader, ItineraryWriter, store::ItineraryStore};
use serde_json::{Value, json};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers. Both halves wrap the same
/// store handle.
pub struct AppState<S> {
  pub writer: ItineraryWriter<S>,
  pub reader: ItineraryReader<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      writer: self.writer.clone(),
      reader: self.reader.clone(),
    }
  }
}

impl<S: ItineraryStore> AppState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      writer: ItineraryWriter::new(Arc::clone(&store)),
      reader: ItineraryReader::new(store),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ItineraryStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route(
      "/itineraries",
      get(itineraries::list::<S>).post(itineraries::create::<S>),
    )
    .route(
      "/itineraries/",
      get(itineraries::list::<S>).post(itineraries::create::<S>),
    )
    .route(
      "/itineraries/{id}",
      get(itineraries::get_one::<S>).delete(itineraries::delete_one::<S>),
    )
    .route("/recommended", get(recommended::handler::<S>))
    .route("/recommended/", get(recommended::handler::<S>))
    .with_state(AppState::new(store))
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
