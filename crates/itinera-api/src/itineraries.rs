//! Handlers for `/itineraries` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/itineraries` | Optional `?nights=<n>` and `?region=<name>` |
//! | `POST`   | `/itineraries` | Body: [`TripSpec`]; returns 201 + hydrated trip |
//! | `GET`    | `/itineraries/{id}` | 404 if not found |
//! | `DELETE` | `/itineraries/{id}` | Removes the trip and everything it owns; 404 if not found |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use itinera_core::{
  itinerary::{Trip, TripId, TripSpec},
  store::{ItineraryStore, TripFilter},
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub nights: Option<i64>,
  pub region: Option<String>,
}

/// `GET /itineraries[?nights=<n>][&region=<name>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Trip>>, ApiError>
where
  S: ItineraryStore + 'static,
{
  let Query(params) = params?;
  let filter = TripFilter {
    duration_nights: params.nights,
    region:          params.region,
  };
  Ok(Json(state.reader.find(&filter).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /itineraries`, answered with 201 and the stored [`Trip`].
///
/// A body that does not deserialise into a [`TripSpec`] is a 400, the same
/// as one that fails validation.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<TripSpec>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ItineraryStore + 'static,
{
  let Json(spec) = body?;
  let trip = state.writer.create(spec).await?;
  Ok((StatusCode::CREATED, Json(trip)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /itineraries/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  id: Result<Path<TripId>, PathRejection>,
) -> Result<Json<Trip>, ApiError>
where
  S: ItineraryStore + 'static,
{
  let Path(id) = id?;
  Ok(Json(state.reader.get(id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /itineraries/{id}`, answered with 204.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  id: Result<Path<TripId>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: ItineraryStore + 'static,
{
  let Path(id) = id?;
  state.writer.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
