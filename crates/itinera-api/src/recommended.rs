//! Handler for `GET /recommended`.
//!
//! Trips are ranked by id since there is no popularity signal yet.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use itinera_core::{itinerary::Trip, store::ItineraryStore};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
  pub nights: i64,
}

/// `GET /recommended?nights=<n>`. An empty match is `[]`, not a 404.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  params: Result<Query<RecommendParams>, QueryRejection>,
) -> Result<Json<Vec<Trip>>, ApiError>
where
  S: ItineraryStore + 'static,
{
  let Query(params) = params?;
  Ok(Json(state.reader.find_by_nights(params.nights).await?))
}
