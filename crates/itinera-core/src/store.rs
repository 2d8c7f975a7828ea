//! The `ItineraryStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `itinera-store-sqlite`).
//! The writer, the reader, and both front ends depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::itinerary::{Day, DayId, Trip, TripId, TripSpec};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ItineraryStore::list_trips`]. Unset fields match
/// everything.
///
/// `duration_nights` is signed so that any integer a client sends is a valid
/// filter; values no trip can have simply match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripFilter {
  pub duration_nights: Option<i64>,
  pub region:          Option<String>,
}

impl TripFilter {
  pub fn nights(n: i64) -> Self {
    Self {
      duration_nights: Some(n),
      ..Self::default()
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an itinerary store backend.
///
/// A trip and its whole subtree are written in one atomic unit and are never
/// updated afterwards; removal is whole-subtree only. Absence is reported as
/// `None`/`false` rather than as an error, leaving the choice of error to the
/// caller.
pub trait ItineraryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Persist `spec` as a trip with all of its days and their children,
  /// assigning every identifier. Nothing is visible to readers unless the
  /// whole subtree was written.
  fn put_trip(
    &self,
    spec: TripSpec,
  ) -> impl Future<Output = Result<Trip, Self::Error>> + Send + '_;

  /// Retrieve a hydrated trip by id. Returns `None` if not found.
  fn get_trip(
    &self,
    id: TripId,
  ) -> impl Future<Output = Result<Option<Trip>, Self::Error>> + Send + '_;

  /// Retrieve a hydrated day by id. Returns `None` if not found.
  fn get_day(
    &self,
    id: DayId,
  ) -> impl Future<Output = Result<Option<Day>, Self::Error>> + Send + '_;

  /// All hydrated trips matching `filter`, ordered by id ascending.
  fn list_trips<'a>(
    &'a self,
    filter: &'a TripFilter,
  ) -> impl Future<Output = Result<Vec<Trip>, Self::Error>> + Send + 'a;

  /// Remove a trip and everything it owns. Returns `false` if there was no
  /// such trip.
  fn delete_trip(
    &self,
    id: TripId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
