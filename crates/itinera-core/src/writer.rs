//! [`ItineraryWriter`]: the only path through which trips are created or
//! removed.

use std::sync::Arc;

use crate::{
  Error, Result,
  itinerary::{Trip, TripId, TripSpec},
  store::ItineraryStore,
};

/// Validates trip specs and hands them to the store as a single atomic write.
pub struct ItineraryWriter<S> {
  store: Arc<S>,
}

impl<S> Clone for ItineraryWriter<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: ItineraryStore> ItineraryWriter<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Validate `spec`, then persist the trip and its whole subtree.
  ///
  /// Validation failures are reported before the store is touched. A store
  /// rejection (e.g. two days sharing a `day_number`) rolls the entire
  /// subtree back.
  pub async fn create(&self, spec: TripSpec) -> Result<Trip> {
    spec.validate()?;
    for day_number in spec.days_beyond_duration() {
      tracing::warn!(
        region = %spec.region,
        name = %spec.name,
        day_number,
        duration_nights = spec.duration_nights,
        "day number exceeds trip duration"
      );
    }

    let trip = self.store.put_trip(spec).await.map_err(Into::into)?;
    tracing::info!(trip_id = trip.id, days = trip.days.len(), "created trip");
    Ok(trip)
  }

  /// Remove a trip and everything it owns.
  pub async fn delete(&self, id: TripId) -> Result<()> {
    if self.store.delete_trip(id).await.map_err(Into::into)? {
      tracing::info!(trip_id = id, "deleted trip");
      Ok(())
    } else {
      Err(Error::NotFound(id))
    }
  }
}
