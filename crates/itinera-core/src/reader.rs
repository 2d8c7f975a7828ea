//! [`ItineraryReader`]: read-only, hydrated views over the store.

use std::sync::Arc;

use crate::{
  Error, Result,
  itinerary::{Trip, TripId},
  store::{ItineraryStore, TripFilter},
};

pub struct ItineraryReader<S> {
  store: Arc<S>,
}

impl<S> Clone for ItineraryReader<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: ItineraryStore> ItineraryReader<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// The hydrated trip with `id`, or [`Error::NotFound`].
  pub async fn get(&self, id: TripId) -> Result<Trip> {
    self
      .store
      .get_trip(id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound(id))
  }

  /// Every trip lasting exactly `nights`, ordered by id. Empty when nothing
  /// matches.
  pub async fn find_by_nights(&self, nights: i64) -> Result<Vec<Trip>> {
    self.find(&TripFilter::nights(nights)).await
  }

  /// Every trip, ordered by id.
  pub async fn list_all(&self) -> Result<Vec<Trip>> {
    self.find(&TripFilter::default()).await
  }

  pub async fn find(&self, filter: &TripFilter) -> Result<Vec<Trip>> {
    self.store.list_trips(filter).await.map_err(Into::into)
  }
}
