//! In-memory [`ItineraryStore`] used by the writer and reader unit tests.

use std::{
  collections::HashSet,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use crate::{
  Error, Result,
  itinerary::{
    Accommodation, Activity, Day, DayId, Transfer, Trip, TripId, TripSpec,
  },
  store::{ItineraryStore, TripFilter},
};

#[derive(Default)]
pub struct MemoryStore {
  inner:     Mutex<Inner>,
  put_calls: AtomicUsize,
}

#[derive(Default)]
struct Inner {
  last_id: i64,
  trips:   Vec<Trip>,
}

impl Inner {
  fn next_id(&mut self) -> i64 {
    self.last_id += 1;
    self.last_id
  }
}

impl MemoryStore {
  pub fn put_calls(&self) -> usize { self.put_calls.load(Ordering::SeqCst) }

  pub fn is_empty(&self) -> bool { self.inner.lock().unwrap().trips.is_empty() }
}

impl ItineraryStore for MemoryStore {
  type Error = Error;

  async fn put_trip(&self, spec: TripSpec) -> Result<Trip> {
    self.put_calls.fetch_add(1, Ordering::SeqCst);

    let mut seen = HashSet::new();
    if !spec.days.iter().all(|d| seen.insert(d.day_number)) {
      return Err(Error::Integrity("duplicate day_number".into()));
    }

    let mut inner = self.inner.lock().unwrap();
    let trip_id = inner.next_id();
    let mut days = Vec::with_capacity(spec.days.len());
    for ds in spec.days {
      let id = inner.next_id();
      days.push(Day {
        id,
        day_number: ds.day_number,
        date: ds.date,
        accommodations: ds
          .accommodations
          .into_iter()
          .map(|a| Accommodation {
            id:       inner.next_id(),
            name:     a.name,
            location: a.location,
          })
          .collect(),
        transfers: ds
          .transfers
          .into_iter()
          .map(|t| Transfer {
            id:            inner.next_id(),
            mode:          t.mode,
            from_location: t.from_location,
            to_location:   t.to_location,
          })
          .collect(),
        activities: ds
          .activities
          .into_iter()
          .map(|a| Activity {
            id:          inner.next_id(),
            name:        a.name,
            description: a.description,
          })
          .collect(),
      });
    }
    days.sort_by_key(|d| d.day_number);

    let trip = Trip {
      id: trip_id,
      region: spec.region,
      name: spec.name,
      duration_nights: spec.duration_nights,
      days,
    };
    inner.trips.push(trip.clone());
    Ok(trip)
  }

  async fn get_trip(&self, id: TripId) -> Result<Option<Trip>> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.trips.iter().find(|t| t.id == id).cloned())
  }

  async fn get_day(&self, id: DayId) -> Result<Option<Day>> {
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .trips
        .iter()
        .flat_map(|t| &t.days)
        .find(|d| d.id == id)
        .cloned(),
    )
  }

  async fn list_trips(&self, filter: &TripFilter) -> Result<Vec<Trip>> {
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .trips
        .iter()
        .filter(|t| {
          filter
            .duration_nights
            .is_none_or(|n| i64::from(t.duration_nights) == n)
            && filter.region.as_deref().is_none_or(|r| t.region == r)
        })
        .cloned()
        .collect(),
    )
  }

  async fn delete_trip(&self, id: TripId) -> Result<bool> {
    let mut inner = self.inner.lock().unwrap();
    let before = inner.trips.len();
    inner.trips.retain(|t| t.id != id);
    Ok(inner.trips.len() != before)
  }
}
