//! Raw row types and their reassembly into hydrated trips.
//!
//! Rows are read inside a connection call and grouped outside of it, so the
//! connection thread only ever runs plain `SELECT`s.

use std::collections::HashMap;

use itinera_core::itinerary::{
  Accommodation, Activity, Day, DayId, Transfer, Trip, TripId,
};

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `trips` row.
pub struct RawTrip {
  pub id:              TripId,
  pub region:          String,
  pub name:            String,
  pub duration_nights: u32,
}

/// A `days` row.
pub struct RawDay {
  pub id:         DayId,
  pub trip_id:    TripId,
  pub day_number: u32,
  pub date:       Option<String>,
}

/// A child row of any of the three per-day tables, tagged with its day.
pub struct RawChild<T> {
  pub day_id: DayId,
  pub child:  T,
}

/// Every row needed to hydrate a set of days, as read from one snapshot.
/// Days are expected in `day_number` order and children in id order.
#[derive(Default)]
pub struct RawDays {
  pub days:           Vec<RawDay>,
  pub accommodations: Vec<RawChild<Accommodation>>,
  pub transfers:      Vec<RawChild<Transfer>>,
  pub activities:     Vec<RawChild<Activity>>,
}

/// Every row needed to hydrate a set of trips. Trips are expected in id
/// order.
#[derive(Default)]
pub struct RawTrips {
  pub trips: Vec<RawTrip>,
  pub days:  RawDays,
}

fn group<T>(rows: Vec<RawChild<T>>) -> HashMap<DayId, Vec<T>> {
  let mut by_day: HashMap<DayId, Vec<T>> = HashMap::new();
  for row in rows {
    by_day.entry(row.day_id).or_default().push(row.child);
  }
  by_day
}

impl RawDays {
  /// Assemble hydrated days, each paired with the trip that owns it.
  pub fn into_days(self) -> Vec<(TripId, Day)> {
    let mut accommodations = group(self.accommodations);
    let mut transfers = group(self.transfers);
    let mut activities = group(self.activities);

    self
      .days
      .into_iter()
      .map(|raw| {
        (raw.trip_id, Day {
          id: raw.id,
          day_number: raw.day_number,
          date: raw.date,
          accommodations: accommodations.remove(&raw.id).unwrap_or_default(),
          transfers: transfers.remove(&raw.id).unwrap_or_default(),
          activities: activities.remove(&raw.id).unwrap_or_default(),
        })
      })
      .collect()
  }
}

impl RawTrips {
  pub fn into_trips(self) -> Vec<Trip> {
    let mut days_by_trip: HashMap<TripId, Vec<Day>> = HashMap::new();
    for (trip_id, day) in self.days.into_days() {
      days_by_trip.entry(trip_id).or_default().push(day);
    }

    self
      .trips
      .into_iter()
      .map(|raw| Trip {
        days:            days_by_trip.remove(&raw.id).unwrap_or_default(),
        id:              raw.id,
        region:          raw.region,
        name:            raw.name,
        duration_nights: raw.duration_nights,
      })
      .collect()
  }
}
