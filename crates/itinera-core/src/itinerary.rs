//! Itinerary types: the input specs accepted by the writer and the hydrated
//! records returned by the reader.
//!
//! A trip owns its days; a day owns its accommodations, transfers, and
//! activities. Hydrated records carry ownership by nesting, so parent keys
//! never appear in these shapes.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub type TripId = i64;
pub type DayId = i64;
pub type AccommodationId = i64;
pub type TransferId = i64;
pub type ActivityId = i64;

// ─── Input specs ─────────────────────────────────────────────────────────────

/// A place to stay on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccommodationSpec {
  pub name:     String,
  pub location: String,
}

/// A movement between two places, e.g. a taxi from the airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSpec {
  /// Free-text transport mode, e.g. "Taxi" or "Ferry".
  pub mode:          String,
  pub from_location: String,
  pub to_location:   String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySpec {
  pub name:        String,
  pub description: Option<String>,
}

/// One numbered day of a trip and everything planned for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySpec {
  /// 1-based position of the day within the trip.
  pub day_number:     u32,
  /// Free-form label such as `2025-06-01` or `Day 1 - Monday`.
  pub date:           Option<String>,
  #[serde(default)]
  pub accommodations: Vec<AccommodationSpec>,
  #[serde(default)]
  pub transfers:      Vec<TransferSpec>,
  #[serde(default)]
  pub activities:     Vec<ActivitySpec>,
}

/// Input to [`crate::writer::ItineraryWriter::create`]. Identifiers are
/// always assigned by the store and are not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSpec {
  pub region:          String,
  pub name:            String,
  pub duration_nights: u32,
  #[serde(default)]
  pub days:            Vec<DaySpec>,
}

impl TripSpec {
  /// Check every field constraint, reporting the first violation with the
  /// path of the offending field.
  ///
  /// Duplicate day numbers are left to the store's unique index.
  pub fn validate(&self) -> Result<()> {
    require("region", &self.region)?;
    require("name", &self.name)?;
    if self.duration_nights == 0 {
      return Err(Error::Validation(
        "duration_nights must be at least 1".to_owned(),
      ));
    }

    for (d, day) in self.days.iter().enumerate() {
      if day.day_number == 0 {
        return Err(Error::Validation(format!(
          "days[{d}].day_number must be at least 1"
        )));
      }
      for (i, acc) in day.accommodations.iter().enumerate() {
        require(&format!("days[{d}].accommodations[{i}].name"), &acc.name)?;
        require(
          &format!("days[{d}].accommodations[{i}].location"),
          &acc.location,
        )?;
      }
      for (i, tr) in day.transfers.iter().enumerate() {
        require(&format!("days[{d}].transfers[{i}].mode"), &tr.mode)?;
        require(
          &format!("days[{d}].transfers[{i}].from_location"),
          &tr.from_location,
        )?;
        require(
          &format!("days[{d}].transfers[{i}].to_location"),
          &tr.to_location,
        )?;
      }
      for (i, act) in day.activities.iter().enumerate() {
        require(&format!("days[{d}].activities[{i}].name"), &act.name)?;
      }
    }

    Ok(())
  }

  /// Day numbers that fall outside `1..=duration_nights`.
  pub fn days_beyond_duration(&self) -> impl Iterator<Item = u32> + '_ {
    self
      .days
      .iter()
      .map(|d| d.day_number)
      .filter(|n| *n > self.duration_nights)
  }
}

fn require(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation(format!("{field} must not be empty")));
  }
  Ok(())
}

// ─── Hydrated records ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accommodation {
  pub id:       AccommodationId,
  pub name:     String,
  pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
  pub id:            TransferId,
  pub mode:          String,
  pub from_location: String,
  pub to_location:   String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
  pub id:          ActivityId,
  pub name:        String,
  pub description: Option<String>,
}

/// A stored day with all of its children, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
  pub id:             DayId,
  pub day_number:     u32,
  pub date:           Option<String>,
  pub accommodations: Vec<Accommodation>,
  pub transfers:      Vec<Transfer>,
  pub activities:     Vec<Activity>,
}

/// A stored trip, hydrated with its days ordered by `day_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
  pub id:              TripId,
  pub region:          String,
  pub name:            String,
  pub duration_nights: u32,
  pub days:            Vec<Day>,
}

impl Trip {
  /// Structural equality with `spec`, ignoring every assigned id.
  ///
  /// Days are compared in `day_number` order on both sides, since that is
  /// the order the store hands them back in.
  pub fn same_shape_as(&self, spec: &TripSpec) -> bool {
    if self.region != spec.region
      || self.name != spec.name
      || self.duration_nights != spec.duration_nights
      || self.days.len() != spec.days.len()
    {
      return false;
    }

    let mut spec_days: Vec<&DaySpec> = spec.days.iter().collect();
    spec_days.sort_by_key(|d| d.day_number);

    self.days.iter().zip(spec_days).all(|(day, ds)| day.same_shape_as(ds))
  }
}

impl Day {
  pub fn same_shape_as(&self, spec: &DaySpec) -> bool {
    self.day_number == spec.day_number
      && self.date == spec.date
      && self.accommodations.len() == spec.accommodations.len()
      && self.transfers.len() == spec.transfers.len()
      && self.activities.len() == spec.activities.len()
      && self
        .accommodations
        .iter()
        .zip(&spec.accommodations)
        .all(|(a, s)| a.name == s.name && a.location == s.location)
      && self.transfers.iter().zip(&spec.transfers).all(|(t, s)| {
        t.mode == s.mode
          && t.from_location == s.from_location
          && t.to_location == s.to_location
      })
      && self
        .activities
        .iter()
        .zip(&spec.activities)
        .all(|(a, s)| a.name == s.name && a.description == s.description)
  }
}
