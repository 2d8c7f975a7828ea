//! [`SqliteStore`]: the SQLite implementation of [`ItineraryStore`].

use std::path::Path;

use rusqlite::{Connection, ToSql};

use itinera_core::{
  itinerary::{
    Accommodation, Activity, Day, DayId, Transfer, Trip, TripId, TripSpec,
  },
  store::{ItineraryStore, TripFilter},
};

use crate::{
  Result,
  encode::{RawChild, RawDay, RawDays, RawTrip, RawTrips},
  schema::SCHEMA,
};

type NamedParams<'a> = [(&'a str, &'a dyn ToSql)];

// ─── Store ───────────────────────────────────────────────────────────────────

/// An itinerary store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// are serialised on one connection thread, and every multi-statement read
/// or write runs inside a transaction, so readers never observe a partially
/// written trip.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store. Mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Calls made through any other clone of
  /// this store fail afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    tracing::debug!("closed sqlite store");
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row loading ─────────────────────────────────────────────────────────────
//
// `where_clause` may reference `t` (trips) and `d` (days); every query joins
// both so the same clause selects a consistent set of rows from each table.

fn load_days(
  conn: &Connection,
  where_clause: &str,
  params: &NamedParams<'_>,
) -> rusqlite::Result<RawDays> {
  let days = conn
    .prepare(&format!(
      "SELECT d.id, d.trip_id, d.day_number, d.date
       FROM days d
       JOIN trips t ON t.id = d.trip_id
       {where_clause}
       ORDER BY d.trip_id, d.day_number"
    ))?
    .query_map(params, |row| {
      Ok(RawDay {
        id:         row.get(0)?,
        trip_id:    row.get(1)?,
        day_number: row.get(2)?,
        date:       row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let accommodations = conn
    .prepare(&format!(
      "SELECT a.day_id, a.id, a.name, a.location
       FROM accommodations a
       JOIN days  d ON d.id = a.day_id
       JOIN trips t ON t.id = d.trip_id
       {where_clause}
       ORDER BY a.id"
    ))?
    .query_map(params, |row| {
      Ok(RawChild {
        day_id: row.get(0)?,
        child:  Accommodation {
          id:       row.get(1)?,
          name:     row.get(2)?,
          location: row.get(3)?,
        },
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let transfers = conn
    .prepare(&format!(
      "SELECT x.day_id, x.id, x.mode, x.from_location, x.to_location
       FROM transfers x
       JOIN days  d ON d.id = x.day_id
       JOIN trips t ON t.id = d.trip_id
       {where_clause}
       ORDER BY x.id"
    ))?
    .query_map(params, |row| {
      Ok(RawChild {
        day_id: row.get(0)?,
        child:  Transfer {
          id:            row.get(1)?,
          mode:          row.get(2)?,
          from_location: row.get(3)?,
          to_location:   row.get(4)?,
        },
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let activities = conn
    .prepare(&format!(
      "SELECT v.day_id, v.id, v.name, v.description
       FROM activities v
       JOIN days  d ON d.id = v.day_id
       JOIN trips t ON t.id = d.trip_id
       {where_clause}
       ORDER BY v.id"
    ))?
    .query_map(params, |row| {
      Ok(RawChild {
        day_id: row.get(0)?,
        child:  Activity {
          id:          row.get(1)?,
          name:        row.get(2)?,
          description: row.get(3)?,
        },
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(RawDays { days, accommodations, transfers, activities })
}

/// Load trips selected by `where_clause` (which may only reference `t`)
/// together with all of their descendants.
fn load_trips(
  conn: &Connection,
  where_clause: &str,
  params: &NamedParams<'_>,
) -> rusqlite::Result<RawTrips> {
  let trips = conn
    .prepare(&format!(
      "SELECT t.id, t.region, t.name, t.duration_nights
       FROM trips t
       {where_clause}
       ORDER BY t.id"
    ))?
    .query_map(params, |row| {
      Ok(RawTrip {
        id:              row.get(0)?,
        region:          row.get(1)?,
        name:            row.get(2)?,
        duration_nights: row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let days = load_days(conn, where_clause, params)?;
  Ok(RawTrips { trips, days })
}

/// Build the `WHERE` clause for `filter`; parameters are bound by name in
/// [`filter_params`].
fn filter_clause(filter: &TripFilter) -> String {
  let mut conds: Vec<&'static str> = vec![];
  if filter.duration_nights.is_some() {
    conds.push("t.duration_nights = :nights");
  }
  if filter.region.is_some() {
    conds.push("t.region = :region");
  }

  if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  }
}

fn filter_params(filter: &TripFilter) -> Vec<(&str, &dyn ToSql)> {
  let mut params: Vec<(&str, &dyn ToSql)> = vec![];
  if let Some(nights) = &filter.duration_nights {
    params.push((":nights", nights));
  }
  if let Some(region) = &filter.region {
    params.push((":region", region));
  }
  params
}

/// Insert `spec` as a trip subtree, parents before children so each child
/// can reference the id just assigned to its parent. The caller owns the
/// transaction.
fn insert_subtree(conn: &Connection, spec: &TripSpec) -> rusqlite::Result<TripId> {
  conn.execute(
    "INSERT INTO trips (region, name, duration_nights) VALUES (?1, ?2, ?3)",
    rusqlite::params![spec.region, spec.name, spec.duration_nights],
  )?;
  let trip_id = conn.last_insert_rowid();

  for day in &spec.days {
    conn
      .prepare_cached(
        "INSERT INTO days (trip_id, day_number, date) VALUES (?1, ?2, ?3)",
      )?
      .execute(rusqlite::params![trip_id, day.day_number, day.date])?;
    let day_id = conn.last_insert_rowid();

    let mut insert_accommodation = conn.prepare_cached(
      "INSERT INTO accommodations (day_id, name, location) VALUES (?1, ?2, ?3)",
    )?;
    for acc in &day.accommodations {
      insert_accommodation
        .execute(rusqlite::params![day_id, acc.name, acc.location])?;
    }

    let mut insert_transfer = conn.prepare_cached(
      "INSERT INTO transfers (day_id, mode, from_location, to_location)
       VALUES (?1, ?2, ?3, ?4)",
    )?;
    for tr in &day.transfers {
      insert_transfer.execute(rusqlite::params![
        day_id,
        tr.mode,
        tr.from_location,
        tr.to_location,
      ])?;
    }

    let mut insert_activity = conn.prepare_cached(
      "INSERT INTO activities (day_id, name, description) VALUES (?1, ?2, ?3)",
    )?;
    for act in &day.activities {
      insert_activity
        .execute(rusqlite::params![day_id, act.name, act.description])?;
    }
  }

  Ok(trip_id)
}

// ─── ItineraryStore impl ─────────────────────────────────────────────────────

impl ItineraryStore for SqliteStore {
  type Error = crate::Error;

  async fn put_trip(&self, spec: TripSpec) -> Result<Trip> {
    let raw: RawTrips = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without committing rolls the whole subtree back.
        let tx = conn.transaction()?;
        let trip_id = insert_subtree(&tx, &spec)?;
        let params: &NamedParams = &[(":trip_id", &trip_id)];
        let raw = load_trips(&tx, "WHERE t.id = :trip_id", params)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_trips().pop().ok_or(crate::Error::Database(
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows),
    ))
  }

  async fn get_trip(&self, id: TripId) -> Result<Option<Trip>> {
    let raw: RawTrips = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let params: &NamedParams = &[(":trip_id", &id)];
        let raw = load_trips(&tx, "WHERE t.id = :trip_id", params)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    Ok(raw.into_trips().pop())
  }

  async fn get_day(&self, id: DayId) -> Result<Option<Day>> {
    let raw: RawDays = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let params: &NamedParams = &[(":day_id", &id)];
        let raw = load_days(&tx, "WHERE d.id = :day_id", params)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    Ok(raw.into_days().pop().map(|(_, day)| day))
  }

  async fn list_trips(&self, filter: &TripFilter) -> Result<Vec<Trip>> {
    let filter = filter.clone();

    let raw: RawTrips = self
      .conn
      .call(move |conn| {
        let clause = filter_clause(&filter);
        let params = filter_params(&filter);
        let tx = conn.transaction()?;
        let raw = load_trips(&tx, &clause, &params)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    Ok(raw.into_trips())
  }

  async fn delete_trip(&self, id: TripId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM trips WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(removed > 0)
  }
}
