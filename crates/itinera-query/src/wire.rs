//! Wire shapes for the query service.
//!
//! Requests are a single JSON object, `{"nights": <integer>}`. Responses are
//! a JSON array of trips in a reduced shape: trips keep their id, but days,
//! accommodations, transfers, and activities are sent without theirs.

use itinera_core::itinerary::{
  Accommodation, Activity, Day, Transfer, Trip, TripId,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{QueryError, Result};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QueryRequest {
  /// Any integer is accepted; values no trip has match nothing.
  pub nights: i64,
}

impl QueryRequest {
  pub fn parse(bytes: &[u8]) -> Result<Self> {
    serde_json::from_slice(bytes).map_err(QueryError::Protocol)
  }
}

/// Read one request of at most `max_bytes` from `reader`.
///
/// Bytes are accumulated until they form a complete JSON object. A request
/// that is still incomplete when the peer stops sending, or that grows past
/// `max_bytes`, is rejected. The caller bounds how long this may take.
pub async fn read_request<R>(reader: &mut R, max_bytes: usize) -> Result<QueryRequest>
where
  R: AsyncRead + Unpin,
{
  let mut buf = Vec::with_capacity(max_bytes.min(4096));
  let mut chunk = [0u8; 512];

  loop {
    let n = reader.read(&mut chunk).await?;
    if n == 0 {
      return QueryRequest::parse(&buf);
    }
    buf.extend_from_slice(&chunk[..n]);
    if buf.len() > max_bytes {
      return Err(QueryError::Oversized(max_bytes));
    }

    match QueryRequest::parse(&buf) {
      Err(QueryError::Protocol(e)) if e.is_eof() => continue,
      parsed => return parsed,
    }
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct WireAccommodation<'a> {
  pub name:     &'a str,
  pub location: &'a str,
}

#[derive(Debug, Serialize)]
pub struct WireTransfer<'a> {
  pub mode:          &'a str,
  pub from_location: &'a str,
  pub to_location:   &'a str,
}

#[derive(Debug, Serialize)]
pub struct WireActivity<'a> {
  pub name:        &'a str,
  pub description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct WireDay<'a> {
  pub day_number:     u32,
  pub date:           Option<&'a str>,
  pub accommodations: Vec<WireAccommodation<'a>>,
  pub transfers:      Vec<WireTransfer<'a>>,
  pub activities:     Vec<WireActivity<'a>>,
}

#[derive(Debug, Serialize)]
pub struct WireTrip<'a> {
  pub id:              TripId,
  pub region:          &'a str,
  pub name:            &'a str,
  pub duration_nights: u32,
  pub days:            Vec<WireDay<'a>>,
}

impl<'a> From<&'a Accommodation> for WireAccommodation<'a> {
  fn from(a: &'a Accommodation) -> Self {
    Self { name: &a.name, location: &a.location }
  }
}

impl<'a> From<&'a Transfer> for WireTransfer<'a> {
  fn from(t: &'a Transfer) -> Self {
    Self {
      mode:          &t.mode,
      from_location: &t.from_location,
      to_location:   &t.to_location,
    }
  }
}

impl<'a> From<&'a Activity> for WireActivity<'a> {
  fn from(a: &'a Activity) -> Self {
    Self { name: &a.name, description: a.description.as_deref() }
  }
}

impl<'a> From<&'a Day> for WireDay<'a> {
  fn from(d: &'a Day) -> Self {
    Self {
      day_number:     d.day_number,
      date:           d.date.as_deref(),
      accommodations: d.accommodations.iter().map(Into::into).collect(),
      transfers:      d.transfers.iter().map(Into::into).collect(),
      activities:     d.activities.iter().map(Into::into).collect(),
    }
  }
}

impl<'a> From<&'a Trip> for WireTrip<'a> {
  fn from(t: &'a Trip) -> Self {
    Self {
      id:              t.id,
      region:          &t.region,
      name:            &t.name,
      duration_nights: t.duration_nights,
      days:            t.days.iter().map(Into::into).collect(),
    }
  }
}

/// Serialise `trips` into the response body.
pub fn encode_trips(trips: &[Trip]) -> Result<Vec<u8>> {
  let wire: Vec<WireTrip<'_>> = trips.iter().map(Into::into).collect();
  serde_json::to_vec(&wire).map_err(QueryError::Encode)
}

#[cfg(test)]
mod tests {
  use super::*;

  use serde_json::{Value, json};
  use tokio::io::AsyncWriteExt;

  #[test]
  fn parses_nights() {
    let req = QueryRequest::parse(br#"{"nights": 4}"#).unwrap();
    assert_eq!(req.nights, 4);
  }

  #[test]
  fn accepts_negative_nights() {
    let req = QueryRequest::parse(br#"{"nights": -1}"#).unwrap();
    assert_eq!(req.nights, -1);
  }

  #[test]
  fn rejects_fractional_nights() {
    assert!(QueryRequest::parse(br#"{"nights": 2.5}"#).is_err());
  }

  #[test]
  fn rejects_non_numeric_nights() {
    let err = QueryRequest::parse(br#"{"nights": "abc"}"#).unwrap_err();
    assert!(matches!(err, QueryError::Protocol(_)));
  }

  #[test]
  fn rejects_missing_nights() {
    assert!(QueryRequest::parse(br#"{"days": 4}"#).is_err());
  }

  #[tokio::test]
  async fn reads_request_split_across_writes() {
    let (mut client, mut server) = tokio::io::duplex(64);
    let reader = tokio::spawn(async move {
      read_request(&mut server, 1024).await
    });

    client.write_all(br#"{"nig"#).await.unwrap();
    client.write_all(br#"hts": 2}"#).await.unwrap();

    let req = reader.await.unwrap().unwrap();
    assert_eq!(req.nights, 2);
  }

  #[tokio::test]
  async fn incomplete_request_at_eof_is_protocol_error() {
    let mut input: &[u8] = br#"{"nights": "#;
    let err = read_request(&mut input, 1024).await.unwrap_err();
    assert!(matches!(err, QueryError::Protocol(_)));
  }

  #[tokio::test]
  async fn oversized_request_is_rejected() {
    let body = format!(r#"{{"pad": "{}", "nights": 1}}"#, "x".repeat(64));
    let mut input = body.as_bytes();
    let err = read_request(&mut input, 32).await.unwrap_err();
    assert!(matches!(err, QueryError::Oversized(32)));
  }

  #[test]
  fn encoded_trips_omit_child_ids() {
    let trip = Trip {
      id:              7,
      region:          "Phuket".into(),
      name:            "3-Night Trip".into(),
      duration_nights: 3,
      days:            vec![Day {
        id:             70,
        day_number:     1,
        date:           Some("2025-02-14".into()),
        accommodations: vec![Accommodation {
          id:       700,
          name:     "Hotel A".into(),
          location: "Phuket".into(),
        }],
        transfers:      vec![Transfer {
          id:            701,
          mode:          "Taxi".into(),
          from_location: "Phuket Airport".into(),
          to_location:   "Hotel A".into(),
        }],
        activities:     vec![Activity {
          id:          702,
          name:        "Big Buddha Visit".into(),
          description: None,
        }],
      }],
    };

    let body: Value =
      serde_json::from_slice(&encode_trips(&[trip]).unwrap()).unwrap();
    assert_eq!(
      body,
      json!([{
        "id": 7,
        "region": "Phuket",
        "name": "3-Night Trip",
        "duration_nights": 3,
        "days": [{
          "day_number": 1,
          "date": "2025-02-14",
          "accommodations": [{ "name": "Hotel A", "location": "Phuket" }],
          "transfers": [{
            "mode": "Taxi",
            "from_location": "Phuket Airport",
            "to_location": "Hotel A"
          }],
          "activities": [{ "name": "Big Buddha Visit", "description": null }]
        }]
      }])
    );
  }
}
