//! Raw TCP query service for Itinera.
//!
//! Each connection carries exactly one request, `{"nights": <n>}`, and gets
//! back one response before the server closes it: either the matching trips
//! in the reduced [`wire`] shape, or `{"error": "..."}`. The service reads
//! through an [`ItineraryReader`] over the same store as the HTTP API, so a
//! trip is visible here as soon as its write transaction commits.

pub mod error;
pub mod wire;

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use itinera_core::{ItineraryReader, store::ItineraryStore};
use tokio::{
  io::{AsyncRead, AsyncWrite, AsyncWriteExt},
  net::TcpListener,
};

pub use error::{QueryError, Result};

// ─── Configuration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct QueryConfig {
  /// Requests longer than this are rejected without being parsed.
  pub max_request_bytes: usize,
  /// How long a client has to deliver a complete request.
  pub read_timeout:      Duration,
}

impl Default for QueryConfig {
  fn default() -> Self {
    Self {
      max_request_bytes: 1024,
      read_timeout:      Duration::from_secs(5),
    }
  }
}

// ─── Service ──────────────────────────────────────────────────────────────────

pub struct QueryService<S> {
  reader: ItineraryReader<S>,
  config: QueryConfig,
}

impl<S> QueryService<S>
where
  S: ItineraryStore + 'static,
{
  pub fn new(store: Arc<S>, config: QueryConfig) -> Self {
    Self {
      reader: ItineraryReader::new(store),
      config,
    }
  }

  /// Accept connections on `listener` until `shutdown` resolves, answering
  /// each one on its own task.
  ///
  /// A failing connection is logged and dropped; it never stops the loop.
  pub async fn serve<F>(self, listener: TcpListener, shutdown: F)
  where
    F: Future<Output = ()> + Send,
  {
    let service = Arc::new(self);
    tokio::pin!(shutdown);

    loop {
      tokio::select! {
        () = &mut shutdown => {
          tracing::info!("query service shutting down");
          return;
        }
        accepted = listener.accept() => match accepted {
          Ok((stream, peer)) => {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.handle(stream, peer).await });
          }
          Err(e) => {
            tracing::warn!(error = %e, "failed to accept query connection");
            tokio::time::sleep(Duration::from_millis(100)).await;
          }
        },
      }
    }
  }

  /// Answer the single request carried by `stream`, then close it.
  pub async fn handle<IO>(&self, mut stream: IO, peer: SocketAddr)
  where
    IO: AsyncRead + AsyncWrite + Unpin,
  {
    tracing::debug!(%peer, "query connection accepted");

    let body = match self.answer(&mut stream).await {
      Ok(body) => body,
      Err(e) => {
        tracing::warn!(%peer, error = %e, "rejected query request");
        e.payload().to_string().into_bytes()
      }
    };

    if let Err(e) = stream.write_all(&body).await {
      tracing::warn!(%peer, error = %e, "failed to write query response");
    }
    let _ = stream.shutdown().await;
  }

  async fn answer<IO>(&self, stream: &mut IO) -> Result<Vec<u8>>
  where
    IO: AsyncRead + Unpin,
  {
    let timeout = self.config.read_timeout;
    let request = tokio::time::timeout(
      timeout,
      wire::read_request(stream, self.config.max_request_bytes),
    )
    .await
    .map_err(|_| QueryError::Timeout(timeout))??;

    let trips = self.reader.find_by_nights(request.nights).await?;
    tracing::debug!(
      nights = request.nights,
      matches = trips.len(),
      "answered query"
    );
    wire::encode_trips(&trips)
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use itinera_core::{
    ItineraryWriter,
    itinerary::{ActivitySpec, DaySpec, TripSpec},
  };
  use itinera_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tokio::{
    io::AsyncReadExt,
    net::TcpStream,
    sync::oneshot,
  };

  struct Harness {
    addr:     SocketAddr,
    writer:   ItineraryWriter<SqliteStore>,
    reader:   ItineraryReader<SqliteStore>,
    _stop:    oneshot::Sender<()>,
  }

  async fn start(config: QueryConfig) -> Harness {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let service = QueryService::new(Arc::clone(&store), config);
    tokio::spawn(service.serve(listener, async move {
      let _ = stopped.await;
    }));

    Harness {
      addr,
      writer: ItineraryWriter::new(Arc::clone(&store)),
      reader: ItineraryReader::new(store),
      _stop: stop,
    }
  }

  async fn exchange(addr: SocketAddr, request: &[u8]) -> Value {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.shutdown().await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    serde_json::from_slice(&response).unwrap()
  }

  fn trip(region: &str, nights: u32) -> TripSpec {
    TripSpec {
      region:          region.into(),
      name:            format!("{nights}-Night {region} Adventure"),
      duration_nights: nights,
      days:            vec![DaySpec {
        day_number:     1,
        date:           None,
        accommodations: vec![],
        transfers:      vec![],
        activities:     vec![ActivitySpec {
          name:        "Island Hopping Tour".into(),
          description: Some("Enjoy a island hopping tour".into()),
        }],
      }],
    }
  }

  #[tokio::test]
  async fn answers_with_matching_trips_in_reduced_shape() {
    let h = start(QueryConfig::default()).await;
    let a = h.writer.create(trip("Krabi", 3)).await.unwrap();
    h.writer.create(trip("Krabi", 4)).await.unwrap();
    let c = h.writer.create(trip("Phuket", 3)).await.unwrap();

    let body = exchange(h.addr, br#"{"nights": 3}"#).await;
    let trips = body.as_array().unwrap();
    let ids: Vec<_> = trips.iter().map(|t| t["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![a.id, c.id]);

    let day = &trips[0]["days"][0];
    assert!(day.get("id").is_none());
    assert_eq!(
      day["activities"][0],
      json!({
        "name": "Island Hopping Tour",
        "description": "Enjoy a island hopping tour"
      })
    );
  }

  #[tokio::test]
  async fn agrees_with_reader_on_identity() {
    let h = start(QueryConfig::default()).await;
    for (region, nights) in [("Phuket", 2), ("Krabi", 2), ("Krabi", 5)] {
      h.writer.create(trip(region, nights)).await.unwrap();
    }

    for nights in [2, 5, 9] {
      let body = exchange(h.addr, format!(r#"{{"nights":{nights}}}"#).as_bytes()).await;
      let socket_ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
      let reader_ids: Vec<_> = h
        .reader
        .find_by_nights(nights)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
      assert_eq!(socket_ids, reader_ids, "nights = {nights}");
    }
  }

  #[tokio::test]
  async fn no_matches_is_an_empty_array() {
    let h = start(QueryConfig::default()).await;
    h.writer.create(trip("Krabi", 3)).await.unwrap();
    assert_eq!(exchange(h.addr, br#"{"nights": 6}"#).await, json!([]));
    assert_eq!(exchange(h.addr, br#"{"nights": 0}"#).await, json!([]));
    assert_eq!(exchange(h.addr, br#"{"nights": -1}"#).await, json!([]));
  }

  #[tokio::test]
  async fn bad_request_gets_error_and_listener_survives() {
    let h = start(QueryConfig::default()).await;
    h.writer.create(trip("Phuket", 3)).await.unwrap();

    let invalid = json!({ "error": "invalid request format" });
    assert_eq!(exchange(h.addr, br#"{"nights": "abc"}"#).await, invalid);
    assert_eq!(exchange(h.addr, b"not json at all").await, invalid);
    assert_eq!(exchange(h.addr, br#"{"days": 3}"#).await, invalid);
    assert_eq!(exchange(h.addr, b"").await, invalid);

    let body = exchange(h.addr, br#"{"nights": 3}"#).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn oversized_request_is_rejected() {
    let h = start(QueryConfig {
      max_request_bytes: 16,
      ..QueryConfig::default()
    })
    .await;
    let body = exchange(h.addr, br#"{"nights": 3, "padding": "xxxxxxxxxxxx"}"#).await;
    assert_eq!(body, json!({ "error": "invalid request format" }));
  }

  #[tokio::test]
  async fn stalled_client_times_out_with_error() {
    let h = start(QueryConfig {
      read_timeout: Duration::from_millis(100),
      ..QueryConfig::default()
    })
    .await;

    // Half a request, with the write side left open.
    let mut stream = TcpStream::connect(h.addr).await.unwrap();
    stream.write_all(br#"{"nights": "#).await.unwrap();
    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
      .await
      .expect("server should give up on a stalled client")
      .unwrap();
    let body: Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(body, json!({ "error": "invalid request format" }));

    let body = exchange(h.addr, br#"{"nights": 1}"#).await;
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn shutdown_stops_accepting() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let service = QueryService::new(store, QueryConfig::default());
    let task = tokio::spawn(service.serve(listener, async move {
      let _ = stopped.await;
    }));

    stop.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), task)
      .await
      .expect("serve should return after shutdown")
      .unwrap();
  }
}
