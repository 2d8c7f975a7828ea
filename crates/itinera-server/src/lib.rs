//! Itinera server: one store, two front ends.
//!
//! [`Server::bind`] opens the SQLite store and binds both listeners;
//! [`Server::run`] serves the JSON API and the raw query service until the
//! shutdown future resolves, then closes the store.

pub mod seed;

use std::{
  future::{Future, IntoFuture},
  net::SocketAddr,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use itinera_core::{ItineraryReader, ItineraryWriter};
use itinera_query::{QueryConfig, QueryService};
use itinera_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ITINERA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                    String,
  pub http_port:               u16,
  /// Fixed port of the raw query service.
  pub query_port:              u16,
  /// SQLite file; `:memory:` keeps everything in memory.
  pub store_path:              PathBuf,
  pub query_max_request_bytes: usize,
  pub query_read_timeout_ms:   u64,
}

impl ServerConfig {
  /// Load from the TOML file at `path` (if it exists), overlaid with
  /// `ITINERA_*` environment variables, on top of built-in defaults.
  pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("http_port", 8000_i64)?
      .set_default("query_port", 9000_i64)?
      .set_default("store_path", "itinera.db")?
      .set_default("query_max_request_bytes", 1024_i64)?
      .set_default("query_read_timeout_ms", 5000_i64)?
      .add_source(config::File::from(path.into()).required(false))
      .add_source(config::Environment::with_prefix("ITINERA"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  fn query_config(&self) -> QueryConfig {
    QueryConfig {
      max_request_bytes: self.query_max_request_bytes,
      read_timeout:      Duration::from_millis(self.query_read_timeout_ms),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

async fn open_store(path: &Path) -> anyhow::Result<SqliteStore> {
  if path == Path::new(":memory:") {
    return SqliteStore::open_in_memory()
      .await
      .context("failed to open in-memory store");
  }

  let path = expand_tilde(path);
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  SqliteStore::open(&path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}

// ─── Server ───────────────────────────────────────────────────────────────────

/// An opened store plus both bound listeners, ready to serve.
pub struct Server {
  config: ServerConfig,
  store:  SqliteStore,
  http:   TcpListener,
  query:  TcpListener,
}

impl Server {
  pub async fn bind(config: ServerConfig) -> anyhow::Result<Self> {
    let store = open_store(&config.store_path).await?;

    let http_address = format!("{}:{}", config.host, config.http_port);
    let http = TcpListener::bind(&http_address)
      .await
      .with_context(|| format!("failed to bind {http_address}"))?;

    let query_address = format!("{}:{}", config.host, config.query_port);
    let query = TcpListener::bind(&query_address)
      .await
      .with_context(|| format!("failed to bind {query_address}"))?;

    Ok(Self { config, store, http, query })
  }

  pub fn http_addr(&self) -> std::io::Result<SocketAddr> {
    self.http.local_addr()
  }

  pub fn query_addr(&self) -> std::io::Result<SocketAddr> {
    self.query.local_addr()
  }

  /// Insert the demo itineraries if the store is empty.
  pub async fn seed(&self) -> anyhow::Result<usize> {
    let store = Arc::new(self.store.clone());
    let writer = ItineraryWriter::new(Arc::clone(&store));
    let reader = ItineraryReader::new(store);
    seed::seed_if_empty(&writer, &reader)
      .await
      .context("failed to seed demo data")
  }

  /// Serve both front ends until `shutdown` resolves, wait for them to wind
  /// down, then close the store.
  pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
  where
    F: Future<Output = ()> + Send + 'static,
  {
    let Self { config, store, http, query } = self;
    let shared = Arc::new(store.clone());

    let (stop_tx, stop_rx) = watch::channel(());
    tokio::spawn(async move {
      shutdown.await;
      let _ = stop_tx.send(());
    });

    let app = itinera_api::api_router(Arc::clone(&shared))
      .layer(TraceLayer::new_for_http());
    let query_service = QueryService::new(shared, config.query_config());

    tracing::info!("HTTP API listening on http://{}", http.local_addr()?);
    tracing::info!("query service listening on {}", query.local_addr()?);

    let (http_result, ()) = tokio::join!(
      axum::serve(http, app)
        .with_graceful_shutdown(stopped(stop_rx.clone()))
        .into_future(),
      query_service.serve(query, stopped(stop_rx)),
    );
    http_result.context("HTTP server error")?;

    store.close().await.context("failed to close store")?;
    tracing::info!("server stopped");
    Ok(())
  }
}

/// Resolves once the shutdown signal fires (or its sender goes away).
async fn stopped(mut rx: watch::Receiver<()>) {
  let _ = rx.changed().await;
}
