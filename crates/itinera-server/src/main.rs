//! itinera server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the JSON API and the raw query service until Ctrl-C.
//!
//! # Demo data
//!
//! ```
//! cargo run -p itinera-server -- --seed
//! ```

use std::path::PathBuf;

use clap::Parser;
use itinera_server::{Server, ServerConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Itinera trip itinerary server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Insert demo itineraries before serving if the store is empty.
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config = ServerConfig::load(cli.config)?;

  let server = Server::bind(config).await?;
  if cli.seed {
    server.seed().await?;
  }

  server.run(shutdown_signal()).await
}

async fn shutdown_signal() {
  match tokio::signal::ctrl_c().await {
    Ok(()) => tracing::info!("shutdown requested"),
    Err(e) => {
      // Without a signal handler the only way out is killing the process.
      tracing::warn!(error = %e, "failed to listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  }
}
