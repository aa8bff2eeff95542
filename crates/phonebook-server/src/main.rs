//! phonebook server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! configured store, and serves the JSON API over HTTP.
//!
//! ```toml
//! host       = "127.0.0.1"
//! port       = 5000
//! backend    = "sqlite"      # or "memory"
//! store_path = "~/.local/share/phonebook.db"
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use phonebook_server::ServerConfig;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Phonebook directory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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
  let server_cfg = ServerConfig::load(&cli.config)?;

  let app = phonebook_server::app(&server_cfg).await?;
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
