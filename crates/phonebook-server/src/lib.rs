//! HTTP server assembly for the phonebook directory.
//!
//! Loads [`ServerConfig`], opens the configured backend and wraps the
//! [`phonebook_api`] router with tracing and CORS layers.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use phonebook_core::{DirectoryStore, MemoryStore};
use phonebook_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`DirectoryStore`] implementation backs the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// Records live in process memory and vanish on shutdown.
  #[default]
  Memory,
  /// Records live in the SQLite file at `store_path`.
  Sqlite,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `PHONEBOOK_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub backend:    Backend,
  /// Only read when `backend = "sqlite"`. A leading `~/` is expanded.
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       5000,
      backend:    Backend::default(),
      store_path: PathBuf::from("phonebook.db"),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `PHONEBOOK_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PHONEBOOK").try_parsing(true))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router for `store`, with request tracing and permissive CORS for
/// browser front ends.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: DirectoryStore + 'static,
{
  phonebook_api::api_router(store)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::very_permissive())
}

/// Open the configured backend and build the full application router.
pub async fn app(config: &ServerConfig) -> anyhow::Result<Router> {
  match config.backend {
    Backend::Memory => {
      tracing::info!("using in-memory store");
      Ok(router(Arc::new(MemoryStore::new())))
    }
    Backend::Sqlite => {
      let path = expand_tilde(&config.store_path);
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      Ok(router(Arc::new(store)))
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
