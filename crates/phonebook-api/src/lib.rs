//! JSON request handler for the phonebook directory.
//!
//! Exposes an axum [`Router`] backed by any [`DirectoryStore`]. Transport,
//! tracing layers and CORS are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(phonebook_api::api_router(store.clone()))
//! ```

pub mod age;
pub mod error;
pub mod records;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  extract::FromRequest,
  routing::{delete, get, post, put},
};
use phonebook_core::{DirectoryStore, Error as DirectoryError, RecordKey};

pub use error::ApiError;

/// JSON body extractor whose rejection is an [`ApiError`], so malformed
/// bodies get the same error shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

/// Trim `key` and reject blank parts before it reaches the store.
pub(crate) fn require_key(key: RecordKey) -> Result<RecordKey, ApiError> {
  let key = key.normalized();
  if key.name.is_empty() {
    return Err(DirectoryError::InvalidInput("Name").into());
  }
  if key.surname.is_empty() {
    return Err(DirectoryError::InvalidInput("Surname").into());
  }
  Ok(key)
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged or nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DirectoryStore + 'static,
{
  Router::new()
    .route("/records", get(records::list::<S>))
    .route("/add", post(records::add::<S>))
    .route("/update", put(records::update::<S>))
    .route("/delete", delete(records::remove::<S>).post(records::remove::<S>))
    .route("/search", post(search::handler::<S>))
    .route("/age", post(age::handler::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
