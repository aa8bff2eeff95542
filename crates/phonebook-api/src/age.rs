//! Handler for `POST /age`.

use std::sync::Arc;

use axum::{Json, extract::State};
use phonebook_core::{DirectoryStore, RecordKey};
use serde::Serialize;

use crate::{Payload, error::ApiError, require_key};

#[derive(Debug, Serialize)]
pub struct AgeResponse {
  pub age: i32,
}

/// `POST /age` — body: `{"Name", "Surname"}`; returns `{"age": n}`.
///
/// A record without a birth date answers 422, distinct from the 404 for a
/// missing record.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Payload(key): Payload<RecordKey>,
) -> Result<Json<AgeResponse>, ApiError>
where
  S: DirectoryStore,
{
  let key = require_key(key)?;
  let age = store.age(key).await.map_err(ApiError::from_store)?;
  Ok(Json(AgeResponse { age }))
}
