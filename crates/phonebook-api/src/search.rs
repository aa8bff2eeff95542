//! Handler for `POST /search`.
//!
//! The body is a partial record; blank or omitted fields do not filter.

use std::sync::Arc;

use axum::{Json, extract::State};
use phonebook_core::{Criteria, DirectoryStore, Record};

use crate::{Payload, error::ApiError};

/// `POST /search` — body: any subset of `{"Name", "Surname", "Phone", "BirthDate"}`.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Payload(criteria): Payload<Criteria>,
) -> Result<Json<Vec<Record>>, ApiError>
where
  S: DirectoryStore,
{
  let records = store.search(criteria).await.map_err(ApiError::from_store)?;
  Ok(Json(records))
}
