//! Handlers for record lifecycle endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/records` | Every record, insertion order |
//! | `POST` | `/add` | Body: [`NewRecord`]; returns 201 + stored record |
//! | `PUT`  | `/update` | Body: [`UpdateBody`] |
//! | `DELETE`, `POST` | `/delete` | Body: `{"Name":"...","Surname":"..."}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use phonebook_core::{DirectoryStore, Field, NewRecord, Record, RecordKey};
use serde::Deserialize;
use serde_json::json;

use crate::{Payload, error::ApiError, require_key};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /records`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Record>>, ApiError>
where
  S: DirectoryStore,
{
  let records = store.list().await.map_err(ApiError::from_store)?;
  Ok(Json(records))
}

// ─── Add ──────────────────────────────────────────────────────────────────────

/// `POST /add` — returns 201 + `{"message", "record"}`.
///
/// A key collision answers 409 with the existing record attached.
pub async fn add<S>(
  State(store): State<Arc<S>>,
  Payload(body): Payload<NewRecord>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let record = store.add(body).await.map_err(ApiError::from_store)?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "Record added successfully", "record": record })),
  ))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /update`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateBody {
  #[serde(default)]
  pub name:      String,
  #[serde(default)]
  pub surname:   String,
  /// One of `Name`, `Surname`, `Phone`, `BirthDate` (any ASCII case).
  #[serde(default)]
  pub field:     String,
  #[serde(default)]
  pub new_value: String,
}

/// `PUT /update` — body: `{"Name", "Surname", "Field", "NewValue"}`.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Payload(body): Payload<UpdateBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: DirectoryStore,
{
  // The field name is checked before anything else is looked at.
  let field = Field::from_name(&body.field)?;
  let key = require_key(RecordKey::new(&body.name, &body.surname))?;

  let record = store
    .update(key, field, body.new_value)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(json!({ "message": "Record updated successfully", "record": record })))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /delete` (also accepted as `POST`) — body: `{"Name", "Surname"}`.
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Payload(key): Payload<RecordKey>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: DirectoryStore,
{
  let key = require_key(key)?;
  let record = store.delete(key).await.map_err(ApiError::from_store)?;
  Ok(Json(json!({ "message": "Record deleted successfully", "record": record })))
}
