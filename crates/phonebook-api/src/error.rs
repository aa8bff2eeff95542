//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body carries a machine-readable `kind` so clients can tell
//! failures apart without parsing messages. Duplicate conflicts also carry
//! the record already holding the key under `existing_record`.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use phonebook_core::{Error as DirectoryError, StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Directory(#[from] DirectoryError),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: rule violations keep their kind, anything
  /// else is an internal failure.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.directory_error() {
      Some(rule) => Self::Directory(rule.clone()),
      None => Self::Store(Box::new(e)),
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Self::Directory(e) => e.kind(),
      Self::BadRequest(_) => "bad_request",
      Self::Store(_) => "store",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Directory(e) => match e {
        DirectoryError::InvalidInput(_)
        | DirectoryError::InvalidDate(_)
        | DirectoryError::InvalidField(_) => StatusCode::BAD_REQUEST,
        DirectoryError::DuplicateConflict(_) => StatusCode::CONFLICT,
        DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
        DirectoryError::MissingBirthDate(_) => StatusCode::UNPROCESSABLE_ENTITY,
      },
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if let Self::Store(e) = &self {
      tracing::error!(error = %e, "store failure");
    }

    let mut body = json!({ "kind": self.kind(), "error": self.to_string() });
    if let Self::Directory(DirectoryError::DuplicateConflict(existing)) = &self {
      body["existing_record"] = json!(existing);
    }
    (status, Json(body)).into_response()
  }
}
