//! Error type for `phonebook-store-sqlite`.

use phonebook_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A directory rule was violated; the database is unchanged.
  #[error(transparent)]
  Directory(#[from] phonebook_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date parse error: {0}")]
  DateParse(String),
}

impl StoreError for Error {
  fn directory_error(&self) -> Option<&phonebook_core::Error> {
    match self {
      Self::Directory(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
