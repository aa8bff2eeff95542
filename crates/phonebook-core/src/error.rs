//! Error types for `phonebook-core`.

use thiserror::Error;

use crate::record::{Record, RecordKey};

/// A directory rule violation. Every operation that fails with one of these
/// leaves the directory exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// A required field (`Name`, `Surname` or `Phone`) was missing or blank.
  #[error("{0} is required and must not be blank")]
  InvalidInput(&'static str),

  #[error("invalid birth date {0:?}: expected DD.MM.YYYY")]
  InvalidDate(String),

  #[error("invalid field {0:?}: expected one of Name, Surname, Phone, BirthDate")]
  InvalidField(String),

  /// The operation would produce a second record with an existing key. Carries
  /// the record that already holds the key.
  #[error("a record for {} {} already exists", .0.name, .0.surname)]
  DuplicateConflict(Box<Record>),

  #[error("no record for {0}")]
  NotFound(RecordKey),

  #[error("no birth date recorded for {0}")]
  MissingBirthDate(RecordKey),
}

impl Error {
  /// Stable snake_case discriminant, used on the wire to tell errors apart.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::InvalidInput(_) => "invalid_input",
      Self::InvalidDate(_) => "invalid_date",
      Self::InvalidField(_) => "invalid_field",
      Self::DuplicateConflict(_) => "duplicate_conflict",
      Self::NotFound(_) => "not_found",
      Self::MissingBirthDate(_) => "missing_birth_date",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
