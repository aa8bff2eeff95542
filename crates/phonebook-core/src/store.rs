//! The `DirectoryStore` trait.
//!
//! Implemented by [`crate::memory::MemoryStore`] and by storage backends
//! (e.g. `phonebook-store-sqlite`). The request handler (`phonebook-api`)
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{Local, NaiveDate};

use crate::record::{Criteria, Field, NewRecord, Record, RecordKey};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error type of a store backend.
///
/// Backends fail either because a directory rule was violated (duplicate key,
/// bad date, ...) or for reasons of their own (I/O, corrupt rows). Callers
/// need to tell the two apart to report rule violations precisely.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The rule violation behind this error, if that is what it is.
  fn directory_error(&self) -> Option<&crate::Error>;
}

impl StoreError for crate::Error {
  fn directory_error(&self) -> Option<&crate::Error> { Some(self) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a directory backend.
///
/// Every operation runs with mutual exclusion relative to every other, and a
/// failed operation leaves the store as it was.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: StoreError;

  /// Validate and insert a new record. The returned record carries its
  /// store-assigned `ID`.
  fn add(
    &self,
    candidate: NewRecord,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// All records in insertion order.
  fn list(&self) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Records matching every non-blank criterion, in insertion order.
  fn search(
    &self,
    criteria: Criteria,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Set one field of the record with `key` and return the updated record.
  fn update(
    &self,
    key: RecordKey,
    field: Field,
    value: String,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Remove the record with `key`, returning it.
  fn delete(
    &self,
    key: RecordKey,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Age in whole years of the record with `key`, evaluated on `today`.
  fn age_on(
    &self,
    key: RecordKey,
    today: NaiveDate,
  ) -> impl Future<Output = Result<i32, Self::Error>> + Send + '_;

  /// Age in whole years as of the local current date.
  fn age(
    &self,
    key: RecordKey,
  ) -> impl Future<Output = Result<i32, Self::Error>> + Send + '_ {
    self.age_on(key, Local::now().date_naive())
  }
}
