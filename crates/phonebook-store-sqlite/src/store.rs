//! [`SqliteStore`] — the SQLite implementation of [`DirectoryStore`].

use std::path::Path;

use chrono::NaiveDate;
use phonebook_core::{
  Criteria, DirectoryStore, Field, NewRecord, Record, RecordKey,
  Error as DirectoryError,
};
use rusqlite::{Connection, OptionalExtension as _};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RECORD_COLUMNS, RawRecord, encode_birth_date, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A directory backed by a single SQLite file.
///
/// `tokio_rusqlite` runs every call on one dedicated thread, and each
/// operation here is exactly one call (mutations inside one transaction), so
/// operations never interleave.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    info!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .run(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection thread, carrying its own error back out.
  async fn run<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn find(conn: &Connection, key: &RecordKey) -> Result<Option<Record>> {
  let folded = key.folded();
  let raw = conn
    .query_row(
      &format!(
        "SELECT {RECORD_COLUMNS} FROM records WHERE name_key = ?1 AND surname_key = ?2"
      ),
      rusqlite::params![folded.name, folded.surname],
      RawRecord::from_row,
    )
    .optional()?;
  raw.map(RawRecord::into_record).transpose()
}

fn find_existing(conn: &Connection, key: &RecordKey) -> Result<Record> {
  find(conn, key)?.ok_or_else(|| DirectoryError::NotFound(key.clone()).into())
}

fn all(conn: &Connection) -> Result<Vec<Record>> {
  let mut stmt = conn.prepare(&format!("SELECT {RECORD_COLUMNS} FROM records ORDER BY seq"))?;
  let raws = stmt
    .query_map([], RawRecord::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawRecord::into_record).collect()
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = crate::Error;

  async fn add(&self, candidate: NewRecord) -> Result<Record> {
    let record = candidate.into_record(Uuid::new_v4())?;

    let record = self
      .run(move |conn| {
        let tx = conn.transaction()?;
        if let Some(existing) = find(&tx, &record.key())? {
          return Err(DirectoryError::DuplicateConflict(Box::new(existing)).into());
        }
        let folded = record.key().folded();
        tx.execute(
          "INSERT INTO records
             (record_id, name, surname, name_key, surname_key, phone, birth_date)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            encode_uuid(record.id),
            record.name,
            record.surname,
            folded.name,
            folded.surname,
            record.phone,
            record.birth_date.map(encode_birth_date),
          ],
        )?;
        tx.commit()?;
        Ok(record)
      })
      .await?;

    debug!(id = %record.id, key = %record.key(), "record added");
    Ok(record)
  }

  async fn list(&self) -> Result<Vec<Record>> { self.run(|conn| all(conn)).await }

  async fn search(&self, criteria: Criteria) -> Result<Vec<Record>> {
    // Full scan: criteria are evaluated in Rust so both backends share one
    // matching rule.
    self
      .run(move |conn| {
        let mut records = all(conn)?;
        records.retain(|r| criteria.matches(r));
        Ok(records)
      })
      .await
  }

  async fn update(&self, key: RecordKey, field: Field, value: String) -> Result<Record> {
    let log_key = key.clone();

    let record = self
      .run(move |conn| {
        let tx = conn.transaction()?;
        let current = find_existing(&tx, &key)?;

        let mut staged = current.clone();
        field.apply(&mut staged, &value)?;

        if field.is_key()
          && let Some(other) = find(&tx, &staged.key())?
          && other.id != current.id
        {
          return Err(DirectoryError::DuplicateConflict(Box::new(other)).into());
        }

        let folded = staged.key().folded();
        tx.execute(
          "UPDATE records
           SET name = ?2, surname = ?3, name_key = ?4, surname_key = ?5,
               phone = ?6, birth_date = ?7
           WHERE record_id = ?1",
          rusqlite::params![
            encode_uuid(staged.id),
            staged.name,
            staged.surname,
            folded.name,
            folded.surname,
            staged.phone,
            staged.birth_date.map(encode_birth_date),
          ],
        )?;
        tx.commit()?;
        Ok(staged)
      })
      .await?;

    debug!(id = %record.id, key = %log_key, %field, "record updated");
    Ok(record)
  }

  async fn delete(&self, key: RecordKey) -> Result<Record> {
    let record = self
      .run(move |conn| {
        let tx = conn.transaction()?;
        let record = find_existing(&tx, &key)?;
        tx.execute(
          "DELETE FROM records WHERE record_id = ?1",
          rusqlite::params![encode_uuid(record.id)],
        )?;
        tx.commit()?;
        Ok(record)
      })
      .await?;

    debug!(id = %record.id, key = %record.key(), "record deleted");
    Ok(record)
  }

  async fn age_on(&self, key: RecordKey, today: NaiveDate) -> Result<i32> {
    self
      .run(move |conn| {
        let record = find_existing(conn, &key)?;
        record
          .age_on(today)
          .ok_or_else(|| DirectoryError::MissingBirthDate(key).into())
      })
      .await
  }
}
