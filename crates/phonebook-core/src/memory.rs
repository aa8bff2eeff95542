//! [`MemoryStore`] — a process-local [`DirectoryStore`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tracing::debug;

use crate::{
  Result,
  directory::Directory,
  record::{Criteria, Field, NewRecord, Record, RecordKey},
  store::DirectoryStore,
};

/// A [`Directory`] behind a single mutex.
///
/// Each operation holds the lock for its whole duration, so operations are
/// serialised. Cloning is cheap and clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  directory: Arc<Mutex<Directory>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Directory> {
    // Directory stages every mutation before committing it, so a panic while
    // the lock was held cannot have left it half-written.
    self.directory.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl DirectoryStore for MemoryStore {
  type Error = crate::Error;

  async fn add(&self, candidate: NewRecord) -> Result<Record> {
    let record = self.lock().add(candidate)?;
    debug!(id = %record.id, key = %record.key(), "record added");
    Ok(record)
  }

  async fn list(&self) -> Result<Vec<Record>> { Ok(self.lock().records().to_vec()) }

  async fn search(&self, criteria: Criteria) -> Result<Vec<Record>> {
    Ok(self.lock().search(&criteria).cloned().collect())
  }

  async fn update(&self, key: RecordKey, field: Field, value: String) -> Result<Record> {
    let record = self.lock().update(&key, field, &value)?;
    debug!(id = %record.id, %key, %field, "record updated");
    Ok(record)
  }

  async fn delete(&self, key: RecordKey) -> Result<Record> {
    let record = self.lock().delete(&key)?;
    debug!(id = %record.id, %key, "record deleted");
    Ok(record)
  }

  async fn age_on(&self, key: RecordKey, today: NaiveDate) -> Result<i32> {
    self.lock().age_on(&key, today)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[tokio::test]
  async fn concrete_scenario() {
    let store = MemoryStore::new();

    let john = store
      .add(NewRecord::new("John", "Doe", "123-456").born("01.01.1990"))
      .await
      .unwrap();
    let jane = store
      .add(NewRecord::new("Jane", "Roe", "555-000").born(""))
      .await
      .unwrap();
    assert_eq!(jane.birth_date, None);

    let found = store
      .search(Criteria { surname: Some("Doe".into()), ..Criteria::default() })
      .await
      .unwrap();
    assert_eq!(found, vec![john.clone()]);

    let today = chrono::Local::now().date_naive();
    let age = store.age(john.key()).await.unwrap();
    assert!(age >= chrono::Datelike::year(&today) - 1990 - 1);
  }

  #[tokio::test]
  async fn rejected_update_leaves_store_untouched() {
    let store = MemoryStore::new();
    let john = store.add(NewRecord::new("John", "Doe", "1")).await.unwrap();
    store.add(NewRecord::new("Jane", "Doe", "2")).await.unwrap();
    let before = store.list().await.unwrap();

    let err = store
      .update(john.key(), Field::BirthDate, "soon".into())
      .await
      .unwrap_err();
    assert_eq!(err, Error::InvalidDate("soon".into()));

    let err = store
      .update(john.key(), Field::Name, "JANE".into())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::DuplicateConflict(_)));

    assert_eq!(store.list().await.unwrap(), before);
  }

  #[tokio::test]
  async fn clones_share_records() {
    let store = MemoryStore::new();
    let other = store.clone();
    store.add(NewRecord::new("John", "Doe", "1")).await.unwrap();
    assert_eq!(other.list().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn concurrent_adds_of_one_key_admit_exactly_one() {
    let store = MemoryStore::new();
    let tasks: Vec<_> = (0..16)
      .map(|i| {
        let store = store.clone();
        tokio::spawn(async move {
          store
            .add(NewRecord::new("John", "Doe", i.to_string()))
            .await
        })
      })
      .collect();

    let mut added = 0;
    let mut conflicts = 0;
    for task in tasks {
      match task.await.unwrap() {
        Ok(_) => added += 1,
        Err(Error::DuplicateConflict(_)) => conflicts += 1,
        Err(e) => panic!("unexpected error: {e}"),
      }
    }
    assert_eq!((added, conflicts), (1, 15));
    assert_eq!(store.list().await.unwrap().len(), 1);
  }
}
