//! [`Directory`] — the in-memory record engine.
//!
//! Holds records in insertion order and enforces every directory rule: key
//! uniqueness, field validation and calendar-aware age. It is synchronous and
//! unsynchronised; [`crate::memory::MemoryStore`] puts it behind a lock.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Error, Result,
  record::{Criteria, Field, NewRecord, Record, RecordKey},
};

#[derive(Debug, Clone, Default)]
pub struct Directory {
  records: Vec<Record>,
}

impl Directory {
  pub fn new() -> Self { Self::default() }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  /// All records in insertion order.
  pub fn records(&self) -> &[Record] { &self.records }

  pub fn get(&self, key: &RecordKey) -> Option<&Record> {
    self.records.iter().find(|r| r.has_key(key))
  }

  fn position(&self, key: &RecordKey) -> Result<usize> {
    self
      .records
      .iter()
      .position(|r| r.has_key(key))
      .ok_or_else(|| Error::NotFound(key.clone()))
  }

  /// Validate `candidate` and append it.
  ///
  /// Fails with [`Error::DuplicateConflict`] carrying the existing record when
  /// the key is already taken.
  pub fn add(&mut self, candidate: NewRecord) -> Result<Record> {
    let record = candidate.into_record(Uuid::new_v4())?;
    if let Some(existing) = self.get(&record.key()) {
      return Err(Error::DuplicateConflict(Box::new(existing.clone())));
    }
    self.records.push(record.clone());
    Ok(record)
  }

  /// Lazily scan for records matching `criteria`, in insertion order.
  pub fn search<'a>(
    &'a self,
    criteria: &'a Criteria,
  ) -> impl Iterator<Item = &'a Record> + 'a {
    self.records.iter().filter(|r| criteria.matches(r))
  }

  /// Set `field` of the record with `key` to `value`.
  ///
  /// The change is staged on a copy and committed only once it validates and
  /// the resulting key is free (or still belongs to this record).
  pub fn update(
    &mut self,
    key: &RecordKey,
    field: Field,
    value: &str,
  ) -> Result<Record> {
    let index = self.position(key)?;

    let mut staged = self.records[index].clone();
    field.apply(&mut staged, value)?;

    if field.is_key() {
      let key = staged.key();
      let collision = self
        .records
        .iter()
        .enumerate()
        .find(|(i, r)| *i != index && r.has_key(&key));
      if let Some((_, other)) = collision {
        return Err(Error::DuplicateConflict(Box::new(other.clone())));
      }
    }

    self.records[index] = staged.clone();
    Ok(staged)
  }

  /// Remove and return the record with `key`.
  pub fn delete(&mut self, key: &RecordKey) -> Result<Record> {
    let index = self.position(key)?;
    Ok(self.records.remove(index))
  }

  /// Age in whole years of the record with `key`, evaluated on `today`.
  pub fn age_on(&self, key: &RecordKey, today: NaiveDate) -> Result<i32> {
    let record = self.get(key).ok_or_else(|| Error::NotFound(key.clone()))?;
    record
      .age_on(today)
      .ok_or_else(|| Error::MissingBirthDate(key.clone()))
  }
}
