//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use phonebook_core::{
  Criteria, DirectoryStore, Error as DirectoryError, Field, NewRecord, RecordKey,
  StoreError,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn john() -> NewRecord { NewRecord::new("John", "Doe", "123-456").born("01.01.1990") }

fn jane() -> NewRecord { NewRecord::new("Jane", "Roe", "555-000").born("") }

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn directory_error(err: &Error) -> &DirectoryError {
  err.directory_error().expect("directory rule violation")
}

// ─── Add ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_list() {
  let s = store().await;

  let john = s.add(john()).await.unwrap();
  let jane = s.add(jane()).await.unwrap();
  assert_eq!(jane.birth_date, None);

  assert_eq!(s.list().await.unwrap(), vec![john, jane]);
}

#[tokio::test]
async fn add_duplicate_returns_existing_and_keeps_count() {
  let s = store().await;
  let first = s.add(john()).await.unwrap();

  let err = s
    .add(NewRecord::new("John", "Doe", "999"))
    .await
    .unwrap_err();
  assert_eq!(
    directory_error(&err),
    &DirectoryError::DuplicateConflict(Box::new(first.clone()))
  );
  assert_eq!(s.list().await.unwrap(), vec![first]);
}

#[tokio::test]
async fn add_invalid_date_is_rejected() {
  let s = store().await;
  let err = s
    .add(NewRecord::new("John", "Doe", "1").born("1990-01-01"))
    .await
    .unwrap_err();
  assert!(matches!(directory_error(&err), DirectoryError::InvalidDate(_)));
  assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn birth_date_survives_storage() {
  let s = store().await;
  let john = s.add(john()).await.unwrap();
  let stored = s.list().await.unwrap().remove(0);
  assert_eq!(stored.birth_date, john.birth_date);
  assert_eq!(stored.birth_date.unwrap().to_string(), "01.01.1990");
}

#[tokio::test]
async fn add_differing_only_in_case_conflicts() {
  let s = store().await;
  let first = s.add(john()).await.unwrap();

  let err = s
    .add(NewRecord::new("JOHN", "doe", "1"))
    .await
    .unwrap_err();
  assert_eq!(
    directory_error(&err),
    &DirectoryError::DuplicateConflict(Box::new(first.clone()))
  );
  assert_eq!(s.list().await.unwrap(), vec![first]);
}

#[tokio::test]
async fn lookups_ignore_case() {
  let s = store().await;
  let john = s.add(john()).await.unwrap();

  assert_eq!(
    s.age_on(RecordKey::new("john", "DOE"), date(2024, 6, 15))
      .await
      .unwrap(),
    34
  );
  let updated = s
    .update(RecordKey::new("jOhN", "doe"), Field::Name, "JOHN".into())
    .await
    .unwrap();
  assert_eq!(updated.name, "JOHN");
  assert_eq!(updated.id, john.id);

  let removed = s.delete(RecordKey::new("john", "doe")).await.unwrap();
  assert_eq!(removed, updated);
  assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_ascii_keys_fold_like_the_memory_store() {
  let s = store().await;
  let first = s.add(NewRecord::new("Élodie", "Ärger", "1")).await.unwrap();
  let err = s
    .add(NewRecord::new("élodie", "ÄRGER", "2"))
    .await
    .unwrap_err();
  assert_eq!(
    directory_error(&err),
    &DirectoryError::DuplicateConflict(Box::new(first))
  );
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_by_key_round_trips() {
  let s = store().await;
  let john = s.add(john()).await.unwrap();
  s.add(jane()).await.unwrap();

  let found = s.search(Criteria::by_key(&john.key())).await.unwrap();
  assert_eq!(found, vec![john]);
}

#[tokio::test]
async fn search_by_surname_only() {
  let s = store().await;
  let john = s.add(john()).await.unwrap();
  s.add(jane()).await.unwrap();

  let criteria = Criteria { surname: Some("Doe".into()), ..Criteria::default() };
  assert_eq!(s.search(criteria).await.unwrap(), vec![john]);
}

#[tokio::test]
async fn search_is_exact_not_substring() {
  let s = store().await;
  s.add(john()).await.unwrap();
  let criteria = Criteria { name: Some("Jo".into()), ..Criteria::default() };
  assert!(s.search(criteria).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_criteria_returns_all() {
  let s = store().await;
  s.add(john()).await.unwrap();
  s.add(jane()).await.unwrap();
  assert_eq!(s.search(Criteria::default()).await.unwrap().len(), 2);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_phone_then_read() {
  let s = store().await;
  let john = s.add(john()).await.unwrap();

  let updated = s
    .update(john.key(), Field::Phone, "555".into())
    .await
    .unwrap();
  assert_eq!(updated.phone, "555");

  let found = s.search(Criteria::by_key(&john.key())).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].phone, "555");
  assert_eq!(found[0].birth_date, john.birth_date);
  assert_eq!(found[0].id, john.id);
}

#[tokio::test]
async fn update_key_collision_leaves_both_records() {
  let s = store().await;
  let alice = s.add(NewRecord::new("Alice", "Smith", "1")).await.unwrap();
  let bob = s.add(NewRecord::new("Bob", "Jones", "2")).await.unwrap();

  s.update(bob.key(), Field::Surname, "Smith".into())
    .await
    .unwrap();
  let err = s
    .update(RecordKey::new("Bob", "Smith"), Field::Name, "Alice".into())
    .await
    .unwrap_err();
  assert_eq!(
    directory_error(&err),
    &DirectoryError::DuplicateConflict(Box::new(alice.clone()))
  );

  let records = s.list().await.unwrap();
  assert_eq!(records[0], alice);
  assert_eq!(records[1].key(), RecordKey::new("Bob", "Smith"));
}

#[tokio::test]
async fn update_key_moves_the_record() {
  let s = store().await;
  let john = s.add(john()).await.unwrap();

  s.update(john.key(), Field::Name, "Johnny".into())
    .await
    .unwrap();

  let err = s
    .update(john.key(), Field::Phone, "1".into())
    .await
    .unwrap_err();
  assert!(matches!(directory_error(&err), DirectoryError::NotFound(_)));

  let moved = s
    .search(Criteria::by_key(&RecordKey::new("Johnny", "Doe")))
    .await
    .unwrap();
  assert_eq!(moved[0].id, john.id);
}

#[tokio::test]
async fn update_invalid_birth_date_leaves_record() {
  let s = store().await;
  let jane = s.add(jane()).await.unwrap();
  let err = s
    .update(jane.key(), Field::BirthDate, "32.01.2000".into())
    .await
    .unwrap_err();
  assert!(matches!(directory_error(&err), DirectoryError::InvalidDate(_)));
  assert_eq!(s.list().await.unwrap(), vec![jane]);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_twice() {
  let s = store().await;
  let john = s.add(john()).await.unwrap();

  assert_eq!(s.delete(john.key()).await.unwrap(), john);
  let err = s.delete(john.key()).await.unwrap_err();
  assert_eq!(directory_error(&err), &DirectoryError::NotFound(john.key()));
}

#[tokio::test]
async fn deleted_key_can_be_reused() {
  let s = store().await;
  let first = s.add(john()).await.unwrap();
  s.delete(first.key()).await.unwrap();
  let second = s.add(john()).await.unwrap();
  assert_ne!(first.id, second.id);
}

// ─── Age ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn age_on_a_given_date() {
  let s = store().await;
  let r = s
    .add(NewRecord::new("Ann", "Lee", "1").born("15.06.2000"))
    .await
    .unwrap();
  assert_eq!(s.age_on(r.key(), date(2024, 6, 14)).await.unwrap(), 23);
  assert_eq!(s.age_on(r.key(), date(2024, 6, 15)).await.unwrap(), 24);
}

#[tokio::test]
async fn age_errors_are_distinct() {
  let s = store().await;
  let jane = s.add(jane()).await.unwrap();

  let err = s.age(jane.key()).await.unwrap_err();
  assert_eq!(
    directory_error(&err),
    &DirectoryError::MissingBirthDate(jane.key())
  );

  let err = s.age(RecordKey::new("No", "One")).await.unwrap_err();
  assert!(matches!(directory_error(&err), DirectoryError::NotFound(_)));
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn records_survive_reopen() {
  let path = std::env::temp_dir().join(format!("phonebook-{}.db", uuid::Uuid::new_v4()));

  let john = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add(john()).await.unwrap()
  };

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.list().await.unwrap(), vec![john]);
  drop(s);
  let _ = std::fs::remove_file(&path);
}
