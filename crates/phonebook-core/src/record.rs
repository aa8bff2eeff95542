//! Record types — the single entity held by the directory.
//!
//! Field names on the wire are PascalCase (`Name`, `Surname`, `Phone`,
//! `BirthDate`) and the store-assigned identifier is `ID`.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── BirthDate ───────────────────────────────────────────────────────────────

/// A calendar date written as `DD.MM.YYYY`.
///
/// Parsing accepts unpadded day and month (`1.2.1990`); rendering is always
/// zero-padded (`01.02.1990`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
  pub const FORMAT: &'static str = "%d.%m.%Y";

  pub fn date(&self) -> NaiveDate { self.0 }

  /// Whole years elapsed between this date and `today`.
  ///
  /// The naive year difference is reduced by one while `today` falls before
  /// the anniversary in its own year. Dates after `today` give zero or a
  /// negative number.
  pub fn age_on(&self, today: NaiveDate) -> i32 {
    let born = self.0;
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
      years -= 1;
    }
    years
  }
}

impl From<NaiveDate> for BirthDate {
  fn from(date: NaiveDate) -> Self { Self(date) }
}

impl FromStr for BirthDate {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    NaiveDate::parse_from_str(s.trim(), Self::FORMAT)
      .map(Self)
      .map_err(|_| Error::InvalidDate(s.to_owned()))
  }
}

impl fmt::Display for BirthDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(Self::FORMAT))
  }
}

impl Serialize for BirthDate {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for BirthDate {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(de::Error::custom)
  }
}

// ─── Key ─────────────────────────────────────────────────────────────────────

/// The natural key of a record: its (`Name`, `Surname`) pair.
///
/// Both parts are trimmed on construction. Records are looked up by key
/// ignoring case (see [`RecordKey::folded`]); the derived `PartialEq` is
/// exact and only compares the text as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordKey {
  pub name:    String,
  pub surname: String,
}

impl RecordKey {
  pub fn new(name: impl AsRef<str>, surname: impl AsRef<str>) -> Self {
    Self {
      name:    name.as_ref().trim().to_owned(),
      surname: surname.as_ref().trim().to_owned(),
    }
  }

  /// Re-trim a key that arrived through deserialisation.
  pub fn normalized(self) -> Self { Self::new(self.name, self.surname) }

  /// The lowercase form used whenever two keys are compared.
  ///
  /// Folding is Unicode-aware (`char::to_lowercase`), so `Élodie` and
  /// `élodie` are the same key.
  pub fn folded(&self) -> Self {
    Self { name: fold_case(&self.name), surname: fold_case(&self.surname) }
  }
}

fn fold_case(s: &str) -> String { s.chars().flat_map(char::to_lowercase).collect() }

fn eq_folded(a: &str, b: &str) -> bool {
  a.chars()
    .flat_map(char::to_lowercase)
    .eq(b.chars().flat_map(char::to_lowercase))
}

impl fmt::Display for RecordKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.name, self.surname)
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A stored contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
  /// Assigned by the store on creation; never part of the key.
  #[serde(rename = "ID")]
  pub id:         Uuid,
  pub name:       String,
  pub surname:    String,
  /// Free-form; not validated beyond being non-blank.
  pub phone:      String,
  pub birth_date: Option<BirthDate>,
}

impl Record {
  pub fn key(&self) -> RecordKey {
    RecordKey {
      name:    self.name.clone(),
      surname: self.surname.clone(),
    }
  }

  /// Whether this record answers to `key`, ignoring case.
  pub fn has_key(&self, key: &RecordKey) -> bool {
    eq_folded(&self.name, &key.name) && eq_folded(&self.surname, &key.surname)
  }

  /// Age on `today`, or `None` when no birth date is recorded.
  pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
    self.birth_date.map(|b| b.age_on(today))
  }
}

// ─── NewRecord ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::DirectoryStore::add`]. Fields are raw text; the
/// store validates them and assigns the `ID`.
///
/// Missing fields deserialise as blank so that they surface as
/// [`Error::InvalidInput`] rather than as a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NewRecord {
  pub name:       String,
  pub surname:    String,
  pub phone:      String,
  /// `None` or blank means unknown.
  pub birth_date: Option<String>,
}

impl NewRecord {
  pub fn new(
    name: impl Into<String>,
    surname: impl Into<String>,
    phone: impl Into<String>,
  ) -> Self {
    Self {
      name:       name.into(),
      surname:    surname.into(),
      phone:      phone.into(),
      birth_date: None,
    }
  }

  pub fn born(mut self, birth_date: impl Into<String>) -> Self {
    self.birth_date = Some(birth_date.into());
    self
  }

  pub fn key(&self) -> RecordKey { RecordKey::new(&self.name, &self.surname) }

  /// Validate every field and build the record that will be stored.
  pub fn into_record(self, id: Uuid) -> Result<Record> {
    let name = required(&self.name, Field::Name)?;
    let surname = required(&self.surname, Field::Surname)?;
    let phone = required(&self.phone, Field::Phone)?;
    let birth_date = match self.birth_date.as_deref().map(str::trim) {
      None | Some("") => None,
      Some(raw) => Some(raw.parse()?),
    };
    Ok(Record { id, name, surname, phone, birth_date })
  }
}

fn required(value: &str, field: Field) -> Result<String> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::InvalidInput(field.label()));
  }
  Ok(value.to_owned())
}

// ─── Field ───────────────────────────────────────────────────────────────────

/// The fields an update may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum Field {
  Name,
  Surname,
  Phone,
  BirthDate,
}

impl Field {
  /// Resolve a field name as sent by a client. Matching ignores ASCII case
  /// and surrounding whitespace.
  pub fn from_name(name: &str) -> Result<Self> {
    name
      .trim()
      .parse()
      .map_err(|_| Error::InvalidField(name.to_owned()))
  }

  pub fn label(self) -> &'static str { self.into() }

  pub fn is_key(self) -> bool { matches!(self, Self::Name | Self::Surname) }

  /// Validate `value` for this field and write it into `record`.
  ///
  /// On error `record` is left untouched.
  pub fn apply(self, record: &mut Record, value: &str) -> Result<()> {
    match self {
      Self::Name => record.name = required(value, self)?,
      Self::Surname => record.surname = required(value, self)?,
      Self::Phone => record.phone = required(value, self)?,
      Self::BirthDate => record.birth_date = Some(value.parse()?),
    }
    Ok(())
  }
}

// ─── Criteria ────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::DirectoryStore::search`]. Any field that is
/// `None` or blank does not filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Criteria {
  pub name:       Option<String>,
  pub surname:    Option<String>,
  pub phone:      Option<String>,
  pub birth_date: Option<String>,
}

impl Criteria {
  /// Criteria selecting the single record with `key`.
  pub fn by_key(key: &RecordKey) -> Self {
    Self {
      name: Some(key.name.clone()),
      surname: Some(key.surname.clone()),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    [&self.name, &self.surname, &self.phone, &self.birth_date]
      .into_iter()
      .all(|c| criterion(c).is_none())
  }

  /// Exact match on every non-blank criterion. A birth date criterion is
  /// compared as a calendar date; one that does not parse matches nothing.
  pub fn matches(&self, record: &Record) -> bool {
    criterion(&self.name).is_none_or(|v| v == record.name)
      && criterion(&self.surname).is_none_or(|v| v == record.surname)
      && criterion(&self.phone).is_none_or(|v| v == record.phone)
      && criterion(&self.birth_date).is_none_or(|v| {
        matches!(
          (v.parse::<BirthDate>(), record.birth_date),
          (Ok(wanted), Some(actual)) if wanted == actual
        )
      })
  }
}

fn criterion(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
