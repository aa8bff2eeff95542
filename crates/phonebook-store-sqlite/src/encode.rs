//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Birth dates are stored as ISO 8601 calendar dates (`YYYY-MM-DD`) so they
//! sort naturally; the `DD.MM.YYYY` form is a presentation concern. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::NaiveDate;
use phonebook_core::{BirthDate, Record};
use uuid::Uuid;

use crate::{Error, Result};

/// Column list shared by every `SELECT` that feeds [`RawRecord::from_row`].
pub const RECORD_COLUMNS: &str = "record_id, name, surname, phone, birth_date";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── BirthDate ────────────────────────────────────────────────────────────────

const ISO_DATE: &str = "%Y-%m-%d";

pub fn encode_birth_date(d: BirthDate) -> String { d.date().format(ISO_DATE).to_string() }

pub fn decode_birth_date(s: &str) -> Result<BirthDate> {
  NaiveDate::parse_from_str(s, ISO_DATE)
    .map(BirthDate::from)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `records` row.
pub struct RawRecord {
  pub record_id:  String,
  pub name:       String,
  pub surname:    String,
  pub phone:      String,
  pub birth_date: Option<String>,
}

impl RawRecord {
  /// Read a row selected with [`RECORD_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:  row.get(0)?,
      name:       row.get(1)?,
      surname:    row.get(2)?,
      phone:      row.get(3)?,
      birth_date: row.get(4)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    Ok(Record {
      id:         decode_uuid(&self.record_id)?,
      name:       self.name,
      surname:    self.surname,
      phone:      self.phone,
      birth_date: self.birth_date.as_deref().map(decode_birth_date).transpose()?,
    })
  }
}
