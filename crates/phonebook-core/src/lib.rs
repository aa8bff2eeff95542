//! Core types, rules and trait definitions for the phonebook directory.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod directory;
pub mod error;
pub mod memory;
pub mod record;
pub mod store;

pub use directory::Directory;
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use record::{BirthDate, Criteria, Field, NewRecord, Record, RecordKey};
pub use store::{DirectoryStore, StoreError};
