//! # Storage Module
//!
//! Handles persistence of birthday records.
//!
//! The domain layer only sees the [`BirthdayStorage`] trait; the SQLite
//! implementation in [`sqlite`] is wired in at startup and can be swapped
//! without touching domain or REST code.

pub mod sqlite;
pub mod traits;

pub use sqlite::{DbConnection, SqliteBirthdayRepository};
pub use traits::{BirthdayStorage, StorageError, StorageResult};
