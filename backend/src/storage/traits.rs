//! # Storage Traits
//!
//! The storage abstraction the domain layer talks to. Any backend that can
//! answer these queries can hold birthday records.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::EventType;

use crate::domain::models::birthday::{Birthday, NewBirthday};

/// Failure reported by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the operation
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
    /// A stored record could not be turned back into a domain value
    #[error("corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Interface for birthday record storage.
///
/// Single-record operations are expected to be atomic; nothing here offers
/// transactions across calls, so concurrent updates are last-writer-wins.
#[async_trait]
pub trait BirthdayStorage: Send + Sync {
    /// Store a new record, assigning it a fresh id
    async fn insert(&self, birthday: NewBirthday) -> StorageResult<Birthday>;

    async fn find_by_id(&self, id: &str) -> StorageResult<Option<Birthday>>;

    /// Exact, case-sensitive match on name plus exact date
    async fn find_by_name_and_date(&self, name: &str, date: NaiveDate) -> StorageResult<Option<Birthday>>;

    async fn find_by_event_type(&self, event_type: EventType) -> StorageResult<Vec<Birthday>>;

    /// Case-insensitive substring match on name
    async fn search_by_name(&self, fragment: &str) -> StorageResult<Vec<Birthday>>;

    async fn find_all(&self) -> StorageResult<Vec<Birthday>>;

    /// Overwrite a stored record. Returns false if no record has that id.
    async fn update(&self, birthday: &Birthday) -> StorageResult<bool>;

    /// Returns true if the record was found and deleted
    async fn delete_by_id(&self, id: &str) -> StorageResult<bool>;

    async fn exists_by_id(&self, id: &str) -> StorageResult<bool>;

    /// Cheap round trip to check the backend is reachable
    async fn ping(&self) -> StorageResult<()>;

    /// Human-readable name of the underlying database
    fn database_name(&self) -> String;
}
