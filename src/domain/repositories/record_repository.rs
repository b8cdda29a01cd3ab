//! Repository trait for short link records.

use crate::domain::entities::{NewRecord, OwnedLink, Record, RecordView, StoreStats};
use crate::domain::error::StoreError;
use async_trait::async_trait;

/// Result of a single insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was stored under the requested key.
    Created,
    /// The URL was already shortened; nothing was written.
    Conflict { existing_key: String },
}

/// Result of an all-or-nothing batch insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every record of the batch was stored.
    Committed,
    /// The first colliding URL aborted the batch; nothing was written.
    ///
    /// `key` is the key the URL is already stored under, or the key assigned to
    /// its earlier occurrence when the batch itself repeats a URL.
    Conflict { original_url: String, key: String },
}

/// Storage contract shared by every backend.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryRecordRepository`] - in-process map
/// - [`crate::infrastructure::persistence::PgRecordRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
///
/// # Guarantees
///
/// - `original_url` is unique across the whole store, whatever the owner
/// - keys are never reused and records are never physically removed
/// - readers never observe a partially applied `add_batch` or `delete_batch`
///
/// Backend faults surface as [`StoreError`] and are never retried here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Reads a single record.
    ///
    /// Returns `Ok(None)` when the key is unknown.
    async fn get(&self, key: &str) -> Result<Option<RecordView>, StoreError>;

    /// Inserts a record unless its URL is already stored.
    ///
    /// The check and the insert are atomic with respect to concurrent `add`
    /// calls for the same URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if the key itself is taken.
    async fn add(&self, record: NewRecord) -> Result<InsertOutcome, StoreError>;

    /// Inserts every record or none of them.
    async fn add_batch(&self, records: Vec<NewRecord>) -> Result<BatchOutcome, StoreError>;

    /// Lists the non-deleted links created by `owner_id`, in no particular order.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<OwnedLink>, StoreError>;

    /// Flags every key owned by `owner_id` as deleted.
    ///
    /// Keys owned by someone else, or unknown keys, are skipped silently.
    /// Flagging an already deleted key is a no-op.
    async fn delete_batch(&self, owner_id: &str, keys: Vec<String>) -> Result<(), StoreError>;

    /// Finds the key a URL is stored under.
    async fn find_key_by_url(&self, original_url: &str) -> Result<Option<String>, StoreError>;

    /// Counts distinct owners and records, both over non-deleted records.
    async fn stats(&self) -> Result<StoreStats, StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Side-effect hook called for every record a backend successfully adds.
///
/// Used by bootstrap collaborators to mirror new records into an external
/// sink. Implementations must not block for long: they run on the request path.
pub trait RecordSink: Send + Sync {
    fn record_added(&self, record: &Record);
}

impl<F> RecordSink for F
where
    F: Fn(&Record) + Send + Sync,
{
    fn record_added(&self, record: &Record) {
        self(record)
    }
}
