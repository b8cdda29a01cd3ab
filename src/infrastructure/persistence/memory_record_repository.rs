//! In-process implementation of the record repository.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{NewRecord, OwnedLink, Record, RecordView, StoreStats};
use crate::domain::error::StoreError;
use crate::domain::repositories::{BatchOutcome, InsertOutcome, RecordRepository, RecordSink};

/// Records plus a URL index, always mutated together.
#[derive(Debug, Default)]
struct Records {
    by_key: HashMap<String, Record>,
    key_by_url: HashMap<String, String>,
}

impl Records {
    fn insert(&mut self, record: Record) {
        self.key_by_url
            .entry(record.original_url.clone())
            .or_insert_with(|| record.key.clone());
        self.by_key.insert(record.key.clone(), record);
    }

    /// Checks a batch against the stored records and against itself.
    ///
    /// Returns the conflict that must abort the batch, if any. Nothing is mutated.
    fn validate_batch(&self, records: &[NewRecord]) -> Result<Option<BatchOutcome>, StoreError> {
        let mut batch_urls: HashMap<&str, &str> = HashMap::with_capacity(records.len());
        let mut batch_keys: HashSet<&str> = HashSet::with_capacity(records.len());

        for record in records {
            let url = record.original_url.as_str();

            let existing = self
                .key_by_url
                .get(url)
                .map(String::as_str)
                .or_else(|| batch_urls.get(url).copied());

            if let Some(key) = existing {
                return Ok(Some(BatchOutcome::Conflict {
                    original_url: record.original_url.clone(),
                    key: key.to_string(),
                }));
            }

            if self.by_key.contains_key(&record.key) || !batch_keys.insert(record.key.as_str()) {
                return Err(StoreError::DuplicateKey(record.key.clone()));
            }

            batch_urls.insert(url, record.key.as_str());
        }

        Ok(None)
    }
}

/// In-memory record store guarded by a single reader/writer lock.
///
/// All reads take the read lock and every mutation holds the write lock for
/// its whole critical section, so readers never see half of a batch. The lock
/// is never held across I/O.
///
/// An optional [`RecordSink`] is notified of every record added through
/// [`RecordRepository::add`] or [`RecordRepository::add_batch`], after the lock
/// is released.
#[derive(Default)]
pub struct MemoryRecordRepository {
    records: RwLock<Records>,
    sink: Option<Arc<dyn RecordSink>>,
}

impl MemoryRecordRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `records`.
    ///
    /// Seeding bypasses the sink. If two seed records share a URL, the first
    /// one wins the URL index.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut seeded = Records::default();
        for record in records {
            seeded.insert(record);
        }

        Self {
            records: RwLock::new(seeded),
            sink: None,
        }
    }

    /// Attaches a hook called for every successfully added record.
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Number of stored records, deleted ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.by_key.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn notify(&self, records: &[Record]) {
        if let Some(sink) = &self.sink {
            records.iter().for_each(|r| sink.record_added(r));
        }
    }
}

#[async_trait]
impl RecordRepository for MemoryRecordRepository {
    async fn get(&self, key: &str) -> Result<Option<RecordView>, StoreError> {
        let records = self.records.read().await;

        Ok(records.by_key.get(key).map(|r| RecordView {
            original_url: r.original_url.clone(),
            is_deleted: r.is_deleted,
        }))
    }

    async fn add(&self, record: NewRecord) -> Result<InsertOutcome, StoreError> {
        let record = {
            let mut records = self.records.write().await;

            if let Some(existing_key) = records.key_by_url.get(&record.original_url) {
                return Ok(InsertOutcome::Conflict {
                    existing_key: existing_key.clone(),
                });
            }

            if records.by_key.contains_key(&record.key) {
                return Err(StoreError::DuplicateKey(record.key));
            }

            let record = Record::from(record);
            records.insert(record.clone());
            record
        };

        self.notify(std::slice::from_ref(&record));
        Ok(InsertOutcome::Created)
    }

    async fn add_batch(&self, batch: Vec<NewRecord>) -> Result<BatchOutcome, StoreError> {
        let added: Vec<Record> = {
            let mut records = self.records.write().await;

            if let Some(conflict) = records.validate_batch(&batch)? {
                return Ok(conflict);
            }

            batch
                .into_iter()
                .map(|new| {
                    let record = Record::from(new);
                    records.insert(record.clone());
                    record
                })
                .collect()
        };

        self.notify(&added);
        Ok(BatchOutcome::Committed)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<OwnedLink>, StoreError> {
        let records = self.records.read().await;

        Ok(records
            .by_key
            .values()
            .filter(|r| r.is_owned_by(owner_id) && !r.is_deleted)
            .map(|r| OwnedLink {
                short_key: r.key.clone(),
                original_url: r.original_url.clone(),
            })
            .collect())
    }

    async fn delete_batch(&self, owner_id: &str, keys: Vec<String>) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        for key in &keys {
            if let Some(record) = records.by_key.get_mut(key)
                && record.is_owned_by(owner_id)
            {
                record.is_deleted = true;
            }
        }

        Ok(())
    }

    async fn find_key_by_url(&self, original_url: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.read().await.key_by_url.get(original_url).cloned())
    }

    async fn stats(&self) -> Result<StoreStats, StoreError> {
        let records = self.records.read().await;

        let live: Vec<&Record> = records.by_key.values().filter(|r| !r.is_deleted).collect();
        let owners: HashSet<&str> = live.iter().map(|r| r.owner_id.as_str()).collect();

        Ok(StoreStats {
            distinct_owner_count: owners.len() as i64,
            non_deleted_record_count: live.len() as i64,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_validate_batch_leaves_store_untouched_on_conflict() {
        let repo = MemoryRecordRepository::with_records([Record::new(
            "existing".to_string(),
            "https://taken.com".to_string(),
            "u0".to_string(),
        )]);

        let outcome = repo
            .add_batch(vec![
                NewRecord::new("k1", "https://fresh.com", "u1"),
                NewRecord::new("k2", "https://taken.com", "u1"),
            ])
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BatchOutcome::Conflict {
                original_url: "https://taken.com".to_string(),
                key: "existing".to_string(),
            }
        );
        assert_eq!(repo.len().await, 1);
        assert!(repo.get("k1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_repeating_a_url_reports_earlier_key() {
        let repo = MemoryRecordRepository::new();

        let outcome = repo
            .add_batch(vec![
                NewRecord::new("k1", "https://twice.com", "u1"),
                NewRecord::new("k2", "https://twice.com", "u1"),
            ])
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BatchOutcome::Conflict {
                original_url: "https://twice.com".to_string(),
                key: "k1".to_string(),
            }
        );
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_batch_repeating_a_key_is_an_error() {
        let repo = MemoryRecordRepository::new();

        let result = repo
            .add_batch(vec![
                NewRecord::new("same", "https://a.com", "u1"),
                NewRecord::new("same", "https://b.com", "u1"),
            ])
            .await;

        assert!(matches!(result, Err(StoreError::DuplicateKey(k)) if k == "same"));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_sink_sees_every_added_record() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let log = seen.clone();
        let sink = move |record: &Record| log.lock().unwrap().push(record.key.clone());

        let repo = MemoryRecordRepository::new().with_sink(Arc::new(sink));

        repo.add(NewRecord::new("a", "https://a.com", "u1"))
            .await
            .unwrap();
        repo.add(NewRecord::new("dup", "https://a.com", "u2"))
            .await
            .unwrap();
        repo.add_batch(vec![
            NewRecord::new("b", "https://b.com", "u1"),
            NewRecord::new("c", "https://c.com", "u1"),
        ])
        .await
        .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_seeded_records_are_visible() {
        let mut deleted = Record::new(
            "gone".to_string(),
            "https://gone.com".to_string(),
            "u1".to_string(),
        );
        deleted.is_deleted = true;

        let repo = MemoryRecordRepository::with_records([
            Record::new(
                "live".to_string(),
                "https://live.com".to_string(),
                "u1".to_string(),
            ),
            deleted,
        ]);

        assert_eq!(repo.len().await, 2);
        assert!(repo.get("gone").await.unwrap().unwrap().is_deleted);
        assert_eq!(
            repo.find_key_by_url("https://live.com").await.unwrap(),
            Some("live".to_string())
        );
        assert_eq!(repo.list_by_owner("u1").await.unwrap().len(), 1);
    }
}
