//! Shortening, resolution and deletion orchestration.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::deletion_job::DeletionJob;
use crate::domain::deletion_worker::DeletionPool;
use crate::domain::entities::{NewRecord, OwnedLink, StoreStats};
use crate::domain::error::StoreError;
use crate::domain::repositories::{BatchOutcome, InsertOutcome, RecordRepository};
use crate::error::AppError;
use crate::utils::key_generator::generate_key;

/// Number of fresh keys drawn before a generated-key collision becomes an error.
pub const MAX_KEY_ATTEMPTS: usize = 10;

/// Number of keys carried by each deletion job.
pub const DELETION_CHUNK_SIZE: usize = 2;

/// Result of [`ShortenerService::shorten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub key: String,
    /// `false` when the URL was already shortened and `key` is the existing one.
    pub created: bool,
}

/// One entry of a batch shortening request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequestItem {
    pub correlation_id: String,
    pub original_url: String,
}

/// Key assigned to one entry of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResultItem {
    pub correlation_id: String,
    pub key: String,
}

/// Result of [`ShortenerService::shorten_batch`].
///
/// `items` always lists the key generated for every request. When
/// `conflict_key` is set nothing was committed and `items` are only the keys
/// the batch would have used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchShortenOutcome {
    pub items: Vec<BatchResultItem>,
    pub conflict_key: Option<String>,
}

/// Outcome of resolving a short key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Active(String),
    Deleted,
    NotFound,
}

/// Core operations behind every transport adapter.
///
/// Callers pass an opaque owner id. Expected conditions come back as typed
/// outcomes; only backend faults and a closed deletion queue become errors.
pub struct ShortenerService<R: RecordRepository + ?Sized> {
    repository: Arc<R>,
    deletion_pool: Arc<DeletionPool>,
}

impl<R: RecordRepository + ?Sized> ShortenerService<R> {
    pub fn new(repository: Arc<R>, deletion_pool: Arc<DeletionPool>) -> Self {
        Self {
            repository,
            deletion_pool,
        }
    }

    /// Shortens `original_url` on behalf of `owner_id`.
    ///
    /// A URL that is already stored, by anyone, yields its existing key with
    /// `created = false`. Collisions on the generated key are retried with a
    /// fresh key, up to [`MAX_KEY_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on backend failure or when every
    /// generated key collided.
    pub async fn shorten(
        &self,
        original_url: &str,
        owner_id: &str,
    ) -> Result<ShortenOutcome, AppError> {
        for _ in 0..MAX_KEY_ATTEMPTS {
            let key = generate_key();
            let record = NewRecord::new(key.clone(), original_url, owner_id);

            match self.repository.add(record).await {
                Ok(InsertOutcome::Created) => {
                    debug!(%key, owner_id, "Short link created");
                    return Ok(ShortenOutcome { key, created: true });
                }
                Ok(InsertOutcome::Conflict { existing_key }) => {
                    return Ok(ShortenOutcome {
                        key: existing_key,
                        created: false,
                    });
                }
                Err(StoreError::DuplicateKey(taken)) => {
                    warn!(key = %taken, "Generated key already taken, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(key_exhausted())
    }

    /// Shortens every URL of `requests` or none of them.
    ///
    /// The first URL that is already stored, or repeated inside the batch,
    /// aborts the whole batch and its key is reported in `conflict_key`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::shorten`].
    pub async fn shorten_batch(
        &self,
        requests: Vec<BatchRequestItem>,
        owner_id: &str,
    ) -> Result<BatchShortenOutcome, AppError> {
        if requests.is_empty() {
            return Ok(BatchShortenOutcome {
                items: Vec::new(),
                conflict_key: None,
            });
        }

        for _ in 0..MAX_KEY_ATTEMPTS {
            let items: Vec<BatchResultItem> = requests
                .iter()
                .map(|request| BatchResultItem {
                    correlation_id: request.correlation_id.clone(),
                    key: generate_key(),
                })
                .collect();

            let records = requests
                .iter()
                .zip(&items)
                .map(|(request, item)| {
                    NewRecord::new(item.key.clone(), request.original_url.clone(), owner_id)
                })
                .collect();

            match self.repository.add_batch(records).await {
                Ok(BatchOutcome::Committed) => {
                    debug!(count = items.len(), owner_id, "Batch committed");
                    return Ok(BatchShortenOutcome {
                        items,
                        conflict_key: None,
                    });
                }
                Ok(BatchOutcome::Conflict { original_url, key }) => {
                    debug!(%original_url, %key, "Batch aborted by conflicting URL");
                    return Ok(BatchShortenOutcome {
                        items,
                        conflict_key: Some(key),
                    });
                }
                Err(StoreError::DuplicateKey(taken)) => {
                    warn!(key = %taken, "Generated batch key already taken, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(key_exhausted())
    }

    /// Looks up the URL behind `key`.
    pub async fn resolve(&self, key: &str) -> Result<Resolution, AppError> {
        let resolution = match self.repository.get(key).await? {
            None => Resolution::NotFound,
            Some(view) if view.is_deleted => Resolution::Deleted,
            Some(view) => Resolution::Active(view.original_url),
        };

        Ok(resolution)
    }

    /// Lists the live links created by `owner_id`.
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<OwnedLink>, AppError> {
        Ok(self.repository.list_by_owner(owner_id).await?)
    }

    /// Queues the soft deletion of `keys` on behalf of `owner_id`.
    ///
    /// Keys are split into jobs of [`DELETION_CHUNK_SIZE`] and handed to the
    /// deletion pool. Returns the number of jobs queued; the deletion itself is
    /// applied later, so a `resolve` right after this call may still see the
    /// link as active.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] once the pool is shut down. Jobs queued
    /// before that point are still applied.
    pub async fn request_deletion(
        &self,
        owner_id: &str,
        keys: &[String],
    ) -> Result<usize, AppError> {
        let jobs = DeletionJob::chunked(owner_id, keys, DELETION_CHUNK_SIZE);
        let count = jobs.len();

        for job in jobs {
            self.deletion_pool.submit(job).await?;
        }

        debug!(owner_id, keys = keys.len(), jobs = count, "Deletion requested");
        Ok(count)
    }

    pub async fn stats(&self) -> Result<StoreStats, AppError> {
        Ok(self.repository.stats().await?)
    }

    /// Checks that the active backend answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        Ok(self.repository.ping().await?)
    }

    /// Deletion pool this service feeds.
    pub fn deletion_pool(&self) -> &Arc<DeletionPool> {
        &self.deletion_pool
    }
}

fn key_exhausted() -> AppError {
    AppError::internal(
        "Failed to generate unique key",
        json!({ "reason": "Too many collisions", "attempts": MAX_KEY_ATTEMPTS }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RecordView;
    use crate::domain::repositories::MockRecordRepository;
    use crate::infrastructure::persistence::MemoryRecordRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service_with(repo: MockRecordRepository) -> ShortenerService<MockRecordRepository> {
        let repo = Arc::new(repo);
        let pool = Arc::new(DeletionPool::start(repo.clone(), 1, 8));
        ShortenerService::new(repo, pool)
    }

    fn batch(urls: &[(&str, &str)]) -> Vec<BatchRequestItem> {
        urls.iter()
            .map(|(id, url)| BatchRequestItem {
                correlation_id: id.to_string(),
                original_url: url.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_shorten_creates_new_key() {
        let mut repo = MockRecordRepository::new();
        repo.expect_add()
            .withf(|r| r.original_url == "https://example.com" && r.owner_id == "u1")
            .times(1)
            .returning(|_| Ok(InsertOutcome::Created));

        let outcome = service_with(repo)
            .shorten("https://example.com", "u1")
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.key.len(), 8);
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_key_on_conflict() {
        let mut repo = MockRecordRepository::new();
        repo.expect_add().times(1).returning(|_| {
            Ok(InsertOutcome::Conflict {
                existing_key: "K1".to_string(),
            })
        });

        let outcome = service_with(repo)
            .shorten("https://example.com", "u2")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ShortenOutcome {
                key: "K1".to_string(),
                created: false
            }
        );
    }

    #[tokio::test]
    async fn test_shorten_retries_on_duplicate_key() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let mut repo = MockRecordRepository::new();
        repo.expect_add().times(3).returning(move |r| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(StoreError::DuplicateKey(r.key))
            } else {
                Ok(InsertOutcome::Created)
            }
        });

        let outcome = service_with(repo)
            .shorten("https://example.com", "u1")
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_max_attempts() {
        let mut repo = MockRecordRepository::new();
        repo.expect_add()
            .times(MAX_KEY_ATTEMPTS)
            .returning(|r| Err(StoreError::DuplicateKey(r.key)));

        let result = service_with(repo)
            .shorten("https://example.com", "u1")
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_shorten_does_not_retry_backend_failure() {
        let mut repo = MockRecordRepository::new();
        repo.expect_add()
            .times(1)
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));

        let result = service_with(repo)
            .shorten("https://example.com", "u1")
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_shorten_batch_returns_generated_keys() {
        let mut repo = MockRecordRepository::new();
        repo.expect_add_batch()
            .withf(|records| records.len() == 2 && records.iter().all(|r| r.owner_id == "u1"))
            .times(1)
            .returning(|_| Ok(BatchOutcome::Committed));

        let outcome = service_with(repo)
            .shorten_batch(batch(&[("a", "https://a.com"), ("b", "https://b.com")]), "u1")
            .await
            .unwrap();

        assert_eq!(outcome.conflict_key, None);
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[0].correlation_id, "a");
        assert_eq!(outcome.items[1].correlation_id, "b");
        assert_ne!(outcome.items[0].key, outcome.items[1].key);
    }

    #[tokio::test]
    async fn test_shorten_batch_reports_conflict_key() {
        let mut repo = MockRecordRepository::new();
        repo.expect_add_batch().times(1).returning(|_| {
            Ok(BatchOutcome::Conflict {
                original_url: "https://b.com".to_string(),
                key: "existing".to_string(),
            })
        });

        let outcome = service_with(repo)
            .shorten_batch(batch(&[("a", "https://a.com"), ("b", "https://b.com")]), "u1")
            .await
            .unwrap();

        assert_eq!(outcome.conflict_key.as_deref(), Some("existing"));
        assert_eq!(outcome.items.len(), 2);
    }

    #[tokio::test]
    async fn test_shorten_batch_empty_skips_store() {
        let repo = MockRecordRepository::new();

        let outcome = service_with(repo)
            .shorten_batch(Vec::new(), "u1")
            .await
            .unwrap();

        assert!(outcome.items.is_empty());
        assert_eq!(outcome.conflict_key, None);
    }

    #[tokio::test]
    async fn test_resolve_outcomes() {
        let mut repo = MockRecordRepository::new();
        repo.expect_get().returning(|key| {
            Ok(match key {
                "live" => Some(RecordView {
                    original_url: "https://live.com".to_string(),
                    is_deleted: false,
                }),
                "gone" => Some(RecordView {
                    original_url: "https://gone.com".to_string(),
                    is_deleted: true,
                }),
                _ => None,
            })
        });

        let service = service_with(repo);

        assert_eq!(
            service.resolve("live").await.unwrap(),
            Resolution::Active("https://live.com".to_string())
        );
        assert_eq!(service.resolve("gone").await.unwrap(), Resolution::Deleted);
        assert_eq!(
            service.resolve("missing").await.unwrap(),
            Resolution::NotFound
        );
    }

    #[tokio::test]
    async fn test_request_deletion_chunks_keys() {
        let jobs = Arc::new(AtomicUsize::new(0));
        let counter = jobs.clone();

        let mut repo = MockRecordRepository::new();
        repo.expect_delete_batch()
            .withf(|owner, keys| owner == "u1" && !keys.is_empty() && keys.len() <= 2)
            .returning(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        let service = service_with(repo);
        let keys: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|k| k.to_string())
            .collect();

        let queued = service.request_deletion("u1", &keys).await.unwrap();
        service.deletion_pool().shutdown().await;

        assert_eq!(queued, 3);
        assert_eq!(jobs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_request_deletion_after_shutdown_is_unavailable() {
        let service = service_with(MockRecordRepository::new());
        service.deletion_pool().shutdown().await;

        let result = service.request_deletion("u1", &["a".to_string()]).await;

        assert!(matches!(result, Err(AppError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_shorten_resolve_delete_scenario() {
        let repo = Arc::new(MemoryRecordRepository::new());
        let pool = Arc::new(DeletionPool::start(repo.clone(), 2, 16));
        let service = ShortenerService::new(repo.clone(), pool.clone());

        let first = service.shorten("https://example.com", "u1").await.unwrap();
        assert!(first.created);

        let second = service.shorten("https://example.com", "u2").await.unwrap();
        assert_eq!(second.key, first.key);
        assert!(!second.created);

        assert_eq!(
            service.resolve(&first.key).await.unwrap(),
            Resolution::Active("https://example.com".to_string())
        );

        // Someone else's deletion is a no-op.
        repo.delete_batch("u2", vec![first.key.clone()])
            .await
            .unwrap();
        assert_eq!(
            service.resolve(&first.key).await.unwrap(),
            Resolution::Active("https://example.com".to_string())
        );

        service
            .request_deletion("u1", std::slice::from_ref(&first.key))
            .await
            .unwrap();
        pool.shutdown().await;

        assert_eq!(
            service.resolve(&first.key).await.unwrap(),
            Resolution::Deleted
        );
        assert!(service.list_for_owner("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_passthrough() {
        let mut repo = MockRecordRepository::new();
        repo.expect_stats().times(1).returning(|| {
            Ok(StoreStats {
                distinct_owner_count: 2,
                non_deleted_record_count: 5,
            })
        });

        let stats = service_with(repo).stats().await.unwrap();

        assert_eq!(stats.distinct_owner_count, 2);
        assert_eq!(stats.non_deleted_record_count, 5);
    }
}
