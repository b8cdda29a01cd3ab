//! PostgreSQL implementation of the record repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{NewRecord, OwnedLink, RecordView, StoreStats};
use crate::domain::error::StoreError;
use crate::domain::repositories::{BatchOutcome, InsertOutcome, RecordRepository};
use crate::utils::db_error::{UniqueViolation, unique_violation};

const INSERT_RECORD: &str =
    "INSERT INTO shortener (short_url, original_url, user_id) VALUES ($1, $2, $3)";

/// PostgreSQL repository for short link records.
///
/// URL uniqueness is enforced by the `shortener_original_url_key` constraint:
/// inserts are attempted blindly and a violation is resolved by looking up the
/// key that already owns the URL. Batch inserts and deletions run in their own
/// transaction, rolled back on every error path.
pub struct PgRecordRepository {
    pool: Arc<PgPool>,
}

impl PgRecordRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Resolves the key behind a URL that just failed the uniqueness check.
    async fn conflicting_key(&self, original_url: &str) -> Result<String, StoreError> {
        self.find_key_by_url(original_url)
            .await?
            .ok_or_else(|| StoreError::MissingConflict(original_url.to_string()))
    }

    /// Inserts records one by one inside `tx`.
    ///
    /// On failure, returns the index of the offending record with its error.
    async fn insert_all(
        tx: &mut Transaction<'_, Postgres>,
        records: &[NewRecord],
    ) -> Result<(), (usize, sqlx::Error)> {
        for (index, record) in records.iter().enumerate() {
            sqlx::query(INSERT_RECORD)
                .bind(&record.key)
                .bind(&record.original_url)
                .bind(&record.owner_id)
                .execute(&mut **tx)
                .await
                .map_err(|e| (index, e))?;
        }

        Ok(())
    }
}

/// Finds the first URL that appears twice in a batch.
///
/// Returns the repeated URL and the key of its first occurrence.
fn repeated_url(records: &[NewRecord]) -> Option<(&str, &str)> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(records.len());

    for record in records {
        if let Some(first_key) = seen.get(record.original_url.as_str()) {
            return Some((record.original_url.as_str(), first_key));
        }
        seen.insert(&record.original_url, &record.key);
    }

    None
}

#[async_trait]
impl RecordRepository for PgRecordRepository {
    async fn get(&self, key: &str) -> Result<Option<RecordView>, StoreError> {
        let row: Option<(String, bool)> =
            sqlx::query_as("SELECT original_url, is_deleted FROM shortener WHERE short_url = $1")
                .bind(key)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(|(original_url, is_deleted)| RecordView {
            original_url,
            is_deleted,
        }))
    }

    async fn add(&self, record: NewRecord) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(INSERT_RECORD)
            .bind(&record.key)
            .bind(&record.original_url)
            .bind(&record.owner_id)
            .execute(self.pool.as_ref())
            .await;

        let Err(e) = result else {
            return Ok(InsertOutcome::Created);
        };

        match unique_violation(&e) {
            Some(UniqueViolation::OriginalUrl) => Ok(InsertOutcome::Conflict {
                existing_key: self.conflicting_key(&record.original_url).await?,
            }),
            Some(UniqueViolation::Key) => Err(StoreError::DuplicateKey(record.key)),
            None => Err(e.into()),
        }
    }

    async fn add_batch(&self, records: Vec<NewRecord>) -> Result<BatchOutcome, StoreError> {
        if let Some((url, key)) = repeated_url(&records) {
            return Ok(BatchOutcome::Conflict {
                original_url: url.to_string(),
                key: key.to_string(),
            });
        }

        let mut tx = self.pool.begin().await?;

        if let Err((index, e)) = Self::insert_all(&mut tx, &records).await {
            tx.rollback().await?;

            let failed = &records[index];
            return match unique_violation(&e) {
                Some(UniqueViolation::OriginalUrl) => Ok(BatchOutcome::Conflict {
                    original_url: failed.original_url.clone(),
                    key: self.conflicting_key(&failed.original_url).await?,
                }),
                Some(UniqueViolation::Key) => Err(StoreError::DuplicateKey(failed.key.clone())),
                None => Err(e.into()),
            };
        }

        tx.commit().await?;
        Ok(BatchOutcome::Committed)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<OwnedLink>, StoreError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT short_url, original_url
            FROM shortener
            WHERE user_id = $1 AND NOT is_deleted
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(short_key, original_url)| OwnedLink {
                short_key,
                original_url,
            })
            .collect())
    }

    async fn delete_batch(&self, owner_id: &str, keys: Vec<String>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE shortener
            SET is_deleted = TRUE
            WHERE user_id = $1 AND short_url = ANY($2)
            "#,
        )
        .bind(owner_id)
        .bind(&keys)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(done) => {
                tx.commit().await?;
                tracing::debug!(
                    owner_id,
                    requested = keys.len(),
                    flagged = done.rows_affected(),
                    "Soft-deleted records"
                );
                Ok(())
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e.into())
            }
        }
    }

    async fn find_key_by_url(&self, original_url: &str) -> Result<Option<String>, StoreError> {
        let key = sqlx::query_scalar("SELECT short_url FROM shortener WHERE original_url = $1")
            .bind(original_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(key)
    }

    async fn stats(&self) -> Result<StoreStats, StoreError> {
        let (distinct_owner_count, non_deleted_record_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT user_id), COUNT(*)
            FROM shortener
            WHERE NOT is_deleted
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(StoreStats {
            distinct_owner_count,
            non_deleted_record_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
