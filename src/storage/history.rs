//! Scan history persistence.
//!
//! Every mutation checks ownership inside the same statement
//! (`WHERE id = ? AND owner_id = ?`), so a record owned by someone else is
//! indistinguishable from a missing one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error_handling::DatabaseError;
use crate::models::ScanRecord;

/// Storage of scan records, keyed by owner.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Stores a new record and returns its id.
    async fn create(
        &self,
        owner_id: &str,
        url: &str,
        serialized_result: &str,
    ) -> Result<String, DatabaseError>;

    /// All records of `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ScanRecord>, DatabaseError>;

    /// Replaces the notes of a record. `None` clears them.
    ///
    /// Returns `false` if the record doesn't exist or isn't owned by
    /// `requester_id`.
    async fn update_notes(
        &self,
        record_id: &str,
        requester_id: &str,
        notes: Option<&str>,
    ) -> Result<bool, DatabaseError>;

    /// Whether `record_id` exists and is owned by `requester_id`.
    async fn owns(&self, record_id: &str, requester_id: &str) -> Result<bool, DatabaseError>;

    /// Deletes a record. Same ownership rule as [`HistoryStore::update_notes`].
    async fn delete(&self, record_id: &str, requester_id: &str) -> Result<bool, DatabaseError>;
}

/// `HistoryStore` backed by the `scans` table.
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteHistoryStore { pool }
    }
}

fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn create(
        &self,
        owner_id: &str,
        url: &str,
        serialized_result: &str,
    ) -> Result<String, DatabaseError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO scans (id, owner_id, url, result, created_at_ms, notes)
             VALUES (?, ?, ?, ?, ?, NULL)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(url)
        .bind(serialized_result)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        log::debug!("Stored scan {id} of {url} for {owner_id}");
        Ok(id)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ScanRecord>, DatabaseError> {
        // rowid breaks ties between scans stored in the same millisecond.
        let rows = sqlx::query(
            "SELECT id, owner_id, url, result, created_at_ms, notes
             FROM scans
             WHERE owner_id = ?
             ORDER BY created_at_ms DESC, rowid DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<ScanRecord, DatabaseError> {
                Ok(ScanRecord {
                    id: row.try_get("id")?,
                    owner_id: row.try_get("owner_id")?,
                    url: row.try_get("url")?,
                    result: row.try_get("result")?,
                    created_at: millis_to_datetime(row.try_get("created_at_ms")?),
                    notes: row.try_get("notes")?,
                })
            })
            .collect()
    }

    async fn update_notes(
        &self,
        record_id: &str,
        requester_id: &str,
        notes: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE scans SET notes = ? WHERE id = ? AND owner_id = ?")
            .bind(notes)
            .bind(record_id)
            .bind(requester_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn owns(&self, record_id: &str, requester_id: &str) -> Result<bool, DatabaseError> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM scans WHERE id = ? AND owner_id = ?")
                .bind(record_id)
                .bind(requester_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    async fn delete(&self, record_id: &str, requester_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM scans WHERE id = ? AND owner_id = ?")
            .bind(record_id)
            .bind(requester_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
