//! SQLite storage backend
//!
//! One row per document: the whole serialized collection in `payload`.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;

use super::StorageBackend;
use crate::error::{AnnotatorError, Result};

/// Payload table backed by SQLite
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Connect to (creating if missing) the database at `database_url`
    /// and initialize the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        // Every connection to `:memory:` is a separate database, so keep
        // exactly one alive for the lifetime of the pool.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;
        let backend = Self { pool };
        backend.init().await?;
        Ok(backend)
    }

    /// Wrap an existing pool. The schema is created if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let backend = Self { pool };
        backend.init().await?;
        Ok(backend)
    }

    /// Initialize the annotation_sets table
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS annotation_sets (
                storage_key TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of stored documents
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM annotation_sets")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let payload = sqlx::query_scalar::<_, String>(
            "SELECT payload FROM annotation_sets WHERE storage_key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AnnotatorError::StorageReadFailure(e.to_string()))?;

        Ok(payload)
    }

    async fn write(&self, key: &str, payload: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO annotation_sets (storage_key, payload, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AnnotatorError::StorageWriteFailure(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{Anchor, AnchorRect};
    use crate::annotations::{Annotation, AnnotationCollection, HighlightColor};
    use crate::identity::fingerprint;
    use crate::store::{storage_key, AnnotationStore, LoadStatus};

    async fn setup_test_db() -> SqliteBackend {
        SqliteBackend::connect("sqlite::memory:").await.unwrap()
    }

    fn sample_collection() -> AnnotationCollection {
        let mut c = AnnotationCollection::new();
        let mut a = Annotation::new(
            "The quick brown fox",
            HighlightColor::Purple,
            Anchor {
                page_index: 3,
                rect: AnchorRect::new(412.5, 72.0, 233.25, 14.0),
            },
        );
        a.comment = "check citation".to_string();
        c.push(a);
        c
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let backend = setup_test_db().await;

        assert!(backend.read("k").await.unwrap().is_none());
        backend.write("k", "[]").await.unwrap();
        backend.write("k", "[1]").await.unwrap();

        assert_eq!(backend.read("k").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(backend.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let store = AnnotationStore::new(setup_test_db().await);
        let fp = fingerprint(b"%PDF-1.7 sqlite");
        let c = sample_collection();

        store.save(&fp, &c).await.unwrap();
        let (loaded, status) = store.load_with_status(&fp).await.unwrap();
        assert_eq!(status, LoadStatus::Found);
        assert_eq!(loaded, c);
    }

    #[tokio::test]
    async fn test_corrupt_row_reads_as_empty() {
        let backend = setup_test_db().await;
        let fp = fingerprint(b"doc");
        backend.write(&storage_key(&fp), "{\"not\": \"a list\"}").await.unwrap();

        let store = AnnotationStore::new(backend);
        let (loaded, status) = store.load_with_status(&fp).await.unwrap();
        assert!(loaded.is_empty());
        assert_eq!(status, LoadStatus::Corrupt);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("annotations.db").display());
        let fp = fingerprint(b"%PDF-1.7 reopen");
        let c = sample_collection();

        {
            let backend = SqliteBackend::connect(&url).await.unwrap();
            AnnotationStore::new(backend.clone()).save(&fp, &c).await.unwrap();
            backend.close().await;
        }

        let store = AnnotationStore::new(SqliteBackend::connect(&url).await.unwrap());
        assert_eq!(store.load(&fp).await.unwrap(), c);
    }
}
