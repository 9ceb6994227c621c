//! libSQL implementation of `KeyValueStore`

use std::path::Path;
use std::sync::Arc;

use libsql::Connection;
use tokio::sync::Mutex;

use super::Database;
use crate::error::Result;
use crate::kv::{KeyValueStore, WriteBatch, WriteOp};

/// Key-value store backed by the `kv` table of a local libSQL database.
///
/// Clones share one connection; every call holds the lock for its whole
/// duration so batch transactions never interleave.
#[derive(Clone)]
pub struct LibSqlStore {
    db: Arc<Mutex<Database>>,
}

impl LibSqlStore {
    /// Open (or create) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::open(path).await?;
        Ok(Self::new(db))
    }

    /// Open an in-memory database (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self::new(db))
    }

    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }
}

async fn apply_op(conn: &Connection, op: &WriteOp) -> Result<()> {
    match op {
        WriteOp::Set { key, value } => {
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
                [key.as_str(), value.as_str()],
            )
            .await?;
        }
        WriteOp::Remove { key } => {
            conn.execute("DELETE FROM kv WHERE key = ?", [key.as_str()])
                .await?;
        }
    }
    Ok(())
}

impl KeyValueStore for LibSqlStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let db = self.db.lock().await;
        let mut rows = db
            .connection()
            .query("SELECT value FROM kv WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            let value: String = row.get(0)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let db = self.db.lock().await;
        apply_op(
            db.connection(),
            &WriteOp::Set {
                key: key.to_string(),
                value: value.to_string(),
            },
        )
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let db = self.db.lock().await;
        apply_op(
            db.connection(),
            &WriteOp::Remove {
                key: key.to_string(),
            },
        )
        .await
    }

    async fn apply(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let db = self.db.lock().await;
        let conn = db.connection();
        conn.execute("BEGIN TRANSACTION", ()).await?;

        for op in batch.ops() {
            if let Err(e) = apply_op(conn, op).await {
                conn.execute("ROLLBACK", ()).await.ok();
                tracing::warn!("Rolled back write batch at key {}: {}", op.key(), e);
                return Err(e);
            }
        }

        if let Err(e) = conn.execute("COMMIT", ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }

        Ok(())
    }
}
