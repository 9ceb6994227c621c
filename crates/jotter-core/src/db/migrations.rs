//! Schema migrations for the key-value database

use crate::error::Result;
use libsql::Connection;

/// Ordered schema steps; entry `n` upgrades the database to version `n + 1`.
const MIGRATIONS: &[&[&str]] = &[
    // v1: key-value table
    &["CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )"],
];

/// Bring the schema up to the newest version in [`MIGRATIONS`].
pub async fn run(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
        (),
    )
    .await?;

    let mut version = schema_version(conn).await?;
    for statements in MIGRATIONS.iter().skip(usize::try_from(version).unwrap_or(0)) {
        version += 1;
        apply(conn, version, statements).await?;
        tracing::info!("Migrated database to version {version}");
    }

    Ok(())
}

async fn schema_version(conn: &Connection) -> Result<i32> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;

    match rows.next().await? {
        Some(row) => Ok(row.get(0)?),
        None => Ok(0),
    }
}

/// Run one version's statements and record it, all in one transaction.
async fn apply(conn: &Connection, version: i32, statements: &[&str]) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", ()).await?;

    let outcome: Result<()> = async {
        for stmt in statements {
            conn.execute(stmt, ()).await?;
        }
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?)",
            [i64::from(version)],
        )
        .await?;
        conn.execute("COMMIT", ()).await?;
        Ok(())
    }
    .await;

    if outcome.is_err() {
        conn.execute("ROLLBACK", ()).await.ok();
    }
    outcome
}
