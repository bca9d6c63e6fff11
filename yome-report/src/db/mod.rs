//! Database access layer for yome-report
//!
//! All connections are read-only.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Connect to database in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!("Database not found: {}", db_path.display());
    }

    // SQLite rejects every write on read-only connections
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true);

    let pool = SqlitePool::connect_with(options)
        .await
        .context("Failed to connect to database in read-only mode")?;

    Ok(pool)
}
