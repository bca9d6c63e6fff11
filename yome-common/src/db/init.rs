//! Database initialization
//!
//! Creates the knowledgebase schema on first run. All statements are
//! idempotent, so opening an existing database is safe.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open (creating if needed) the database at `db_path` and ensure the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Read-only openers cannot create a -shm file, so no WAL
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied
///
/// The one connection is never recycled; closing it would drop the data.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all knowledgebase tables
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_genes_table(pool).await?;
    create_knowledgebases_table(pool).await?;
    create_knowledgebase_genes_table(pool).await?;
    create_knowledgebase_features_table(pool).await?;
    Ok(())
}

async fn create_genes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genes (
            id INTEGER PRIMARY KEY,
            locus_id TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_knowledgebases_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS knowledgebases (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_knowledgebase_genes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS knowledgebase_genes (
            id INTEGER PRIMARY KEY,
            gene_id INTEGER NOT NULL REFERENCES genes(id) ON DELETE CASCADE,
            knowledgebase_id INTEGER NOT NULL REFERENCES knowledgebases(id) ON DELETE CASCADE,
            primary_name TEXT,
            annotation_quality TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_knowledgebase_genes_gene ON knowledgebase_genes(gene_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_knowledgebase_features_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS knowledgebase_features (
            id INTEGER PRIMARY KEY,
            knowledgebase_gene_id INTEGER NOT NULL
                REFERENCES knowledgebase_genes(id) ON DELETE CASCADE,
            feature_type TEXT NOT NULL,
            feature TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_knowledgebase_features_kbg ON knowledgebase_features(knowledgebase_gene_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
