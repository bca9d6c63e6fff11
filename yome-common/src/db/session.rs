//! Unit-of-work session over a SQLite pool
//!
//! A [`Session`] owns at most one open transaction, begun lazily on first
//! use. Inserts registered with [`Session::add`] stay pending until the next
//! [`Session::flush`], [`Session::commit`] or query (queries autoflush).
//! Flushed rows are visible inside the session only; [`Session::commit`]
//! publishes them. Dropping a session with an open transaction rolls it back.

use super::models::Entity;
use super::value::{bind_value, Fields};
use crate::{Error, Result};
use sqlx::{FromRow, Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::debug;

struct PendingInsert {
    table: &'static str,
    fields: Fields,
}

/// Explicit persistence collaborator passed to every database operation
pub struct Session {
    pool: SqlitePool,
    tx: Option<Transaction<'static, Sqlite>>,
    pending: Vec<PendingInsert>,
}

impl Session {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            tx: None,
            pending: Vec::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of registered inserts not yet flushed
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Register a new `E` row with the given fields
    ///
    /// Field names are checked against `E::FIELDS`; nothing touches the
    /// database until the next flush.
    pub fn add<E: Entity>(&mut self, fields: Fields) -> Result<()> {
        validate_fields::<E>(&fields)?;
        self.pending.push(PendingInsert {
            table: E::TABLE,
            fields,
        });
        Ok(())
    }

    /// Connection of the session transaction, beginning one if needed
    pub async fn connection(&mut self) -> Result<&mut SqliteConnection> {
        if self.tx.is_none() {
            debug!("Beginning session transaction");
            self.tx = Some(self.pool.begin().await?);
        }
        match self.tx.as_mut() {
            Some(tx) => Ok(&mut **tx),
            None => Err(Error::Internal("Session transaction not open".to_string())),
        }
    }

    /// Execute pending inserts inside the session transaction
    ///
    /// Returns the new row ids in registration order. After a failed flush
    /// the session should be rolled back.
    pub async fn flush(&mut self) -> Result<Vec<i64>> {
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }

        let pending = std::mem::take(&mut self.pending);
        let conn = self.connection().await?;

        let mut ids = Vec::with_capacity(pending.len());
        for insert in &pending {
            let sql = insert_sql(insert.table, &insert.fields);
            let mut query = sqlx::query(&sql);
            for value in insert.fields.values() {
                query = bind_value(query, value);
            }
            let result = query.execute(&mut *conn).await?;
            ids.push(result.last_insert_rowid());
        }

        debug!(rows = ids.len(), "Flushed pending inserts");
        Ok(ids)
    }

    /// Flush, then commit the session transaction
    ///
    /// The next operation begins a fresh transaction.
    pub async fn commit(&mut self) -> Result<Vec<i64>> {
        let ids = self.flush().await?;
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            debug!(rows = ids.len(), "Committed session transaction");
        }
        Ok(ids)
    }

    /// Discard pending inserts and roll back the open transaction
    pub async fn rollback(&mut self) -> Result<()> {
        self.pending.clear();
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
            debug!("Rolled back session transaction");
        }
        Ok(())
    }

    /// First `E` (by id) whose fields all equal `filter`
    ///
    /// Comparison uses SQLite `IS`, so a Null filter value matches NULL.
    pub async fn find_first<E: Entity>(&mut self, filter: &Fields) -> Result<Option<E>> {
        validate_fields::<E>(filter)?;
        self.flush().await?;

        let mut sql = format!("SELECT * FROM {}", E::TABLE);
        if !filter.is_empty() {
            let clauses: Vec<String> = filter.names().map(|n| format!("{} IS ?", n)).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id LIMIT 1");

        let mut query = sqlx::query(&sql);
        for value in filter.values() {
            query = bind_value(query, value);
        }

        let conn = self.connection().await?;
        let row = query.fetch_optional(&mut *conn).await?;
        Ok(row.map(|r| E::from_row(&r)).transpose()?)
    }

    /// Fetch an `E` by primary key
    pub async fn get<E: Entity>(&mut self, id: i64) -> Result<Option<E>> {
        self.flush().await?;

        let sql = format!("SELECT * FROM {} WHERE id = ?", E::TABLE);
        let conn = self.connection().await?;
        let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;
        Ok(row.map(|r| E::from_row(&r)).transpose()?)
    }
}

fn validate_fields<E: Entity>(fields: &Fields) -> Result<()> {
    if let Some(unknown) = fields
        .names()
        .find(|name| !E::FIELDS.iter().any(|field| field == name))
    {
        return Err(Error::InvalidInput(format!(
            "Unknown field '{}' for table {}",
            unknown,
            E::TABLE
        )));
    }
    Ok(())
}

fn insert_sql(table: &str, fields: &Fields) -> String {
    if fields.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", table);
    }
    let columns: Vec<&str> = fields.names().collect();
    let placeholders = vec!["?"; columns.len()];
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Gene, KnowledgebaseGene};

    #[test]
    fn test_insert_sql() {
        let fields = Fields::new().with("locus_id", "b0001");
        assert_eq!(
            insert_sql("genes", &fields),
            "INSERT INTO genes (locus_id) VALUES (?)"
        );
        assert_eq!(
            insert_sql("genes", &Fields::new()),
            "INSERT INTO genes DEFAULT VALUES"
        );
    }

    #[test]
    fn test_validate_fields_rejects_unknown() {
        let fields = Fields::new().with("locus", "b0001");
        let err = validate_fields::<Gene>(&fields).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_validate_fields_accepts_known() {
        let fields = Fields::new()
            .with("gene_id", 1_i64)
            .with("annotation_quality", None::<String>);
        assert!(validate_fields::<KnowledgebaseGene>(&fields).is_ok());
    }

    #[tokio::test]
    async fn test_add_is_pending_until_flush() {
        let pool = crate::db::init_in_memory().await.unwrap();
        let mut session = Session::new(pool);

        session
            .add::<Gene>(Fields::new().with("locus_id", "b0001"))
            .unwrap();
        assert_eq!(session.pending(), 1);
        assert!(!session.in_transaction());

        let ids = session.flush().await.unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(session.pending(), 0);
        assert!(session.in_transaction());
    }

    #[tokio::test]
    async fn test_rollback_discards_flushed_rows() {
        let pool = crate::db::init_in_memory().await.unwrap();
        let mut session = Session::new(pool);
        let filter = Fields::new().with("locus_id", "b0001");

        session.add::<Gene>(filter.clone()).unwrap();
        session.flush().await.unwrap();
        assert!(session.find_first::<Gene>(&filter).await.unwrap().is_some());

        session.rollback().await.unwrap();
        assert!(session.find_first::<Gene>(&filter).await.unwrap().is_none());
    }
}
