//! Query results as column-labelled tables
//!
//! [`to_table`] runs a [`Query`] and materializes every result row into a
//! [`Table`]. All rows of a table hold exactly one value per column.

use crate::db::value::{bind_value, decode_column, Value};
use crate::{Error, Result};
use serde::Serialize;
use sqlx::{Column, Executor, Row, Sqlite};
use tracing::debug;

/// SQL text plus positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: String,
    binds: Vec<Value>,
}

impl Query {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    /// Append the next positional parameter
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.binds.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// Ordered columns and rows of values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Read-only view of one table row
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> RowRef<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

impl Table {
    /// Table with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row; its width must match the column count
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::InvalidInput(format!(
                "Row has {} values, table has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(values);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub(crate) fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown column '{}'", column)))
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|values| &values[col])
    }

    pub fn set(&mut self, row: usize, column: &str, value: impl Into<Value>) -> Result<()> {
        let col = self.require_column(column)?;
        let len = self.rows.len();
        let values = self
            .rows
            .get_mut(row)
            .ok_or_else(|| Error::InvalidInput(format!("Row {} out of range ({} rows)", row, len)))?;
        values[col] = value.into();
        Ok(())
    }

    pub(crate) fn set_at(&mut self, row: usize, col: usize, value: Value) {
        self.rows[row][col] = value;
    }

    /// Values of one column, top to bottom
    pub fn column(&self, column: &str) -> Result<Vec<&Value>> {
        let col = self.require_column(column)?;
        Ok(self.rows.iter().map(|values| &values[col]).collect())
    }

    /// Recompute `column` for every row from the row's current values
    pub fn update_column<F>(&mut self, column: &str, mut f: F) -> Result<()>
    where
        F: FnMut(RowRef<'_>) -> Value,
    {
        let col = self.require_column(column)?;
        let updated: Vec<Value> = self.rows().map(&mut f).collect();
        for (values, value) in self.rows.iter_mut().zip(updated) {
            values[col] = value;
        }
        Ok(())
    }

    /// Remove the named columns; every name must exist
    pub fn drop_columns(&mut self, columns: &[&str]) -> Result<()> {
        let mut drop = Vec::with_capacity(columns.len());
        for column in columns {
            drop.push(self.require_column(column)?);
        }

        let keep: Vec<usize> = (0..self.columns.len()).filter(|i| !drop.contains(i)).collect();
        self.columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        for values in &mut self.rows {
            *values = keep.iter().map(|&i| values[i].clone()).collect();
        }
        Ok(())
    }

    /// Split `index` columns off as a display index
    ///
    /// Rows keep their order; nothing is deduplicated or aggregated.
    pub fn set_index(self, index: &[&str]) -> Result<IndexedTable> {
        let mut index_cols = Vec::with_capacity(index.len());
        for column in index {
            index_cols.push(self.require_column(column)?);
        }
        let data_cols: Vec<usize> = (0..self.columns.len())
            .filter(|i| !index_cols.contains(i))
            .collect();

        let pick = |cols: &[usize], values: &[Value]| -> Vec<Value> {
            cols.iter().map(|&i| values[i].clone()).collect()
        };

        Ok(IndexedTable {
            index_names: index_cols.iter().map(|&i| self.columns[i].clone()).collect(),
            columns: data_cols.iter().map(|&i| self.columns[i].clone()).collect(),
            index: self.rows.iter().map(|r| pick(&index_cols, r)).collect(),
            rows: self.rows.iter().map(|r| pick(&data_cols, r)).collect(),
        })
    }
}

/// A table whose leading columns form a multi-level row index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedTable {
    index_names: Vec<String>,
    columns: Vec<String>,
    index: Vec<Vec<Value>>,
    rows: Vec<Vec<Value>>,
}

impl IndexedTable {
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(index values, data values)` per row
    pub fn entries(&self) -> impl Iterator<Item = (&[Value], &[Value])> {
        self.index
            .iter()
            .zip(&self.rows)
            .map(|(i, r)| (i.as_slice(), r.as_slice()))
    }

    /// Display span of index `level` starting at `row`
    ///
    /// Consecutive rows sharing the same index prefix up to and including
    /// `level` are merged: the first row gets the span length, later rows 0.
    /// Out-of-range `row` or `level` spans nothing.
    pub fn level_span(&self, row: usize, level: usize) -> usize {
        if row >= self.index.len() || level >= self.index_names.len() {
            return 0;
        }
        let same_prefix = |a: usize, b: usize| self.index[a][..=level] == self.index[b][..=level];

        if row > 0 && same_prefix(row - 1, row) {
            return 0;
        }
        (row..self.index.len())
            .take_while(|&r| same_prefix(row, r))
            .count()
    }
}

/// Run `query` and collect its rows into a [`Table`].
///
/// Column names default to those the database reports for the result set.
/// Explicit `columns` are matched positionally against each result row. An
/// empty result yields [`Table::empty`].
pub async fn to_table<'e, X>(executor: X, query: &Query, columns: Option<&[&str]>) -> Result<Table>
where
    X: Executor<'e, Database = Sqlite>,
{
    let mut sql_query = sqlx::query(&query.sql);
    for value in &query.binds {
        sql_query = bind_value(sql_query, value);
    }
    let rows = sql_query.fetch_all(executor).await?;

    let Some(first) = rows.first() else {
        debug!("Query returned no rows");
        return Ok(Table::empty());
    };

    let columns: Vec<String> = match columns {
        Some(names) => names.iter().map(|n| n.to_string()).collect(),
        None => first.columns().iter().map(|c| c.name().to_string()).collect(),
    };

    let mut table = Table::new(columns);
    for row in &rows {
        let width = row.len();
        if let Some(missing) = table.columns.get(width) {
            return Err(Error::InvalidInput(format!(
                "Column '{}' has no value in a result row of width {}",
                missing, width
            )));
        }
        let values = (0..table.columns.len())
            .map(|i| decode_column(row, i))
            .collect();
        table.rows.push(values);
    }

    debug!(rows = table.len(), columns = table.columns.len(), "Converted query to table");
    Ok(table)
}
