//! Column-ordered tables of JSON scalars.
//!
//! Every record kind is carried between pipeline stages as a [`Table`]:
//! an ordered column list plus rows of `serde_json::Value` cells, with
//! `Null` standing in for a column a row never had.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// One exported row: column name to scalar value.
pub type Row = Map<String, Value>;

/// An ordered, schema-flexible table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from serializable records.
    ///
    /// Each record must serialize to a JSON object. Fields skipped during
    /// serialization simply do not contribute a column for that row.
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self> {
        let mut table = Self::new();
        for record in records {
            match serde_json::to_value(record)? {
                Value::Object(row) => table.push_row(row),
                other => {
                    return Err(AppError::validation(format!(
                        "record did not serialize to an object: {other}"
                    )));
                }
            }
        }
        Ok(table)
    }

    /// Build a table from exported rows.
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of `name`, appending a null-filled column if it is new.
    fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        self.columns.len() - 1
    }

    /// Cell at `row` for `column`, if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[idx])
    }

    /// All cells of one column in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|cells| &cells[idx]).collect())
    }

    /// Append a row, widening the schema with any new columns.
    pub fn push_row(&mut self, row: Row) {
        let mut cells = vec![Value::Null; self.columns.len()];
        for (name, value) in row {
            let idx = self.ensure_column(&name);
            if idx >= cells.len() {
                cells.resize(idx + 1, Value::Null);
            }
            cells[idx] = value;
        }
        self.rows.push(cells);
    }

    /// Set `name` to `value` on every row, adding the column if needed.
    pub fn insert_column(&mut self, name: &str, value: Value) {
        let idx = self.ensure_column(name);
        for row in &mut self.rows {
            row[idx] = value.clone();
        }
    }

    /// Remove a column. Returns `false` if it was not present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }

    /// Rename `from` to `to`.
    ///
    /// No-op (returns `false`) when `from` is absent or `to` already exists.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if self.has_column(to) {
            return false;
        }
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Replace every cell of `name` with `f(cell)`.
    pub fn map_column(&mut self, name: &str, mut f: impl FnMut(Value) -> Value) {
        let Some(idx) = self.column_index(name) else {
            return;
        };
        for row in &mut self.rows {
            let cell = std::mem::take(&mut row[idx]);
            row[idx] = f(cell);
        }
    }

    /// Concatenate tables in order.
    ///
    /// The result's columns are the union of the inputs' columns in
    /// first-seen order; cells a source table lacked are `Null`.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        let mut out = Table::new();
        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .map(|name| out.ensure_column(name))
                .collect();
            for cells in table.rows {
                let mut row = vec![Value::Null; out.columns.len()];
                for (value, &idx) in cells.into_iter().zip(&mapping) {
                    row[idx] = value;
                }
                out.rows.push(row);
            }
        }
        out
    }

    /// Export rows as JSON objects, one key per column.
    pub fn to_records(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|cells| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(cells.iter().cloned())
                    .collect()
            })
            .collect()
    }
}
