// src/pipeline/invoke.rs

//! Failure-isolating wrapper around a single extraction call.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::Table;

/// Transient column naming the vendor that produced a row.
pub const PROVENANCE_COLUMN: &str = "restaurant";

/// Conversion of an extractor's output into a table.
pub trait IntoTable {
    fn into_table(self) -> Result<Table>;
}

impl IntoTable for Table {
    fn into_table(self) -> Result<Table> {
        Ok(self)
    }
}

impl<T: Serialize> IntoTable for Vec<T> {
    fn into_table(self) -> Result<Table> {
        Table::from_records(&self)
    }
}

impl<T: IntoTable> IntoTable for Option<T> {
    fn into_table(self) -> Result<Table> {
        match self {
            Some(inner) => inner.into_table(),
            None => Ok(Table::new()),
        }
    }
}

/// How one vendor fared for one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Produced this many rows
    Rows(usize),
    /// Succeeded but produced nothing
    Empty,
    /// Failed; the message is the rendered error
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Result of one safe invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub vendor: String,
    pub table: Table,
    pub outcome: Outcome,
}

/// Run `extract` for `vendor`, never letting its failure escape.
///
/// On success the output is tabulated and, if non-empty, tagged with the
/// provenance column. On failure a warning naming the vendor and operation
/// is logged and a zero-row table is returned.
pub fn safe_invoke<F, T>(vendor: &str, operation: &str, extract: F) -> Invocation
where
    F: FnOnce() -> Result<T>,
    T: IntoTable,
{
    match extract().and_then(IntoTable::into_table) {
        Ok(mut table) => {
            let outcome = if table.is_empty() {
                log::debug!("{vendor}: {operation} returned no rows");
                Outcome::Empty
            } else {
                table.insert_column(PROVENANCE_COLUMN, Value::String(vendor.to_string()));
                Outcome::Rows(table.len())
            };
            Invocation {
                vendor: vendor.to_string(),
                table,
                outcome,
            }
        }
        Err(e) => {
            log::warn!("{vendor}: {operation} failed -> {e}");
            Invocation {
                vendor: vendor.to_string(),
                table: Table::new(),
                outcome: Outcome::Failed(e.to_string()),
            }
        }
    }
}
