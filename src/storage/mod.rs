// src/storage/mod.rs

//! Destination store abstractions and the batch loader.
//!
//! A [`RecordStore`] accepts batches of exported rows for a named table.
//! [`BatchLoader`] splits a fused table into fixed-size batches and issues
//! one store call per batch.
//!
//! ## Backends
//!
//! - [`RestStore`]: PostgREST-style HTTP endpoint (`/rest/v1/{table}`)
//! - [`LocalStore`]: one JSON file per table, for dry runs

pub mod local;
pub mod rest;

use crate::error::Result;
use crate::models::{Row, Table};

// Re-export for convenience
pub use local::LocalStore;
pub use rest::RestStore;

/// Default rows per store call.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Trait for destination store backends.
pub trait RecordStore {
    /// Insert rows into `table`.
    fn insert(&self, table: &str, rows: &[Row]) -> Result<()>;

    /// Insert or update rows in `table`, matching existing rows on `on_conflict`.
    fn upsert(&self, table: &str, rows: &[Row], on_conflict: &str) -> Result<()>;
}

/// How rows are written to a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMode {
    Insert,
    Upsert { conflict_key: String },
}

impl LoadMode {
    pub fn upsert(conflict_key: impl Into<String>) -> Self {
        Self::Upsert {
            conflict_key: conflict_key.into(),
        }
    }
}

/// Result of loading one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub table: String,
    pub rows: usize,
    pub batches: usize,
}

/// Chunked writer over a [`RecordStore`].
pub struct BatchLoader<'a> {
    store: &'a dyn RecordStore,
    batch_size: usize,
}

impl<'a> BatchLoader<'a> {
    pub fn new(store: &'a dyn RecordStore, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Write `table` to the store under `table_name`.
    ///
    /// Rows go out in consecutive batches of at most `batch_size`. The first
    /// rejected batch stops the load and its error is returned; earlier
    /// batches stay applied.
    pub fn load(&self, table_name: &str, table: &Table, mode: &LoadMode) -> Result<LoadSummary> {
        let rows = table.to_records();
        let mut batches = 0;

        for (idx, chunk) in rows.chunks(self.batch_size).enumerate() {
            if chunk.is_empty() {
                continue;
            }
            log::debug!("{table_name}: batch {} ({} rows)", idx + 1, chunk.len());
            match mode {
                LoadMode::Insert => self.store.insert(table_name, chunk)?,
                LoadMode::Upsert { conflict_key } => {
                    self.store.upsert(table_name, chunk, conflict_key)?
                }
            }
            batches += 1;
        }

        if batches == 0 {
            log::info!("{table_name}: nothing to load");
        }

        Ok(LoadSummary {
            table: table_name.to_string(),
            rows: rows.len(),
            batches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingStore {
        calls: RefCell<Vec<(String, usize, Option<String>)>>,
        fail_on_call: Option<usize>,
    }

    impl RecordingStore {
        fn record(&self, table: &str, rows: &[Row], key: Option<&str>) -> Result<()> {
            let mut calls = self.calls.borrow_mut();
            if self.fail_on_call == Some(calls.len()) {
                return Err(AppError::load(table, "rejected"));
            }
            calls.push((table.to_string(), rows.len(), key.map(str::to_string)));
            Ok(())
        }
    }

    impl RecordStore for RecordingStore {
        fn insert(&self, table: &str, rows: &[Row]) -> Result<()> {
            self.record(table, rows, None)
        }

        fn upsert(&self, table: &str, rows: &[Row], on_conflict: &str) -> Result<()> {
            self.record(table, rows, Some(on_conflict))
        }
    }

    fn table_of(n: usize) -> Table {
        Table::from_rows((0..n).map(|i| {
            json!({"old_food_id": i.to_string(), "food_name": "x"})
                .as_object()
                .cloned()
                .unwrap()
        }))
    }

    #[test]
    fn chunks_into_batches() {
        let store = RecordingStore::default();
        let loader = BatchLoader::new(&store, 500);
        let summary = loader.load("food", &table_of(1200), &LoadMode::Insert).unwrap();

        let sizes: Vec<usize> = store.calls.borrow().iter().map(|c| c.1).collect();
        assert_eq!(sizes, [500, 500, 200]);
        assert_eq!(summary.rows, 1200);
        assert_eq!(summary.batches, 3);
    }

    #[test]
    fn empty_table_makes_no_calls() {
        let store = RecordingStore::default();
        let summary = BatchLoader::new(&store, 500)
            .load("periods", &Table::new(), &LoadMode::Insert)
            .unwrap();
        assert!(store.calls.borrow().is_empty());
        assert_eq!(summary.batches, 0);
    }

    #[test]
    fn upsert_passes_conflict_key() {
        let store = RecordingStore::default();
        BatchLoader::new(&store, 10)
            .load("restaurants", &table_of(3), &LoadMode::upsert("old_restaurant_id"))
            .unwrap();
        let calls = store.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2.as_deref(), Some("old_restaurant_id"));
    }

    #[test]
    fn failing_batch_stops_the_load() {
        let store = RecordingStore {
            fail_on_call: Some(1),
            ..Default::default()
        };
        let table = table_of(25);
        let before = table.clone();

        let err = BatchLoader::new(&store, 10)
            .load("food", &table, &LoadMode::Insert)
            .unwrap_err();

        assert!(matches!(err, AppError::Load { .. }));
        assert_eq!(store.calls.borrow().len(), 1);
        assert_eq!(table, before);
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let store = RecordingStore::default();
        let loader = BatchLoader::new(&store, 0);
        assert_eq!(loader.batch_size(), 1);
        loader.load("food", &table_of(2), &LoadMode::Insert).unwrap();
        assert_eq!(store.calls.borrow().len(), 2);
    }
}
