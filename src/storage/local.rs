// src/storage/local.rs

//! Local filesystem store.
//!
//! Keeps one JSON array per table, for dry runs and inspection.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── restaurants.json
//! ├── locations.json
//! ├── periods.json
//! ├── categories.json
//! ├── food.json
//! └── nutrients.json
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{Row, Table};
use crate::storage::RecordStore;

/// Local filesystem store backend.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn path(&self, table: &str) -> PathBuf {
        self.root_dir.join(format!("{table}.json"))
    }

    /// Write bytes atomically (write to temp, then rename).
    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.flush()?;
        drop(file);

        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn write_rows(&self, table: &str, rows: &[Row]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(rows)?;
        self.write_bytes(&self.path(table), &bytes)
    }

    /// Rows currently stored for `table`; empty if the file does not exist.
    pub fn read_rows(&self, table: &str) -> Result<Vec<Row>> {
        match fs::read(self.path(table)) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Replace the stored contents of `name` with `table`.
    pub fn write_table(&self, name: &str, table: &Table) -> Result<PathBuf> {
        self.write_rows(name, &table.to_records())?;
        Ok(self.path(name))
    }
}

impl RecordStore for LocalStore {
    fn insert(&self, table: &str, rows: &[Row]) -> Result<()> {
        let mut stored = self.read_rows(table)?;
        stored.extend_from_slice(rows);
        self.write_rows(table, &stored)
    }

    fn upsert(&self, table: &str, rows: &[Row], on_conflict: &str) -> Result<()> {
        let mut stored = self.read_rows(table)?;
        for row in rows {
            let key = row.get(on_conflict).filter(|v| !v.is_null());
            let existing =
                key.and_then(|key| stored.iter().position(|r| r.get(on_conflict) == Some(key)));
            match existing {
                Some(idx) => stored[idx] = row.clone(),
                None => stored.push(row.clone()),
            }
        }
        self.write_rows(table, &stored)
    }
}
