// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading configuration
//! and the hand-maintained building list from files.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Config, Table};
use crate::utils::log;

/// Load configuration from a TOML file.
///
/// Falls back to defaults if loading fails.
pub fn load_config(path: &Path) -> Config {
    Config::load_or_default(path)
}

/// Load the manual building list.
///
/// The file holds a JSON array of objects; each object becomes one row.
/// A missing file yields an empty table.
pub fn load_buildings(path: &Path) -> Result<Table> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn(&format!("Building list not found at {path:?}; using none"));
            return Ok(Table::new());
        }
        Err(e) => return Err(AppError::Io(e)),
    };

    let rows: Vec<Value> = serde_json::from_str(&content)?;
    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(idx, value)| match value {
            Value::Object(row) => Ok(row),
            other => Err(AppError::validation(format!(
                "building list entry {idx} is not an object: {other}"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Table::from_rows(rows))
}

/// Resolve a configured path relative to the config file's directory.
pub fn resolve_path(config_path: &Path, relative: &str) -> PathBuf {
    let relative = Path::new(relative);
    if relative.is_absolute() {
        return relative.to_path_buf();
    }
    config_path
        .parent()
        .map(|dir| dir.join(relative))
        .unwrap_or_else(|| relative.to_path_buf())
}

/// Load the building list a config points to, if any.
pub fn load_configured_buildings(config: &Config, config_path: &Path) -> Result<Table> {
    match &config.paths.buildings {
        Some(file) => load_buildings(&resolve_path(config_path, file)),
        None => Ok(Table::new()),
    }
}

/// Load config and the building list it points to.
pub fn load_all(config_path: &Path) -> Result<(Config, Table)> {
    let config = load_config(config_path);
    let buildings = load_configured_buildings(&config, config_path)?;
    Ok((config, buildings))
}
