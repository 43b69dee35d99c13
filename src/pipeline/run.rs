// src/pipeline/run.rs

use std::path::PathBuf;

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, Dataset, Table};
use crate::services::MenuSource;
use crate::storage::{BatchLoader, LoadSummary, LocalStore, RecordStore};
use crate::utils::log;

use super::load::load_tables;
use super::snapshot::MenuSnapshot;
use super::tables::MenuTables;

/// Fetch every configured vendor and fuse all datasets.
pub fn run_fusion(
    config: &Config,
    source: &dyn MenuSource,
    buildings: Table,
) -> Result<MenuTables> {
    config.validate()?;
    let start_time = Utc::now();
    log::header("Menu fusion");

    log::step(1, 2, "Fetch - Retrieving vendor menus");
    let snapshot = MenuSnapshot::fetch(source, &config.vendors);
    log::info(&format!(
        "Fetched {}/{} vendor menus",
        snapshot.fetched_count(),
        config.vendors.len()
    ));

    log::step(2, 2, "Fuse - Building canonical tables");
    let tables = MenuTables::new(snapshot)
        .with_manual_buildings(buildings)
        .with_progress(config.logging.show_progress);

    let mut items = Vec::with_capacity(Dataset::ALL.len() + 1);
    for dataset in Dataset::ALL {
        let canonical = tables.canonical(dataset);
        items.push((
            dataset.table_name(),
            format_rows(canonical.table.len(), canonical.failure_count()),
        ));
    }
    let elapsed = Utc::now() - start_time;
    items.push(("elapsed", format!("{}ms", elapsed.num_milliseconds())));
    log::summary("Fusion", &items);

    Ok(tables)
}

fn format_rows(rows: usize, failures: usize) -> String {
    match failures {
        0 => format!("{rows} rows"),
        n => format!("{rows} rows, {n} failed sources"),
    }
}

/// Write the selected datasets as JSON files under `out`.
pub fn write_tables(
    tables: &MenuTables,
    out: &LocalStore,
    datasets: &[Dataset],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(datasets.len());
    for &dataset in datasets {
        let path = out.write_table(dataset.table_name(), tables.get(dataset))?;
        log::sub_item(&format!("{dataset} -> {}", path.display()));
        written.push(path);
    }
    log::success(&format!(
        "Wrote {} tables to {}",
        written.len(),
        out.root().display()
    ));
    Ok(written)
}

/// Load the selected datasets into `store` in batches.
pub fn run_load(
    config: &Config,
    tables: &MenuTables,
    store: &dyn RecordStore,
    datasets: &[Dataset],
) -> Result<Vec<LoadSummary>> {
    log::header("Load");
    let loader = BatchLoader::new(store, config.store.batch_size);
    let summaries = load_tables(tables, &loader, datasets)?;
    let rows: usize = summaries.iter().map(|s| s.rows).sum();
    log::success(&format!("Loaded {rows} rows into {} tables", summaries.len()));
    Ok(summaries)
}
