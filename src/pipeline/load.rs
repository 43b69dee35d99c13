// src/pipeline/load.rs

//! Loading canonical tables into a store.

use crate::error::Result;
use crate::models::Dataset;
use crate::pipeline::tables::MenuTables;
use crate::storage::{BatchLoader, LoadMode, LoadSummary};
use crate::utils::log;

/// Conflict target for restaurant upserts.
pub const RESTAURANT_CONFLICT_KEY: &str = "old_restaurant_id";

/// How `dataset` is written: restaurants are upserted, everything else inserted.
pub fn load_mode(dataset: Dataset) -> LoadMode {
    match dataset {
        Dataset::Restaurants => LoadMode::upsert(RESTAURANT_CONFLICT_KEY),
        _ => LoadMode::Insert,
    }
}

/// Load each dataset in order. The first failing table stops the run.
pub fn load_tables(
    tables: &MenuTables,
    loader: &BatchLoader<'_>,
    datasets: &[Dataset],
) -> Result<Vec<LoadSummary>> {
    let mut summaries = Vec::with_capacity(datasets.len());
    for &dataset in datasets {
        let summary = loader.load(dataset.table_name(), tables.get(dataset), &load_mode(dataset))?;
        log::sub_item(&format!(
            "{}: {} rows in {} batches",
            summary.table, summary.rows, summary.batches
        ));
        summaries.push(summary);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{RecordKind, Row, VendorSpec};
    use crate::pipeline::snapshot::{MenuSnapshot, VendorFeed};
    use crate::storage::RecordStore;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryStore {
        writes: RefCell<Vec<(String, Vec<Row>, Option<String>)>>,
        reject: Option<&'static str>,
    }

    impl MemoryStore {
        fn write(&self, table: &str, rows: &[Row], key: Option<&str>) -> Result<()> {
            if self.reject == Some(table) {
                return Err(AppError::load(table, "409 Conflict"));
            }
            self.writes
                .borrow_mut()
                .push((table.to_string(), rows.to_vec(), key.map(str::to_string)));
            Ok(())
        }
    }

    impl RecordStore for MemoryStore {
        fn insert(&self, table: &str, rows: &[Row]) -> Result<()> {
            self.write(table, rows, None)
        }

        fn upsert(&self, table: &str, rows: &[Row], on_conflict: &str) -> Result<()> {
            self.write(table, rows, Some(on_conflict))
        }
    }

    fn tables() -> MenuTables {
        let snapshot = MenuSnapshot::from_feeds(vec![VendorFeed::new(
            VendorSpec::new("absurd", "1"),
            Ok(json!({"menu": {"periods": [{"id": "p1", "name": "Dinner", "categories": [
                {"id": "c1", "name": "Mains", "items": [{"id": "f1", "name": "Pasta"}]}
            ]}]}})),
        )])
        .with_locations(Ok(json!({"locations": [{"id": "r1", "name": "Absurd"}]})));
        MenuTables::new(snapshot)
    }

    #[test]
    fn restaurants_upsert_on_destination_key() {
        assert_eq!(
            load_mode(Dataset::Restaurants),
            LoadMode::upsert("old_restaurant_id")
        );
        assert_eq!(load_mode(Dataset::Menu(RecordKind::Foods)), LoadMode::Insert);
    }

    #[test]
    fn loads_datasets_in_order() {
        let store = MemoryStore::default();
        let loader = BatchLoader::new(&store, 500);
        let summaries = load_tables(&tables(), &loader, &Dataset::ALL).unwrap();

        let names: Vec<&str> = summaries.iter().map(|s| s.table.as_str()).collect();
        assert_eq!(
            names,
            ["restaurants", "locations", "periods", "categories", "food", "nutrients"]
        );

        let writes = store.writes.borrow();
        let restaurants = &writes[0];
        assert_eq!(restaurants.0, "restaurants");
        assert_eq!(restaurants.2.as_deref(), Some("old_restaurant_id"));
        assert_eq!(restaurants.1[0]["old_restaurant_id"], json!("r1"));

        let food = writes.iter().find(|w| w.0 == "food").unwrap();
        assert_eq!(food.1[0]["old_food_id"], json!("f1"));
        assert!(!food.1[0].contains_key("restaurant"));
    }

    #[test]
    fn failing_table_stops_later_tables() {
        let store = MemoryStore {
            reject: Some("periods"),
            ..Default::default()
        };
        let loader = BatchLoader::new(&store, 500);
        let datasets = [
            Dataset::Menu(RecordKind::Periods),
            Dataset::Menu(RecordKind::Foods),
        ];

        let err = load_tables(&tables(), &loader, &datasets).unwrap_err();
        assert!(err.to_string().contains("periods"));
        assert!(store.writes.borrow().is_empty());
    }
}
