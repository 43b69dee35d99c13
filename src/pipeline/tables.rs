// src/pipeline/tables.rs

//! Canonical tables for one run, computed on first use.
//!
//! Each table is fused from the snapshot, stripped of provenance and
//! remapped to destination column names exactly once. Later calls return
//! the memoized table.

use std::cell::OnceCell;

use crate::models::{Dataset, RecordKind, Table};
use crate::pipeline::fuse::{Fusion, canonicalize_ids, fuse_kind};
use crate::pipeline::invoke::{Invocation, Outcome, PROVENANCE_COLUMN, safe_invoke};
use crate::pipeline::remap::remap_ids;
use crate::pipeline::snapshot::MenuSnapshot;
use crate::services::locations::{self, LOCATIONS_SOURCE};
use crate::utils::log;

/// A canonical table and how each source fared building it.
#[derive(Debug, Clone, Default)]
pub struct Canonical {
    pub table: Table,
    pub outcomes: Vec<(String, Outcome)>,
}

impl Canonical {
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_failure()).count()
    }
}

impl From<Fusion> for Canonical {
    fn from(fusion: Fusion) -> Self {
        let outcomes = fusion.outcomes.clone();
        let mut table = fusion.strip_provenance();
        remap_ids(&mut table);
        Self { table, outcomes }
    }
}

impl From<Invocation> for Canonical {
    /// Single-source table: provenance dropped, ids canonicalized and remapped.
    fn from(invocation: Invocation) -> Self {
        let mut table = invocation.table;
        table.drop_column(PROVENANCE_COLUMN);
        canonicalize_ids(&mut table);
        remap_ids(&mut table);
        Self {
            table,
            outcomes: vec![(invocation.vendor, invocation.outcome)],
        }
    }
}

/// Memoized canonical tables over one snapshot.
pub struct MenuTables {
    snapshot: MenuSnapshot,
    manual_buildings: Table,
    show_progress: bool,
    periods: OnceCell<Canonical>,
    categories: OnceCell<Canonical>,
    foods: OnceCell<Canonical>,
    nutrients: OnceCell<Canonical>,
    restaurants: OnceCell<Canonical>,
    locations: OnceCell<Canonical>,
}

impl MenuTables {
    pub fn new(snapshot: MenuSnapshot) -> Self {
        Self {
            snapshot,
            manual_buildings: Table::new(),
            show_progress: false,
            periods: OnceCell::new(),
            categories: OnceCell::new(),
            foods: OnceCell::new(),
            nutrients: OnceCell::new(),
            restaurants: OnceCell::new(),
            locations: OnceCell::new(),
        }
    }

    /// Hand-maintained building rows merged into `locations`.
    pub fn with_manual_buildings(mut self, buildings: Table) -> Self {
        self.manual_buildings = buildings;
        self
    }

    /// Log per-source outcomes as each table is built.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn snapshot(&self) -> &MenuSnapshot {
        &self.snapshot
    }

    pub fn get_all_periods(&self) -> &Table {
        &self.canonical(Dataset::Menu(RecordKind::Periods)).table
    }

    pub fn get_all_categories(&self) -> &Table {
        &self.canonical(Dataset::Menu(RecordKind::Categories)).table
    }

    pub fn get_all_foods(&self) -> &Table {
        &self.canonical(Dataset::Menu(RecordKind::Foods)).table
    }

    pub fn get_all_nutrients(&self) -> &Table {
        &self.canonical(Dataset::Menu(RecordKind::Nutrients)).table
    }

    pub fn get_restaurants(&self) -> &Table {
        &self.canonical(Dataset::Restaurants).table
    }

    pub fn get_locations(&self) -> &Table {
        &self.canonical(Dataset::Locations).table
    }

    /// The canonical table for `dataset`.
    pub fn get(&self, dataset: Dataset) -> &Table {
        &self.canonical(dataset).table
    }

    /// The canonical table for `dataset` with its per-source outcomes.
    pub fn canonical(&self, dataset: Dataset) -> &Canonical {
        let cell = match dataset {
            Dataset::Menu(RecordKind::Periods) => &self.periods,
            Dataset::Menu(RecordKind::Categories) => &self.categories,
            Dataset::Menu(RecordKind::Foods) => &self.foods,
            Dataset::Menu(RecordKind::Nutrients) => &self.nutrients,
            Dataset::Restaurants => &self.restaurants,
            Dataset::Locations => &self.locations,
        };
        cell.get_or_init(|| {
            let built = match dataset {
                Dataset::Menu(kind) => Canonical::from(fuse_kind(&self.snapshot, kind)),
                Dataset::Restaurants => self.build_restaurants(),
                Dataset::Locations => self.build_locations(),
            };
            self.report(dataset, &built);
            built
        })
    }

    fn build_restaurants(&self) -> Canonical {
        let invocation = safe_invoke(LOCATIONS_SOURCE, "extract_restaurants", || {
            self.snapshot
                .locations()
                .transpose()?
                .map(locations::extract_restaurants)
                .transpose()
        });
        Canonical::from(invocation)
    }

    fn build_locations(&self) -> Canonical {
        let invocation = safe_invoke(LOCATIONS_SOURCE, "extract_buildings", || {
            self.snapshot
                .locations()
                .transpose()?
                .map(locations::extract_buildings)
                .transpose()
        });
        let mut feed = Canonical::from(invocation);
        feed.table = locations::merge_buildings(feed.table, self.manual_buildings.clone());
        canonicalize_ids(&mut feed.table);
        feed
    }

    fn report(&self, dataset: Dataset, built: &Canonical) {
        log::info(&format!(
            "{dataset}: {} rows ({} failed sources)",
            built.table.len(),
            built.failure_count()
        ));
        if !self.show_progress {
            return;
        }
        for (source, outcome) in &built.outcomes {
            let status = match outcome {
                Outcome::Rows(n) => format!("{n} rows"),
                Outcome::Empty => "empty".to_string(),
                Outcome::Failed(message) => format!("failed: {message}"),
            };
            log::sub_item(&format!("{source}: {status}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::VendorSpec;
    use crate::pipeline::snapshot::VendorFeed;
    use serde_json::json;

    fn snapshot() -> MenuSnapshot {
        MenuSnapshot::from_feeds(vec![
            VendorFeed::new(
                VendorSpec::new("sushido", "1"),
                Ok(json!({"menu": {"periods": [{
                    "id": 10, "name": "Lunch",
                    "categories": [{"id": 20, "name": "Rolls", "items": [
                        {"id": 30, "name": "California", "nutrients": [{"name": "Calories", "value": 250}]}
                    ]}]
                }]}})),
            ),
            VendorFeed::new(VendorSpec::new("dunkin", "2"), Err(AppError::config("timeout"))),
        ])
        .with_locations(Ok(json!({
            "locations": [{"id": 5, "name": "Sushido", "building": {"id": "b1", "name": "Union"}}]
        })))
    }

    #[test]
    fn menu_tables_are_stripped_and_remapped() {
        let tables = MenuTables::new(snapshot());
        let foods = tables.get_all_foods();

        assert_eq!(foods.len(), 1);
        assert!(!foods.has_column(PROVENANCE_COLUMN));
        assert!(!foods.has_column("food_id"));
        assert_eq!(foods.get(0, "old_food_id"), Some(&json!("30")));
        assert_eq!(foods.get(0, "old_period_id"), Some(&json!("10")));
        assert_eq!(
            tables.canonical(Dataset::Menu(RecordKind::Foods)).failure_count(),
            1
        );
    }

    #[test]
    fn tables_are_memoized() {
        let tables = MenuTables::new(snapshot());
        let first: *const Table = tables.get_all_periods();
        let second: *const Table = tables.get_all_periods();
        assert_eq!(first, second);
    }

    #[test]
    fn restaurants_use_destination_key() {
        let tables = MenuTables::new(snapshot());
        let restaurants = tables.get_restaurants();
        assert_eq!(restaurants.get(0, "old_restaurant_id"), Some(&json!("5")));
        assert_eq!(restaurants.get(0, "building_id"), Some(&json!("b1")));
        assert!(!restaurants.has_column(PROVENANCE_COLUMN));
    }

    #[test]
    fn locations_merge_manual_buildings() {
        let manual = Table::from_rows([json!({"building_id": 7, "building_name": "Annex"})
            .as_object()
            .cloned()
            .unwrap()]);
        let tables = MenuTables::new(snapshot()).with_manual_buildings(manual);
        let locations = tables.get_locations();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations.get(1, "building_id"), Some(&json!("7")));
        assert!(!locations.has_column(PROVENANCE_COLUMN));
    }

    #[test]
    fn missing_location_listing_yields_empty_restaurants() {
        let snapshot = MenuSnapshot::from_feeds(Vec::new());
        let tables = MenuTables::new(snapshot);
        assert!(tables.get_restaurants().is_empty());
        assert!(tables.get_locations().is_empty());
    }
}
