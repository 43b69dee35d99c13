// src/services/locations.rs

//! Restaurant and building extraction from the location listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Restaurant, Table, VendorId};

/// Label used for diagnostics about the location listing.
pub const LOCATIONS_SOURCE: &str = "all_locations";

#[derive(Debug, Deserialize)]
struct LocationsDocument {
    locations: Vec<RawLocation>,
    #[serde(default)]
    buildings: Vec<RawBuilding>,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    id: VendorId,
    name: String,
    #[serde(default)]
    building: Option<RawBuilding>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawBuilding {
    id: VendorId,
    name: String,
}

/// A building row as stored in `locations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    pub building_id: VendorId,
    pub building_name: String,
}

fn parse(document: &Value) -> Result<LocationsDocument> {
    LocationsDocument::deserialize(document).map_err(|e| AppError::extract(LOCATIONS_SOURCE, e))
}

/// One restaurant per listed location.
pub fn extract_restaurants(document: &Value) -> Result<Vec<Restaurant>> {
    let parsed = parse(document)?;
    Ok(parsed
        .locations
        .into_iter()
        .map(|location| {
            let (building_id, building_name) = match location.building {
                Some(b) => (Some(b.id), Some(b.name)),
                None => (None, None),
            };
            Restaurant {
                restaurant_id: location.id,
                restaurant_name: location.name,
                building_id,
                building_name,
            }
        })
        .collect())
}

/// Buildings listed by the feed, in first-seen order without repeats.
///
/// Buildings come from the top-level `buildings` list and from each
/// location's embedded `building`.
pub fn extract_buildings(document: &Value) -> Result<Vec<Building>> {
    let parsed = parse(document)?;
    let embedded = parsed.locations.into_iter().filter_map(|l| l.building);

    let mut buildings: Vec<Building> = Vec::new();
    for raw in parsed.buildings.into_iter().chain(embedded) {
        if buildings.iter().any(|b| b.building_id == raw.id) {
            continue;
        }
        buildings.push(Building {
            building_id: raw.id,
            building_name: raw.name,
        });
    }
    Ok(buildings)
}

/// Merge feed buildings with the hand-maintained building list.
///
/// The manual table is opaque: its rows are appended as-is after the feed
/// rows, and its columns join the union schema.
pub fn merge_buildings(feed: Table, manual: Table) -> Table {
    Table::concat([feed, manual])
}
