//! Canonical flat records produced by vendor extraction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// A vendor-local identifier.
///
/// Vendors mix numeric and string identifiers; the raw representation
/// is kept through extraction and canonicalized to a string after fusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VendorId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorId::Number(n) => write!(f, "{n}"),
            VendorId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for VendorId {
    fn from(value: &str) -> Self {
        VendorId::Text(value.to_string())
    }
}

impl From<u64> for VendorId {
    fn from(value: u64) -> Self {
        VendorId::Number(value.into())
    }
}

/// A named service window scoped to a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<VendorId>,
    pub period_id: VendorId,
    pub period_name: String,
}

/// A menu section, usually nested under a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<VendorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_id: Option<VendorId>,
    pub category_id: VendorId,
    pub category_name: String,
}

/// A menu item under a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Food {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<VendorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_id: Option<VendorId>,
    pub category_id: VendorId,
    pub food_id: VendorId,
    pub food_name: String,
}

/// One nutrient fact attached to a food item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nutrient {
    pub food_id: VendorId,
    pub nutrient_name: String,
    pub nutrient_value: Value,
}

/// A dining location from the aggregator's location listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub restaurant_id: VendorId,
    pub restaurant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<VendorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
}

/// The four menu record kinds fused across vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Periods,
    Categories,
    Foods,
    Nutrients,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Periods,
        RecordKind::Categories,
        RecordKind::Foods,
        RecordKind::Nutrients,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Periods => "periods",
            RecordKind::Categories => "categories",
            RecordKind::Foods => "foods",
            RecordKind::Nutrients => "nutrients",
        }
    }

    /// Name of the extraction step, used in diagnostics.
    pub fn operation(&self) -> &'static str {
        match self {
            RecordKind::Periods => "extract_periods",
            RecordKind::Categories => "extract_categories",
            RecordKind::Foods => "extract_foods",
            RecordKind::Nutrients => "extract_nutrients",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every table the pipeline can load into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Restaurants,
    Locations,
    Menu(RecordKind),
}

impl Dataset {
    /// Load order: parents before children.
    pub const ALL: [Dataset; 6] = [
        Dataset::Restaurants,
        Dataset::Locations,
        Dataset::Menu(RecordKind::Periods),
        Dataset::Menu(RecordKind::Categories),
        Dataset::Menu(RecordKind::Foods),
        Dataset::Menu(RecordKind::Nutrients),
    ];

    /// Destination table in the store.
    pub fn table_name(&self) -> &'static str {
        match self {
            Dataset::Restaurants => "restaurants",
            Dataset::Locations => "locations",
            Dataset::Menu(RecordKind::Periods) => "periods",
            Dataset::Menu(RecordKind::Categories) => "categories",
            Dataset::Menu(RecordKind::Foods) => "food",
            Dataset::Menu(RecordKind::Nutrients) => "nutrients",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for Dataset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "restaurants" => Ok(Dataset::Restaurants),
            "locations" => Ok(Dataset::Locations),
            "periods" => Ok(Dataset::Menu(RecordKind::Periods)),
            "categories" => Ok(Dataset::Menu(RecordKind::Categories)),
            "food" | "foods" => Ok(Dataset::Menu(RecordKind::Foods)),
            "nutrients" => Ok(Dataset::Menu(RecordKind::Nutrients)),
            other => Err(AppError::validation(format!("unknown table '{other}'"))),
        }
    }
}
