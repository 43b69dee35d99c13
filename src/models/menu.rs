// src/models/menu.rs

//! Raw vendor menu documents as returned by the aggregator.
//!
//! Each level models only its own identifier and name. Child collections
//! stay as raw JSON ([`Nested`]) until a walk actually descends into them,
//! so a malformed leaf only affects the record kinds that read it.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::VendorId;

/// Nesting layout of a vendor's menu document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// `menu.periods` is a list of periods.
    #[default]
    #[serde(alias = "a")]
    PeriodScoped,
    /// `menu.periods` is a single period object.
    #[serde(alias = "b")]
    SinglePeriod,
    /// Categories sit directly under `menu.categories`.
    #[serde(alias = "c")]
    Flat,
}

/// A child collection kept as raw JSON until it is walked.
///
/// Absent and `null` both read as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Nested(Value);

impl Nested {
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    /// A list with at least one entry.
    pub fn has_entries(&self) -> bool {
        self.0.as_array().is_some_and(|list| !list.is_empty())
    }

    /// Parse the collection as a list of `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> serde_json::Result<Vec<T>> {
        Option::<Vec<T>>::deserialize(&self.0).map(Option::unwrap_or_default)
    }
}

impl From<Value> for Nested {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Top-level vendor response.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuDocument {
    pub menu: Menu,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub periods: Nested,

    #[serde(default)]
    pub categories: Nested,
}

impl Menu {
    /// Shape the document itself suggests.
    pub fn detected_shape(&self) -> Shape {
        if !self.categories.is_null() {
            Shape::Flat
        } else if self.periods.is_object() {
            Shape::SinglePeriod
        } else {
            Shape::PeriodScoped
        }
    }

    /// Periods in document order, whether sent as a list or one object.
    pub fn periods(&self) -> serde_json::Result<Vec<RawPeriod>> {
        Option::<PeriodSet>::deserialize(&self.periods.0)
            .map(|set| set.map(PeriodSet::into_vec).unwrap_or_default())
    }

    /// Top-level categories of a flat menu.
    pub fn categories(&self) -> serde_json::Result<Vec<RawCategory>> {
        self.categories.parse()
    }
}

/// The `periods` field, which vendors send as either a list or one object.
#[derive(Debug, Clone)]
pub enum PeriodSet {
    Single(Box<RawPeriod>),
    Many(Vec<RawPeriod>),
}

impl PeriodSet {
    pub fn into_vec(self) -> Vec<RawPeriod> {
        match self {
            PeriodSet::Single(period) => vec![*period],
            PeriodSet::Many(periods) => periods,
        }
    }
}

impl<'de> Deserialize<'de> for PeriodSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Decide on the JSON type first so errors point at the missing field
        // instead of an opaque "no variant matched".
        let value = Value::deserialize(deserializer)?;
        if value.is_array() {
            Vec::<RawPeriod>::deserialize(value)
                .map(PeriodSet::Many)
                .map_err(de::Error::custom)
        } else {
            RawPeriod::deserialize(value)
                .map(|period| PeriodSet::Single(Box::new(period)))
                .map_err(de::Error::custom)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPeriod {
    pub id: VendorId,
    pub name: String,
    #[serde(default)]
    pub categories: Nested,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    pub id: VendorId,
    pub name: String,
    #[serde(default)]
    pub items: Nested,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub id: VendorId,
    pub name: String,
    #[serde(default)]
    pub nutrients: Nested,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNutrient {
    pub name: String,
    pub value: Value,
}
