//! Vendor definitions.

use serde::{Deserialize, Serialize};

use crate::models::{RecordKind, Shape};

/// One dining venue behind the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSpec {
    /// Stable label used for provenance and diagnostics (e.g., "sushido")
    pub label: String,

    /// Aggregator location identifier used to build the menu URL
    #[serde(default)]
    pub location_id: String,

    /// Expected nesting layout of the menu document
    #[serde(default)]
    pub shape: Shape,

    /// Restaurant identifier stamped on records of multi-location vendors
    #[serde(default)]
    pub restaurant_id: Option<String>,

    /// Record kinds this vendor does not expose
    #[serde(default)]
    pub skip: Vec<RecordKind>,
}

impl VendorSpec {
    pub fn new(label: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            location_id: location_id.into(),
            shape: Shape::default(),
            restaurant_id: None,
            skip: Vec::new(),
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_restaurant_id(mut self, restaurant_id: impl Into<String>) -> Self {
        self.restaurant_id = Some(restaurant_id.into());
        self
    }

    pub fn skipping(mut self, kind: RecordKind) -> Self {
        self.skip.push(kind);
        self
    }

    /// Whether this vendor takes part in fusion for `kind`.
    pub fn exposes(&self, kind: RecordKind) -> bool {
        !self.skip.contains(&kind)
    }
}
