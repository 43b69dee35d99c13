// src/services/source.rs

//! Raw document sources.
//!
//! The pipeline only needs "give me the raw JSON for vendor V" and "give me
//! the location listing". [`HttpMenuSource`] answers both from the
//! aggregator; tests substitute in-memory sources.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, VendorSpec};
use crate::utils::http::{create_client, endpoint, fetch_json};

/// Capability to fetch raw aggregator documents.
pub trait MenuSource {
    /// Fetch the raw menu document for one vendor.
    fn fetch_menu(&self, vendor: &VendorSpec) -> Result<Value>;

    /// Fetch the raw listing of all dining locations.
    fn fetch_locations(&self) -> Result<Value>;
}

/// Fetches documents from the aggregator over HTTP.
pub struct HttpMenuSource {
    client: Client,
    api: ApiConfig,
    date: String,
}

impl HttpMenuSource {
    /// Create a source for the given API settings. The menu date is fixed
    /// at construction so every vendor is asked for the same day.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(api)?,
            api: api.clone(),
            date: api.menu_date(),
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

impl MenuSource for HttpMenuSource {
    fn fetch_menu(&self, vendor: &VendorSpec) -> Result<Value> {
        if vendor.location_id.trim().is_empty() {
            return Err(AppError::config(format!(
                "vendor '{}' has no location_id",
                vendor.label
            )));
        }
        let url = endpoint(
            &self.api.base_url,
            &format!("location/{}/periods", vendor.location_id),
            &[("platform", self.api.platform.as_str()), ("date", self.date.as_str())],
        )?;
        log::debug!("GET {url} ({})", vendor.label);
        fetch_json(&self.client, url)
    }

    fn fetch_locations(&self) -> Result<Value> {
        let url = endpoint(
            &self.api.base_url,
            "locations/all_locations",
            &[
                ("platform", self.api.platform.as_str()),
                ("site_id", self.api.site_id.as_str()),
                ("for_menus", "true"),
                ("with_address", "true"),
                ("with_buildings", "true"),
            ],
        )?;
        log::debug!("GET {url}");
        fetch_json(&self.client, url)
    }
}
