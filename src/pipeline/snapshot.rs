// src/pipeline/snapshot.rs

//! Per-run set of fetched raw documents.
//!
//! Each vendor is fetched once per run, in configured order. A failed fetch
//! is kept alongside the successful ones so it surfaces, isolated, inside
//! every extraction that needs it.

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{RecordKind, Table, VendorSpec};
use crate::services::locations::LOCATIONS_SOURCE;
use crate::services::{MenuExtractor, MenuSource};

/// One vendor's fetched document, or the reason it could not be fetched.
#[derive(Debug)]
pub struct VendorFeed {
    pub vendor: VendorSpec,
    pub document: Result<Value>,
}

impl VendorFeed {
    pub fn new(vendor: VendorSpec, document: Result<Value>) -> Self {
        Self { vendor, document }
    }

    /// Extract the records of `kind` from this feed.
    pub fn extract(&self, kind: RecordKind) -> Result<Table> {
        let document = self
            .document
            .as_ref()
            .map_err(|e| AppError::extract(&self.vendor.label, format!("fetch failed: {e}")))?;
        MenuExtractor::new(&self.vendor).extract(kind, document)
    }
}

/// Raw documents for one run.
#[derive(Debug, Default)]
pub struct MenuSnapshot {
    feeds: Vec<VendorFeed>,
    locations: Option<Result<Value>>,
}

impl MenuSnapshot {
    pub fn from_feeds(feeds: Vec<VendorFeed>) -> Self {
        Self {
            feeds,
            locations: None,
        }
    }

    pub fn with_locations(mut self, locations: Result<Value>) -> Self {
        self.locations = Some(locations);
        self
    }

    /// Fetch every vendor, then the location listing, sequentially.
    pub fn fetch(source: &dyn MenuSource, vendors: &[VendorSpec]) -> Self {
        let mut feeds = Vec::with_capacity(vendors.len());
        for vendor in vendors {
            let document = source.fetch_menu(vendor);
            match &document {
                Ok(_) => log::debug!("{}: menu fetched", vendor.label),
                Err(e) => log::warn!("{}: menu fetch failed -> {e}", vendor.label),
            }
            feeds.push(VendorFeed::new(vendor.clone(), document));
        }

        let locations = source.fetch_locations();
        if let Err(e) = &locations {
            log::warn!("{LOCATIONS_SOURCE}: fetch failed -> {e}");
        }

        Self::from_feeds(feeds).with_locations(locations)
    }

    pub fn feeds(&self) -> &[VendorFeed] {
        &self.feeds
    }

    /// Number of vendors whose document was fetched.
    pub fn fetched_count(&self) -> usize {
        self.feeds.iter().filter(|f| f.document.is_ok()).count()
    }

    /// The location listing, if one was requested.
    pub fn locations(&self) -> Option<Result<&Value>> {
        self.locations.as_ref().map(|doc| {
            doc.as_ref()
                .map_err(|e| AppError::extract(LOCATIONS_SOURCE, format!("fetch failed: {e}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticSource;

    impl MenuSource for StaticSource {
        fn fetch_menu(&self, vendor: &VendorSpec) -> Result<Value> {
            if vendor.label == "down" {
                return Err(AppError::config("unreachable"));
            }
            Ok(json!({"menu": {"periods": [{"id": 1, "name": vendor.label}]}}))
        }

        fn fetch_locations(&self) -> Result<Value> {
            Ok(json!({"locations": []}))
        }
    }

    #[test]
    fn fetch_keeps_vendor_order_and_failures() {
        let vendors = vec![
            VendorSpec::new("up", "1"),
            VendorSpec::new("down", "2"),
            VendorSpec::new("also_up", "3"),
        ];
        let snapshot = MenuSnapshot::fetch(&StaticSource, &vendors);

        let labels: Vec<&str> = snapshot
            .feeds()
            .iter()
            .map(|f| f.vendor.label.as_str())
            .collect();
        assert_eq!(labels, ["up", "down", "also_up"]);
        assert_eq!(snapshot.fetched_count(), 2);
        assert!(snapshot.locations().unwrap().is_ok());
    }

    #[test]
    fn failed_fetch_fails_extraction_with_vendor() {
        let feed = VendorFeed::new(
            VendorSpec::new("down", "2"),
            Err(AppError::config("unreachable")),
        );
        let err = feed.extract(RecordKind::Periods).unwrap_err();
        assert!(err.to_string().contains("down"));
        assert!(err.to_string().contains("unreachable"));
    }
}
