//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::VendorSpec;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upstream aggregator settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Destination store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Auxiliary input files
    #[serde(default)]
    pub paths: PathsConfig,

    /// Vendors in fusion order
    #[serde(default = "defaults::vendors")]
    pub vendors: Vec<VendorSpec>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        url::Url::parse(&self.api.base_url)?;
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.api.headers.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.headers.user_agent is empty"));
        }
        if self.store.batch_size == 0 {
            return Err(AppError::validation("store.batch_size must be > 0"));
        }
        if self.vendors.is_empty() {
            return Err(AppError::validation("No vendors defined"));
        }

        let mut seen = HashSet::new();
        for vendor in &self.vendors {
            if vendor.label.trim().is_empty() {
                return Err(AppError::validation("vendor with empty label"));
            }
            if !seen.insert(vendor.label.as_str()) {
                return Err(AppError::validation(format!(
                    "duplicate vendor label '{}'",
                    vendor.label
                )));
            }
            if vendor.location_id.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "vendor '{}' has no location_id",
                    vendor.label
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
            paths: PathsConfig::default(),
            vendors: defaults::vendors(),
        }
    }
}

/// Aggregator endpoint and request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the aggregator API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// `platform` query parameter
    #[serde(default = "defaults::platform")]
    pub platform: String,

    /// `site_id` query parameter for the location listing
    #[serde(default)]
    pub site_id: String,

    /// Menu date (`YYYY-MM-DD`); today when unset
    #[serde(default)]
    pub date: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub headers: HeaderConfig,
}

impl ApiConfig {
    /// Date sent with menu requests.
    pub fn menu_date(&self) -> String {
        match &self.date {
            Some(date) if !date.trim().is_empty() => date.trim().to_string(),
            _ => Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            platform: defaults::platform(),
            site_id: String::new(),
            date: None,
            timeout_secs: defaults::timeout(),
            headers: HeaderConfig::default(),
        }
    }
}

/// Request headers sent to the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    #[serde(default = "defaults::accept")]
    pub accept: String,

    #[serde(default)]
    pub origin: Option<String>,

    #[serde(default)]
    pub referer: Option<String>,

    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            accept: defaults::accept(),
            origin: None,
            referer: None,
            user_agent: defaults::user_agent(),
        }
    }
}

/// Destination store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the REST store
    #[serde(default)]
    pub url: String,

    /// Service key for the REST store
    #[serde(default)]
    pub key: String,

    /// Rows per insert/upsert call
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,
}

impl StoreConfig {
    /// Check that a remote store can be reached with these settings.
    pub fn validate_remote(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::config("store.url is not set"));
        }
        if self.key.trim().is_empty() {
            return Err(AppError::config("store.key is not set"));
        }
        url::Url::parse(&self.url)?;
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            batch_size: defaults::batch_size(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Log per-vendor outcomes after each fusion
    #[serde(default = "defaults::show_progress")]
    pub show_progress: bool,
}

impl LoggingConfig {
    /// Default `env_logger` filter; verbose mode forces `debug`.
    pub fn filter(&self, verbose: bool) -> &str {
        if verbose { "debug" } else { &self.level }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            show_progress: defaults::show_progress(),
        }
    }
}

/// Auxiliary input files, relative to the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathsConfig {
    /// Hand-maintained building list (JSON array of objects)
    #[serde(default)]
    pub buildings: Option<String>,
}

mod defaults {
    use crate::models::VendorSpec;

    pub fn base_url() -> String {
        "https://api.dineoncampus.com/v1".into()
    }
    pub fn platform() -> String {
        "0".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn accept() -> String {
        "application/json, text/plain, */*".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; menu-fusion/0.1)".into()
    }
    pub fn batch_size() -> usize {
        500
    }
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn show_progress() -> bool {
        true
    }

    /// Known venues. Location ids are deployment-specific and come from config.
    pub fn vendors() -> Vec<VendorSpec> {
        [
            "absurd",
            "chickfila",
            "coffee_shop",
            "copperhead_jacks",
            "dunkin",
            "einstein_bros",
            "halal_shack",
            "indian_kitchen",
            "piccola_italia",
            "skylight_room",
            "starbucks",
            "sushido",
            "true_grits",
            "wild_greens",
        ]
        .into_iter()
        .map(|label| {
            let vendor = VendorSpec::new(label, "");
            if label == "coffee_shop" {
                vendor.with_restaurant_id("586bcfa12cc8da3d267f4682")
            } else {
                vendor
            }
        })
        .collect()
    }
}
