// src/storage/rest.rs

//! PostgREST-style HTTP store.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Row, StoreConfig};
use crate::storage::RecordStore;
use crate::utils::http::endpoint;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Remote store reached over `POST {url}/rest/v1/{table}`.
pub struct RestStore {
    client: Client,
    base_url: String,
    key: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        config.validate_remote()?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: config.url.clone(),
            key: config.key.clone(),
        })
    }

    /// Endpoint for `table`, with an optional conflict target.
    pub fn table_url(&self, table: &str, on_conflict: Option<&str>) -> Result<Url> {
        let path = format!("rest/v1/{table}");
        match on_conflict {
            Some(key) => endpoint(&self.base_url, &path, &[("on_conflict", key)]),
            None => endpoint(&self.base_url, &path, &[]),
        }
    }

    fn request(&self, url: Url, prefer: &str, rows: &[Row]) -> RequestBuilder {
        self.client
            .post(url)
            .header("apikey", &self.key)
            .header(AUTHORIZATION, format!("Bearer {}", self.key))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", prefer)
            .json(rows)
    }

    fn send(&self, table: &str, request: RequestBuilder) -> Result<()> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(AppError::load(table, format!("{status}: {body}")))
    }
}

impl RecordStore for RestStore {
    fn insert(&self, table: &str, rows: &[Row]) -> Result<()> {
        let url = self.table_url(table, None)?;
        self.send(table, self.request(url, "return=minimal", rows))
    }

    fn upsert(&self, table: &str, rows: &[Row], on_conflict: &str) -> Result<()> {
        let url = self.table_url(table, Some(on_conflict))?;
        let prefer = "resolution=merge-duplicates,return=minimal";
        self.send(table, self.request(url, prefer, rows))
    }
}
