// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ApiConfig;

/// Create a configured blocking HTTP client for the aggregator.
pub fn create_client(config: &ApiConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    insert_header(&mut headers, ACCEPT, &config.headers.accept)?;
    if let Some(origin) = &config.headers.origin {
        insert_header(&mut headers, ORIGIN, origin)?;
    }
    if let Some(referer) = &config.headers.referer {
        insert_header(&mut headers, REFERER, referer)?;
    }

    let client = Client::builder()
        .user_agent(&config.headers.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) -> Result<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| AppError::config(format!("invalid {name} header: {e}")))?;
    headers.insert(name, value);
    Ok(())
}

/// Build an endpoint URL under `base` with query parameters.
pub fn endpoint(base: &str, path: &str, query: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(&format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// GET a URL and parse the body as JSON. Non-2xx statuses are errors.
pub fn fetch_json(client: &Client, url: Url) -> Result<Value> {
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.json()?)
}
