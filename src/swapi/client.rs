//! HTTP access to the Star Wars API
//!
//! [`Fetch`] is the transport seam: [`SwapiClient`] implements it with reqwest,
//! tests swap in an in-memory implementation. [`fetch_all`] follows the `next`
//! cursor of a paginated collection until the last page.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::ResourceItem;

/// Base URL for the Star Wars API
pub const DEFAULT_BASE_URL: &str = "https://swapi.dev/api/";

/// Errors that can occur when talking to the API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error {status} for {url}")]
    Status { status: u16, url: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(&'static str),
}

/// Something that can GET a URL and hand back its JSON body
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `url`, failing on transport errors and non-success statuses
    async fn get_json(&self, url: &str) -> Result<Value, ApiError>;
}

/// Client for the live API
#[derive(Debug, Clone, Default)]
pub struct SwapiClient {
    client: Client,
}

impl SwapiClient {
    /// Create a new SwapiClient with default settings
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetch for SwapiClient {
    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// One page of a paginated collection
#[derive(Debug, Deserialize)]
struct Page {
    results: Option<Vec<ResourceItem>>,
    #[serde(default)]
    next: Option<String>,
}

/// URL of the first page of a collection
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}/",
        base_url.trim_end_matches('/'),
        endpoint.trim_matches('/')
    )
}

/// Fetches every page of a collection and concatenates the results
///
/// Items keep server order: page by page, then in-page order. Any failed page
/// aborts the whole walk; no partial list is returned and nothing is retried.
pub async fn fetch_all(
    fetch: &dyn Fetch,
    base_url: &str,
    endpoint: &str,
) -> Result<Vec<ResourceItem>, ApiError> {
    let mut items = Vec::new();
    let mut pages = 0usize;
    let mut next = Some(endpoint_url(base_url, endpoint));

    while let Some(url) = next {
        let body = fetch.get_json(&url).await?;
        let page: Page = serde_json::from_value(body)?;
        let results = page.results.ok_or(ApiError::MissingField("results"))?;

        pages += 1;
        debug!(url = %url, count = results.len(), "Fetched page");
        items.extend(results);
        next = page.next.filter(|n| !n.is_empty());
    }

    info!(endpoint, pages, items = items.len(), "Fetched collection");
    Ok(items)
}
