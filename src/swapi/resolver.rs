//! Reference resolution
//!
//! Resources point at each other by URL (a person's `homeworld`, a film's
//! `characters`). The resolver turns such URLs into display names, caching
//! each name so a reference is fetched at most once per expiry window.
//! Resolution never fails: a broken reference yields a sentinel string so the
//! rest of a detail view still renders.

use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use super::resource::field_text;
use super::{ApiError, Fetch};
use crate::cache::CacheManager;

/// Shown when a reference has no usable name
pub const UNKNOWN: &str = "Unknown";

/// Shown when a reference could not be fetched
pub const ERROR_LOADING: &str = "Error loading";

/// Prefix for resolved-name cache keys
const NAME_KEY_PREFIX: &str = "name_";

/// Resolves reference URLs into display names
#[derive(Clone)]
pub struct ReferenceResolver {
    fetch: Arc<dyn Fetch>,
    cache: Option<CacheManager>,
}

impl ReferenceResolver {
    pub fn new(fetch: Arc<dyn Fetch>, cache: Option<CacheManager>) -> Self {
        Self { fetch, cache }
    }

    /// Generates the cache key for a reference URL
    fn cache_key(url: &str) -> String {
        format!("{}{}", NAME_KEY_PREFIX, url)
    }

    /// Resolves one reference into a display name
    ///
    /// Returns [`UNKNOWN`] without touching the network when `value` is not a
    /// non-empty string, and [`ERROR_LOADING`] when the fetch fails.
    pub async fn resolve_name(&self, value: &Value) -> String {
        let url = match value.as_str() {
            Some(url) if !url.is_empty() => url,
            _ => return UNKNOWN.to_string(),
        };

        let cache_key = Self::cache_key(url);
        if let Some(ref cache) = self.cache {
            if let Some(name) = cache.get::<String>(&cache_key) {
                debug!(url, "Resolved name from cache");
                return name;
            }
        }

        match self.fetch_name(url).await {
            Ok(name) => {
                if let Some(ref cache) = self.cache {
                    cache.set(&cache_key, &name);
                }
                name
            }
            Err(e) => {
                error!(url, error = %e, "Failed to resolve reference");
                ERROR_LOADING.to_string()
            }
        }
    }

    /// Resolves a list of references concurrently
    ///
    /// The output lines up with the input regardless of which request
    /// finishes first.
    pub async fn resolve_all(&self, values: &[Value]) -> Vec<String> {
        join_all(values.iter().map(|value| self.resolve_name(value))).await
    }

    async fn fetch_name(&self, url: &str) -> Result<String, ApiError> {
        let body = self.fetch.get_json(url).await?;
        let name = body
            .as_object()
            .and_then(|object| field_text(object, "name").or_else(|| field_text(object, "title")))
            .unwrap_or_else(|| UNKNOWN.to_string());
        Ok(name)
    }
}
