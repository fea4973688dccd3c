//! Cache-or-fetch loading of whole collections

use tracing::info;

use crate::cache::CacheManager;
use crate::swapi::{endpoint_url, fetch_all, ApiError, Endpoint, Fetch, ResourceItem};

/// Loads every item of a collection, preferring a fresh cached copy
///
/// The cache key is the collection's first-page URL, so different API bases
/// never share entries. A successful fetch is written back to the cache; a
/// failed one is returned to the caller untouched.
pub async fn load_items(
    fetch: &dyn Fetch,
    cache: Option<&CacheManager>,
    base_url: &str,
    endpoint: Endpoint,
) -> Result<Vec<ResourceItem>, ApiError> {
    let cache_key = endpoint_url(base_url, endpoint.path());

    if let Some(cache) = cache {
        if let Some(items) = cache.get::<Vec<ResourceItem>>(&cache_key) {
            info!(%endpoint, items = items.len(), "Loaded collection from cache");
            return Ok(items);
        }
    }

    info!(%endpoint, "Fetching collection from API");
    let items = fetch_all(fetch, base_url, endpoint.path()).await?;
    if let Some(cache) = cache {
        cache.set(&cache_key, &items);
    }
    Ok(items)
}
