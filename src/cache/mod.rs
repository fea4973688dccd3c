//! Cache module for storing API responses to disk
//!
//! This module provides an expiring key-value cache that persists JSON values to
//! the filesystem. Entries older than the expiry window read as absent and are
//! removed; corrupt entries are logged, removed and treated as misses. The total
//! number of entries is bounded, with least-recently-used entries evicted first.

mod manager;

pub use manager::{CacheError, CacheManager, DEFAULT_CAPACITY, DEFAULT_EXPIRY_MINUTES};
