//! Star Wars API data layer
//!
//! Resource items are kept as open-ended JSON objects since every collection
//! has its own schema; helpers in [`resource`] read the fields the UI needs by
//! name. [`client`] walks paginated collections and [`resolver`] turns
//! reference URLs into display names.

pub mod client;
pub mod resolver;
pub mod resource;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{endpoint_url, fetch_all, ApiError, Fetch, SwapiClient, DEFAULT_BASE_URL};
pub use resolver::{ReferenceResolver, ERROR_LOADING, UNKNOWN};
pub use resource::{FieldValue, ResourceItem};

/// A named collection on the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    People,
    Films,
    Planets,
    Species,
    Starships,
    Vehicles,
}

impl Endpoint {
    /// Every collection, in tab order
    pub const ALL: [Endpoint; 6] = [
        Endpoint::People,
        Endpoint::Films,
        Endpoint::Planets,
        Endpoint::Species,
        Endpoint::Starships,
        Endpoint::Vehicles,
    ];

    /// Path segment under the API base URL
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::People => "people",
            Endpoint::Films => "films",
            Endpoint::Planets => "planets",
            Endpoint::Species => "species",
            Endpoint::Starships => "starships",
            Endpoint::Vehicles => "vehicles",
        }
    }

    /// Human-readable name for tabs and headings
    pub fn title(self) -> &'static str {
        match self {
            Endpoint::People => "People",
            Endpoint::Films => "Films",
            Endpoint::Planets => "Planets",
            Endpoint::Species => "Species",
            Endpoint::Starships => "Starships",
            Endpoint::Vehicles => "Vehicles",
        }
    }

    /// Field holding an item's display name in this collection
    pub fn display_key(self) -> &'static str {
        match self {
            Endpoint::Films => "title",
            _ => "name",
        }
    }

    /// Parses a collection name (case-insensitive, singular forms accepted)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "people" | "person" | "characters" => Some(Endpoint::People),
            "films" | "film" => Some(Endpoint::Films),
            "planets" | "planet" => Some(Endpoint::Planets),
            "species" => Some(Endpoint::Species),
            "starships" | "starship" => Some(Endpoint::Starships),
            "vehicles" | "vehicle" => Some(Endpoint::Vehicles),
            _ => None,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|e| *e == self).unwrap_or(0)
    }

    /// Next collection, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous collection, wrapping around
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
