//! Holocron library
//!
//! A terminal directory of the Star Wars API: paginated collections are
//! fetched once per cache window, listed with a debounced search, and shown
//! in a detail modal with reference URLs resolved into names.

pub mod app;
pub mod cache;
pub mod cli;
pub mod detail;
pub mod directory;
pub mod listing;
pub mod logging;
pub mod search;
pub mod swapi;
pub mod ui;
