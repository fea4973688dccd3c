//! Command-line interface parsing for Holocron
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig`.

use chrono::Duration;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::{CacheManager, DEFAULT_EXPIRY_MINUTES};
use crate::swapi::{Endpoint, DEFAULT_BASE_URL};

/// Name of the log file written inside the cache directory
const LOG_FILE_NAME: &str = "holocron.log";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified collection name is not recognized
    #[error("Invalid endpoint: '{0}'. Valid endpoints: people, films, planets, species, starships, vehicles")]
    InvalidEndpoint(String),

    /// A zero expiry window would make the cache useless
    #[error("Invalid cache TTL: must be at least 1 minute")]
    InvalidTtl,
}

/// Holocron - browse the Star Wars API from your terminal
#[derive(Parser, Debug)]
#[command(name = "holocron")]
#[command(about = "Searchable terminal directory of the Star Wars API")]
#[command(version)]
pub struct Cli {
    /// Collection to open: people, films, planets, species, starships, vehicles
    #[arg(short, long, value_name = "ENDPOINT", default_value = "people")]
    pub endpoint: String,

    /// Initial search filter
    #[arg(short, long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Print the (filtered) list to stdout and exit instead of opening the TUI
    #[arg(long)]
    pub print: bool,

    /// Base URL of the API
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub api_base: String,

    /// Directory for cached responses (default: XDG cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// How long cached responses stay valid
    #[arg(long, value_name = "MINUTES", default_value_t = DEFAULT_EXPIRY_MINUTES as u64)]
    pub cache_ttl_minutes: u64,

    /// Do not read or write the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Remove all cached responses before starting
    #[arg(long)]
    pub clear_cache: bool,

    /// Log file (default: holocron.log in the cache directory; level via RUST_LOG)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Collection shown first
    pub endpoint: Endpoint,
    /// Initial search query (may be empty)
    pub query: String,
    /// Print mode instead of the TUI
    pub print_only: bool,
    /// Base URL of the API
    pub api_base: String,
    /// Cache directory, if one could be determined
    pub cache_dir: Option<PathBuf>,
    /// Cache expiry window
    pub cache_ttl: Duration,
    /// Whether the cache is used at all
    pub use_cache: bool,
    /// Whether to wipe the cache on startup
    pub clear_cache: bool,
    /// Explicit log file location
    pub log_file: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::People,
            query: String::new(),
            print_only: false,
            api_base: DEFAULT_BASE_URL.to_string(),
            cache_dir: None,
            cache_ttl: Duration::minutes(DEFAULT_EXPIRY_MINUTES),
            use_cache: true,
            clear_cache: false,
            log_file: None,
        }
    }
}

/// Parses a collection name argument into an Endpoint.
pub fn parse_endpoint_arg(s: &str) -> Result<Endpoint, CliError> {
    Endpoint::from_name(s).ok_or_else(|| CliError::InvalidEndpoint(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an argument is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let endpoint = parse_endpoint_arg(&cli.endpoint)?;
        if cli.cache_ttl_minutes == 0 {
            return Err(CliError::InvalidTtl);
        }
        let ttl_minutes = i64::try_from(cli.cache_ttl_minutes).map_err(|_| CliError::InvalidTtl)?;
        let cache_ttl = Duration::try_minutes(ttl_minutes).ok_or(CliError::InvalidTtl)?;

        Ok(StartupConfig {
            endpoint,
            query: cli.query.clone().unwrap_or_default(),
            print_only: cli.print,
            api_base: cli.api_base.clone(),
            cache_dir: cli.cache_dir.clone().or_else(CacheManager::default_dir),
            cache_ttl,
            use_cache: !cli.no_cache,
            clear_cache: cli.clear_cache,
            log_file: cli.log_file.clone(),
        })
    }

    /// Builds the cache for this run, or `None` when caching is off or no
    /// cache directory is available
    pub fn cache_manager(&self) -> Option<CacheManager> {
        if !self.use_cache {
            return None;
        }
        self.cache_dir
            .clone()
            .map(|dir| CacheManager::with_dir(dir).with_expiry(self.cache_ttl))
    }

    /// Where logs go: the explicit path, else a file in the cache directory
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| self.cache_dir.as_ref().map(|dir| dir.join(LOG_FILE_NAME)))
    }
}
