//! Integration tests for CLI argument handling
//!
//! Tests endpoint validation and the non-interactive --print mode.
//! Successful --print runs are served from a pre-filled cache so no network
//! is needed.

use std::path::Path;
use std::process::Command;

use holocron::cache::CacheManager;
use holocron::swapi::{endpoint_url, ResourceItem};
use serde_json::json;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    let cache_dir = tempfile::tempdir().expect("Failed to create temp dir");
    run_cli_in(cache_dir.path(), args)
}

/// Runs the CLI against a specific cache directory
fn run_cli_in(cache_dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_holocron"))
        .args(args)
        .arg("--cache-dir")
        .arg(cache_dir)
        .output()
        .expect("Failed to execute holocron")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("holocron"), "Help should mention holocron");
    assert!(stdout.contains("endpoint"), "Help should mention --endpoint flag");
}

#[test]
fn test_invalid_endpoint_prints_error_and_exits() {
    let output = run_cli(&["--endpoint", "droids", "--print"]);
    assert!(!output.status.success(), "Expected invalid endpoint to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid endpoint"),
        "Should print error message about invalid endpoint: {}",
        stderr
    );
}

#[test]
fn test_zero_ttl_is_rejected() {
    let output = run_cli(&["--cache-ttl-minutes", "0", "--print"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TTL"), "Unexpected stderr: {}", stderr);
}

#[test]
fn test_print_with_unreachable_api_fails() {
    // Nothing listens on the discard port
    let output = run_cli(&["--print", "--no-cache", "--api-base", "http://127.0.0.1:9/api"]);
    assert!(!output.status.success(), "Expected unreachable API to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Unexpected stderr: {}", stderr);
}

#[test]
fn test_clear_cache_flag_is_accepted() {
    // --help short-circuits before any network access
    let output = run_cli(&["--clear-cache", "--help"]);
    assert!(output.status.success());
}

#[test]
fn test_startup_config_from_parsed_args() {
    use clap::Parser;
    use holocron::cli::{Cli, StartupConfig};
    use holocron::swapi::Endpoint;

    let cli = Cli::parse_from([
        "holocron",
        "--endpoint",
        "starships",
        "--query",
        "falcon",
        "--no-cache",
    ]);
    let config = StartupConfig::from_cli(&cli).expect("valid arguments");

    assert_eq!(config.endpoint, Endpoint::Starships);
    assert_eq!(config.query, "falcon");
    assert!(config.cache_manager().is_none());
}

fn item(value: serde_json::Value) -> ResourceItem {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

#[test]
fn test_print_lists_cached_collection() {
    let cache_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let api_base = "http://127.0.0.1:9/api/";
    let people = vec![
        item(json!({"name": "Luke Skywalker", "birth_year": "19BBY"})),
        item(json!({"name": "Leia Organa", "birth_year": "19BBY"})),
        item(json!({"name": "C-3PO", "birth_year": "112BBY"})),
    ];
    CacheManager::with_dir(cache_dir.path().to_path_buf())
        .set(&endpoint_url(api_base, "people"), &people);

    let output = run_cli_in(
        cache_dir.path(),
        &["--print", "--api-base", api_base, "--endpoint", "people"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Luke Skywalker - born: 19BBY\nLeia Organa - born: 19BBY\nC-3PO - born: 112BBY\n"
    );

    let filtered = run_cli_in(
        cache_dir.path(),
        &["--print", "--api-base", api_base, "--query", "LEIA"],
    );
    assert!(filtered.status.success());
    assert_eq!(
        String::from_utf8_lossy(&filtered.stdout),
        "Leia Organa - born: 19BBY\n"
    );

    let none = run_cli_in(
        cache_dir.path(),
        &["--print", "--api-base", api_base, "--query", "zzz"],
    );
    assert!(none.status.success());
    assert_eq!(String::from_utf8_lossy(&none.stdout), "No items found.\n");
}
