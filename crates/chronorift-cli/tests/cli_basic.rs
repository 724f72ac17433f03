//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a temporary config file.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `--config <path>` and return (stdout, stderr, code).
fn run_cli(config: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "chronorift-cli", "--"])
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_spawn_at_reference() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (stdout, stderr, code) = run_cli(
        &config,
        &["spawn", "at", "--offset", "0", "--at", "2025-04-10T04:00:00Z"],
    );
    assert_eq!(code, 0, "spawn at failed: {stderr}");
    let json = parse_json(&stdout);
    assert_eq!(json["slot_index"], 1);
    assert_eq!(json["slot"]["primary"], "Sealed Sanctuary");
    assert_eq!(json["slot"]["secondary"], "Shrine of Devotion");
    assert_eq!(json["suppressed"], false);
    assert!(config.exists(), "default config should be written on first use");
}

#[test]
fn test_spawn_at_negative_offset() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (stdout, _, code) = run_cli(
        &config,
        &["spawn", "at", "--offset", "-2", "--at", "2025-04-10T04:00:00Z"],
    );
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["instant"], "2025-04-10T02:00:00Z");
}

#[test]
fn test_spawn_at_huge_offset_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    for offset in ["3000000000", "9223372036854775807"] {
        let (stdout, stderr, code) = run_cli(
            &config,
            &["spawn", "at", "--offset", offset, "--at", "2025-04-10T04:00:00Z"],
        );
        assert_eq!(code, 1, "offset {offset} should fail: {stderr}");
        assert!(stdout.is_empty());
        assert!(stderr.contains("error: offset out of range"), "stderr: {stderr}");
        assert!(!stderr.contains("panicked"));
    }
}

#[test]
fn test_spawn_next_skips_maintenance_hour() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (stdout, _, code) = run_cli(&config, &["spawn", "next", "--at", "2025-04-11T01:45:00Z"]);
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert_eq!(json["boundary"], "2025-04-11T03:00:00Z");
    assert_eq!(json["countdown"], "01:15:00");
    assert_eq!(json["prediction"]["suppressed"], false);
}

#[test]
fn test_spawn_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (stdout, _, code) = run_cli(&config, &["spawn", "boundary", "--at", "2025-04-10T12:05:30Z"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2025-04-10T12:20:00+00:00");
}

#[test]
fn test_spawn_list_pages() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (stdout, _, code) = run_cli(
        &config,
        &["spawn", "list", "--pages", "2", "--json", "--at", "2025-04-10T04:30:00Z"],
    );
    assert_eq!(code, 0);
    let list = parse_json(&stdout);
    let items = list.as_array().unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0]["instant"], "2025-04-10T04:00:00Z");
    assert_eq!(items[5]["instant"], "2025-04-10T09:00:00Z");
}

#[test]
fn test_spawn_list_text_marks_current_hour() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (stdout, _, code) = run_cli(
        &config,
        &["spawn", "list", "--count", "24", "--at", "2025-04-10T04:30:00Z"],
    );
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 24);
    assert!(lines[0].starts_with('*'));
    assert!(lines[0].contains("Sealed Sanctuary"));
    assert!(lines[22].contains("No Spawns Scheduled"));
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (_, _, code) = run_cli(&config, &["config", "set", "boundary.step_minutes", "30"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(&config, &["config", "get", "boundary.step_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");
}

#[test]
fn test_config_rejects_invalid_step() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (_, stderr, code) = run_cli(&config, &["config", "set", "boundary.step_minutes", "7"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("step_minutes"));
}

#[test]
fn test_unknown_timezone_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[rotation]\ntimezone = \"Nowhere/Special\"\n").unwrap();
    let (_, stderr, code) = run_cli(&config, &["spawn", "next"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Nowhere/Special"));
}

#[test]
fn test_watch_stops_after_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (stdout, _, code) = run_cli(&config, &["watch", "--ticks", "1"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().count(), 1);
}
