//! End-to-end tests for the `coord` binary using assert_cmd.

use assert_cmd::Command;
use coord_test_utils::{fixtures, workspace::TestWorkspace};
use predicates::prelude::*;
use serde_json::json;

/// Get a Command for the coord binary with no inherited config path
fn coord_cmd() -> Command {
    let mut cmd = Command::cargo_bin("coord").expect("Failed to find coord binary");
    cmd.env_remove("COORD_CONFIG");
    cmd
}

// ============================================================================
// General
// ============================================================================

#[test]
fn test_help_lists_commands() {
    coord_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("merge"));
}

#[test]
fn test_missing_config_fails() {
    let ws = TestWorkspace::new();
    coord_cmd()
        .current_dir(ws.root())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_config_from_environment() {
    let ws = TestWorkspace::with_config(&fixtures::two_sliders_json());
    coord_cmd()
        .env("COORD_CONFIG", ws.config_path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All scope references resolve"));
}

// ============================================================================
// check / scopes / resolve
// ============================================================================

#[test]
fn test_check_dangling_reference_exits_nonzero() {
    let mut config = fixtures::two_sliders_json();
    config["layout"][0]["coordinationScopes"]["value"] = json!("Q");
    let ws = TestWorkspace::with_config(&config);

    coord_cmd()
        .arg("--config")
        .arg(ws.config_path())
        .args(["check", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("v1: value -> Q (missing)"));
}

#[test]
fn test_scopes_shows_meta_override() {
    let ws = TestWorkspace::with_config(&fixtures::meta_override_json());
    let output = coord_cmd()
        .arg("--config")
        .arg(ws.config_path())
        .args(["scopes", "v1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["coordinationScopes"]["value"], json!("B"));
    assert!(parsed["coordinationScopes"].get("metaCoordinationScopes").is_none());
}

#[test]
fn test_resolve_flat_json() {
    let ws = TestWorkspace::with_config(&fixtures::two_sliders_json());
    let output = coord_cmd()
        .arg("--config")
        .arg(ws.config_path())
        .args(["resolve", "v1", "value", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["values"], json!({"value": 0.5}));
}

#[test]
fn test_resolve_by_layer_text() {
    let ws = TestWorkspace::with_config(&fixtures::layered_spatial_json());
    coord_cmd()
        .arg("--config")
        .arg(ws.config_path())
        .args(["resolve", "v2", "spatialLayerOpacity", "--by", "spatialImageLayer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("L1"))
        .stdout(predicate::str::contains("spatialLayerOpacity: 0.5"));
}

// ============================================================================
// set / merge
// ============================================================================

#[test]
fn test_set_write_then_resolve() {
    let ws = TestWorkspace::with_config(&fixtures::two_sliders_json());

    coord_cmd()
        .arg("--config")
        .arg(ws.config_path())
        .args(["set", "v1", "value", "0.9", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.5 -> 0.9"));

    let config = ws.read_config();
    assert_eq!(config.coordination_space.value("value", "A"), Some(&json!(0.9)));
    assert_eq!(config.coordination_space.value("value", "B"), Some(&json!(0.75)));
}

#[test]
fn test_set_per_channel() {
    let ws = TestWorkspace::with_config(&fixtures::layered_spatial_json());

    coord_cmd()
        .arg("--config")
        .arg(ws.config_path())
        .args([
            "set",
            "v1",
            "spatialChannelColor",
            "[9, 9, 9]",
            "--by-type",
            "spatialImageChannel",
            "--by-scope",
            "C2",
            "--write",
        ])
        .assert()
        .success();

    let config = ws.read_config();
    assert_eq!(config.coordination_space.value("spatialChannelColor", "K2"), Some(&json!([9, 9, 9])));
    assert_eq!(config.coordination_space.value("spatialChannelColor", "K0"), Some(&json!([255, 0, 0])));
}

#[test]
fn test_set_unknown_view_fails() {
    let ws = TestWorkspace::with_config(&fixtures::two_sliders_json());
    coord_cmd()
        .arg("--config")
        .arg(ws.config_path())
        .args(["set", "v7", "value", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("v7"));
}

#[test]
fn test_merge_dry_run_leaves_file() {
    let ws = TestWorkspace::with_config(&fixtures::two_sliders_json());
    let fragment = ws.write_json("fragment.json", &json!({"zoom": {"A": 1}}));

    coord_cmd()
        .arg("--config")
        .arg(ws.config_path())
        .arg("merge")
        .arg("v1")
        .arg(&fragment)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 new scope(s)"))
        .stdout(predicate::str::contains("Dry run"));

    assert_eq!(ws.read_config(), fixtures::two_sliders());
}
