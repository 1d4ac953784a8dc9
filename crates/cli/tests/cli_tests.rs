//! CLI integration tests

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Command for the built binary with an empty home directory and no
/// server configured
fn ecoflow(home: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ecoflow"));
    command
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("ECOFLOW_API_URL")
        .env_remove("ECOFLOW_MODEL_PATH");
    command
}

fn run(args: &[&str]) -> (Output, TempDir) {
    let home = tempfile::tempdir().unwrap();
    let output = ecoflow(home.path())
        .args(args)
        .output()
        .expect("Failed to execute command");
    (output, home)
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// temperature + 0.5 * humidity + 2 * day + 10 * location + 100
fn write_linear_model(dir: &Path) -> String {
    let path = dir.join("model.json");
    std::fs::write(
        &path,
        r#"{"kind":"linear","version":"cli-test","coefficients":[1.0,0.5,2.0,10.0],"intercept":100.0}"#,
    )
    .unwrap();
    path.display().to_string()
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let (output, _home) = run(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("EcoFlow"), "Should show app name");
    for command in ["predict", "route", "insights", "bins", "bin", "interactive"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let (output, _home) = run(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("ecoflow"), "Should show binary name");
}

#[test]
fn test_predict_help() {
    let (output, _home) = run(&["predict", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    for flag in ["--location", "--temperature", "--humidity", "--day"] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

#[test]
fn test_insights_json() {
    let (output, _home) = run(&["insights", "--format", "json"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["insights"]["mean_kg"], 157.5);
    assert_eq!(json["insights"]["max_kg"], 200.0);
    assert_eq!(json["insights"]["min_kg"], 100.0);
    assert_eq!(json["zones"].as_array().unwrap().len(), 4);
}

#[test]
fn test_insights_table() {
    let (output, _home) = run(&["insights"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("157.50 kg"));
    assert!(stdout.contains("Zone D"));
}

#[test]
fn test_bins_json_lists_every_bin() {
    let (output, _home) = run(&["bins", "--format", "json"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let bins = json.as_array().unwrap();
    assert_eq!(bins.len(), 6);
    assert_eq!(bins[3]["bin"], "Bin 4");
    assert_eq!(bins[3]["empty"], "10 kg");
}

#[test]
fn test_bin_json() {
    let (output, _home) = run(&["bin", "Bin 4", "--format", "json"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["filled"], "90 kg");
    assert_eq!(json["empty"], "10 kg");
    assert_eq!(json["capacity"], "100 kg");
}

#[test]
fn test_unknown_bin_fails() {
    let (output, _home) = run(&["bin", "Bin 9"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Invalid bin selected."));
}

#[test]
fn test_route() {
    let (output, _home) = run(&["route", "Zone B", "--format", "json"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output)["optimized_route"],
        "Zone B with distance 10 km"
    );

    let (output, _home) = run(&["route", "Zone Q"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid location."));
}

#[test]
fn test_predict_with_local_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_linear_model(dir.path());

    let (output, _home) = run(&[
        "--model",
        &model,
        "predict",
        "--location",
        "Zone B",
        "--temperature",
        "30",
        "--humidity",
        "55",
        "--day",
        "Saturday",
        "--format",
        "json",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = stdout_json(&output);
    assert_eq!(json["predicted_waste"], "177.50 kg");
    assert_eq!(json["location"], "Zone B");
}

#[test]
fn test_predict_rejects_unknown_day() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_linear_model(dir.path());

    let (output, _home) = run(&[
        "--model",
        &model,
        "predict",
        "-l",
        "Zone A",
        "-t",
        "20",
        "--humidity",
        "40",
        "-d",
        "Someday",
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid location or day of week."));
}

#[test]
fn test_predict_without_model_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json").display().to_string();

    let (output, _home) = run(&[
        "--model", &missing, "predict", "-l", "Zone A", "-t", "20", "--humidity", "40", "-d",
        "Monday",
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load forecast model"));
}

#[test]
fn test_config_file_sets_default_format() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".config").join("ecoflow");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.json"), r#"{"default_format": "json"}"#).unwrap();

    let output = ecoflow(home.path()).args(["bin", "Bin 1"]).output().unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["filled"], "30 kg");
}

#[test]
fn test_interactive_requires_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_linear_model(dir.path());

    // Captured stdout is not a terminal
    let (output, _home) = run(&["--model", &model, "interactive"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Interactive mode needs a terminal"));
}
