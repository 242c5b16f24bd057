use assert_cmd::cargo::cargo_bin_cmd;
use serde::Deserialize;
use serde_json::Value;
use std::{error::Error, path::PathBuf};

#[derive(Deserialize)]
struct Window {
    start: f64,
    end: f64,
}

#[derive(Deserialize)]
struct InspectOutput {
    source: String,
    samples: usize,
    available: Vec<String>,
    groups: Vec<Value>,
    window: Window,
}

#[test]
fn inspect_summarizes_csv_upload() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("eegscope");
    cmd.args(["inspect", "--input", &sample_path("test_data/recording.csv")]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let summary: InspectOutput = serde_json::from_slice(&out)?;
    assert_eq!(summary.source, "recording.csv");
    assert_eq!(summary.samples, 5);
    assert_eq!(summary.available, vec!["FP1", "FP2", "C3", "CZ", "O1", "EKG"]);
    let names: Vec<&str> = summary
        .groups
        .iter()
        .map(|g| g["name"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Frontal", "Central", "Occipital", "Other"]);
    assert_eq!(summary.window.start, 0.0);
    assert_eq!(summary.window.end, 16.0);
    Ok(())
}

#[test]
fn inspect_reads_preset_directory() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("eegscope");
    cmd.args([
        "inspect",
        "--preset",
        "s00",
        "--preset-dir",
        &sample_path("test_data/presets"),
    ]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let summary: InspectOutput = serde_json::from_slice(&out)?;
    assert_eq!(summary.source, "s00.csv");
    assert_eq!(summary.samples, 4);
    assert_eq!(summary.available.len(), 19);
    assert_eq!(summary.window.end, 3.0);
    Ok(())
}

#[test]
fn config_file_switches_to_synthetic_time() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("eegscope");
    cmd.args([
        "inspect",
        "--input",
        &sample_path("test_data/no_time.csv"),
        "--config",
        &sample_path("test_data/eegscope.toml"),
    ]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let summary: InspectOutput = serde_json::from_slice(&out)?;
    assert_eq!(summary.available, vec!["A", "B"]);
    assert_eq!(summary.window.end, 0.0);
    Ok(())
}

#[test]
fn missing_time_column_fails_with_message() {
    let mut cmd = cargo_bin_cmd!("eegscope");
    cmd.args(["inspect", "--input", &sample_path("test_data/no_time.csv")]);
    let out = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("no timestamp column found"), "{}", stderr);
}

#[test]
fn non_numeric_recording_fails() {
    let mut cmd = cargo_bin_cmd!("eegscope");
    cmd.args(["inspect", "--input", &sample_path("test_data/no_numeric.csv")]);
    let out = cmd.assert().failure().get_output().stderr.clone();
    assert!(String::from_utf8_lossy(&out).contains("no valid data points"));
}

#[test]
fn enforce_flag_rejects_unknown_montage() {
    let mut cmd = cargo_bin_cmd!("eegscope");
    cmd.args([
        "inspect",
        "--input",
        &sample_path("test_data/unknown_montage.csv"),
        "--channel-check",
        "enforce",
    ]);
    let out = cmd.assert().failure().get_output().stderr.clone();
    assert!(String::from_utf8_lossy(&out).contains("no recognized EEG channels"));
}

#[test]
fn enforce_flag_is_ignored_for_synthetic_time() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("eegscope");
    cmd.args([
        "inspect",
        "--input",
        &sample_path("test_data/no_time.csv"),
        "--time-policy",
        "synthetic",
        "--channel-check",
        "enforce",
    ]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let summary: InspectOutput = serde_json::from_slice(&out)?;
    assert_eq!(summary.available, vec!["A", "B"]);
    Ok(())
}

#[test]
fn samples_prints_one_json_object_per_line() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("eegscope");
    cmd.args(["samples", "--input", &sample_path("test_data/recording.csv")]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out)?;
    let lines: Vec<Value> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[2]["timestamp"], 8.0);
    assert_eq!(lines[2]["FP1"], 13.1);
    assert!(lines[2].get("C3").is_none());
    Ok(())
}

fn sample_path(relative: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join(relative)
        .to_string_lossy()
        .to_string()
}
