//! CLI integration tests
//!
//! Drive the `flagchart` binary against workbook files written to a
//! temporary directory.
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Chart, labels or summary written |
//! | 1 | Unreadable input, schema/date error or invalid parameters |

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

const WORKBOOK: &str = r#"{
  "name": "Plant upgrade.xlsx",
  "tasks": {
    "headers": ["Task", "Start", "Finish"],
    "rows": [
      ["Design", "2024-01-01", "2024-02-01"],
      ["Build", "2024-02-01", "2024-04-15"]
    ]
  },
  "milestones": {
    "headers": ["Label", "Date"],
    "rows": [
      ["PQ Review", "2024-01-15"],
      ["TP1 handover", 45366],
      ["Status today", "2024-03-20"]
    ]
  }
}"#;

fn flagchart() -> Command {
    Command::new(env!("CARGO_BIN_EXE_flagchart"))
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn run(args: &[&str], file: &Path) -> Output {
    flagchart()
        .args(args)
        .arg(file)
        .env_remove("FLAGCHART_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute flagchart")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// =============================================================================
// render
// =============================================================================

#[test]
fn render_emits_chart_spec() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "plan.json", WORKBOOK);

    let output = run(&["render"], &file);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let spec = stdout_json(&output);
    assert_eq!(spec["title"], "Plant upgrade");
    assert_eq!(spec["taskRows"][0]["label"], "Build");
    assert_eq!(spec["taskRows"][1]["label"], "Design");

    let markers = spec["milestoneMarkers"].as_array().unwrap();
    assert_eq!(markers.len(), 3);
    assert_eq!(markers[0]["color"], "cadetblue");
    assert_eq!(markers[0]["x"], "2024-01-17");
    assert_eq!(markers[1]["anchor"], "2024-03-15");
    assert_eq!(markers[1]["color"], "coral");
    assert_eq!(markers[1]["wrappedLabel"], "TP1 handover");
    assert_eq!(markers[2]["color"], "darkblue");
    assert_eq!(spec["figureSize"], json!({"height": 900, "width": 1500}));
}

#[test]
fn render_applies_parameters_and_flag_move() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "plan.json", WORKBOOK);

    let output = run(
        &[
            "render",
            "--compact",
            "--tick-offset",
            "-1",
            "--font",
            "Courier New",
            "--flag",
            "Status today",
            "--flag-position",
            "3.5",
        ],
        &file,
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let spec = stdout_json(&output);
    assert_eq!(spec["font"]["family"], "Courier New");
    assert_eq!(spec["milestoneMarkers"][0]["x"], "2024-01-14");
    let ys: Vec<f64> = spec["milestoneMarkers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["y"].as_f64().unwrap())
        .collect();
    assert_eq!(ys, vec![0.5, 1.0, 3.5]);
}

#[test]
fn render_reads_toml_config_and_writes_file() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "plan.json", WORKBOOK);
    let config = write(
        &dir,
        "chart.toml",
        "height = 640\nsplitRatio = 0.5\nfontStyle = \"Times New Roman\"\n",
    );
    let out = dir.path().join("chart.json");

    let output = flagchart()
        .args(["render", "--width", "1000", "--config"])
        .arg(&config)
        .arg("--output")
        .arg(&out)
        .arg(&file)
        .env_remove("FLAGCHART_CONFIG")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let spec: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(spec["figureSize"], json!({"height": 640, "width": 1000}));
    assert_eq!(spec["axes"]["splitRatio"], 0.5);
    assert_eq!(spec["axes"]["milestoneDomain"], json!([0.5, 1.0]));
    assert_eq!(spec["font"]["family"], "Times New Roman");
}

#[test]
fn render_fails_on_missing_column() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "broken.json",
        r#"{
          "tasks": {"headers": ["Task", "Start"], "rows": [["Design", "2024-01-01"]]},
          "milestones": {"headers": ["label", "date"], "rows": []}
        }"#,
    );

    let output = run(&["render"], &file);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing column(s): Finish"), "{}", stderr);
}

#[test]
fn render_rejects_invalid_split() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "plan.json", WORKBOOK);

    let output = run(&["render", "--split", "1.5"], &file);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("split ratio"));
}

#[test]
fn render_checks_parameters_before_reading_workbook() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");

    let output = run(&["render", "--split", "1.5"], &missing);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("split ratio"), "{}", stderr);
    assert!(!stderr.contains("absent.json"), "{}", stderr);
}

#[test]
fn render_rejects_non_workbook_json() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "other.json", r#"{"hello": "world"}"#);

    let output = run(&["render"], &file);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not a workbook"));
}

// =============================================================================
// labels / check
// =============================================================================

#[test]
fn labels_lists_raw_labels() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "plan.json", WORKBOOK);

    let output = run(&["labels"], &file);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "PQ Review\nTP1 handover\nStatus today\n"
    );
}

#[test]
fn check_summarizes_workbook() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "plan.json", WORKBOOK);

    let output = run(&["check"], &file);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tasks:      2"));
    assert!(stdout.contains("milestones: 3"));
    assert!(stdout.contains("2024-01-01 to 2024-04-15 (4 months)"));
}

#[test]
fn check_reports_bad_dates() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "dates.json",
        r#"{
          "tasks": {"headers": ["Task", "Start", "Finish"], "rows": [["Design", "2024-01-01", "2024-02-01"]]},
          "milestones": {"headers": ["label", "date"], "rows": [["Go live", "next spring"]]}
        }"#,
    );

    let output = run(&["check"], &file);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'next spring'"), "{}", stderr);
    assert!(stderr.contains("row 1 of the milestones sheet"), "{}", stderr);
}
