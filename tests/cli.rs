//! Integration tests for the algotrace CLI, run via `cargo run --bin algotrace`.

use std::process::{Command, Output};

fn algotrace(args: &[&str]) -> Output {
  let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
  Command::new(cargo)
    .args(["run", "--quiet", "--bin", "algotrace", "--"])
    .args(args)
    .current_dir(env!("CARGO_MANIFEST_DIR"))
    .output()
    .expect("cargo run --bin algotrace")
}

fn stdout_json(out: &Output) -> serde_json::Value {
  assert!(
    out.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&out.stderr)
  );
  serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}

#[test]
fn prints_usage_without_args() {
  let out = algotrace(&[]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn run_writes_trace_and_document() {
  let dir = tempfile::tempdir().expect("temp dir");
  let request = dir.path().join("request.json");
  let output = dir.path().join("out").join("trace.json");
  std::fs::write(&request, r#"{"algorithm": "bfs", "start": "A", "end": "F"}"#).expect("write request");

  let out = algotrace(&[
    "run",
    request.to_str().expect("path"),
    "--output",
    output.to_str().expect("path"),
  ]);
  let trace = stdout_json(&out);
  assert_eq!(trace["algorithm"], "bfs");
  assert_eq!(trace["outcome"], "completed");
  assert!(!trace["steps"].as_array().expect("steps").is_empty());

  let doc: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(&output).expect("trace file")).expect("json");
  assert_eq!(doc["version"], 1);
  assert_eq!(doc["algorithm"], "bfs");
  assert!(doc["run_id"].is_string());
}

#[test]
fn run_fails_for_missing_file() {
  let out = algotrace(&["run", "/nonexistent/request.json"]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Error reading"), "stderr: {stderr}");
}

#[test]
fn run_reports_invalid_input() {
  let dir = tempfile::tempdir().expect("temp dir");
  let request = dir.path().join("bad.json");
  std::fs::write(&request, r#"{"algorithm": "matrix_chain", "dimensions": [10]}"#).expect("write");
  let out = algotrace(&["run", request.to_str().expect("path")]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("invalid input"), "stderr: {stderr}");
}

#[test]
fn bench_prints_a_growth_label() {
  let out = algotrace(&["bench", "knapsack", "--sizes", "8,16,32", "--trials", "1"]);
  let result = stdout_json(&out);
  assert_eq!(result["input_sizes"], serde_json::json!([8, 16, 32]));
  assert!(result["estimated_complexity"].as_str().expect("label").starts_with("O("));
  // the binary installs the tracking allocator
  assert!(result["memory_usage"].as_array().expect("memory").iter().all(|m| m.as_u64() > Some(0)));
}

#[test]
fn bench_rejects_unknown_selector() {
  let out = algotrace(&["bench", "quicksort", "--sizes", "10"]);
  assert!(!out.status.success());
}

#[test]
fn sample_and_list() {
  let graph = stdout_json(&algotrace(&["sample"]));
  assert_eq!(graph["nodes"].as_array().expect("nodes").len(), 6);

  let families = stdout_json(&algotrace(&["list"]));
  let names: Vec<_> = families
    .as_array()
    .expect("families")
    .iter()
    .map(|f| f["name"].as_str().expect("name").to_string())
    .collect();
  assert_eq!(names, ["graph_traversal", "dynamic_programming", "optimization"]);
}
