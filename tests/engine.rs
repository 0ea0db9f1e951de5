//! End-to-end tests through the public library surface: request JSON in, trace out.

use algotrace::config::{BenchmarkConfig, EngineConfig};
use algotrace::trace_io::{TraceDocument, load_trace, save_trace};
use algotrace::types::EdgeState;
use algotrace::{
  AlgoError, AlgorithmRequest, AlgorithmSelector, Graph, RunOutcome, Trace, estimate_complexity,
  run,
};

fn request(json: &str) -> Trace {
  let req = AlgorithmRequest::from_json(json).expect("valid request");
  run(&req, &EngineConfig::default()).expect("run succeeds")
}

#[test]
fn traversals_agree_on_reachability() {
  for name in ["dfs", "bfs", "dijkstra", "astar"] {
    let trace = request(&format!(r#"{{"algorithm": "{name}", "end": "F", "heuristic": "zero"}}"#));
    let last = trace.steps().expect("graph steps").last().expect("terminal step");
    let path = last.path.as_ref().expect("path to F");
    assert_eq!(path.first().map(String::as_str), Some("A"), "{name}");
    assert_eq!(path.last().map(String::as_str), Some("F"), "{name}");
    assert!(last.edges.iter().any(|e| e.state == EdgeState::Path), "{name}");
  }
}

#[test]
fn shortest_paths_match() {
  let dijkstra = request(r#"{"algorithm": "dijkstra", "end": "F"}"#);
  let astar = request(r#"{"algorithm": "astar", "end": "F", "heuristic": "zero"}"#);
  let path = |t: &Trace| t.steps().unwrap().last().unwrap().path.clone();
  assert_eq!(path(&dijkstra), path(&astar));
}

#[test]
fn simplex_textbook_problem() {
  let trace = request(
    r#"{"algorithm": "simplex", "objective": [3, 5],
        "constraints": [[1, 0], [0, 2], [3, 2]], "bounds": [4, 12, 18], "maximize": true}"#,
  );
  assert_eq!(trace.outcome, RunOutcome::Completed);
  let last = trace.optimization_steps().unwrap().last().unwrap();
  assert!((last.objective_value.unwrap() - 36.0).abs() < 1e-9);
  assert!((last.point[0] - 2.0).abs() < 1e-9 && (last.point[1] - 6.0).abs() < 1e-9);
}

#[test]
fn infeasible_flow_demand_is_an_outcome_not_an_error() {
  let trace = request(r#"{"algorithm": "min_cost_flow", "demand": 100}"#);
  assert_eq!(trace.outcome, RunOutcome::Infeasible);
  assert!(matches!(trace.ensure_solved(), Err(AlgoError::Infeasible(_))));
}

#[test]
fn max_flow_on_the_sample_graph() {
  let trace = request(r#"{"algorithm": "max_flow"}"#);
  let flow = trace.steps().unwrap().last().unwrap().flow.clone().unwrap();
  assert_eq!(flow.total_flow, 6.0);
  assert_eq!(flow.min_cut, Some(vec!["A".to_string()]));
}

#[test]
fn saved_runs_load_back() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("lcs.json");
  let trace = request(r#"{"algorithm": "lcs", "str1": "AGGTAB", "str2": "GXTXAYB"}"#);
  let now = chrono::Utc::now();
  save_trace(&path, &TraceDocument::new(trace.clone(), now, now)).unwrap();
  assert_eq!(load_trace(&path).unwrap().into_trace(), trace);
}

#[test]
fn sample_graph_serializes_as_nodes_and_edges() {
  let json = serde_json::to_value(Graph::sample()).unwrap();
  assert_eq!(json["nodes"].as_array().unwrap().len(), 6);
  assert_eq!(json["edges"].as_array().unwrap().len(), 18);
}

#[tokio::test]
async fn estimator_reports_one_sample_per_size() {
  let cfg = EngineConfig {
    benchmark: BenchmarkConfig {
      trials: 1,
      parallel: false,
      ..BenchmarkConfig::default()
    },
    ..EngineConfig::default()
  };
  let sizes = [10, 20, 40];
  let result = estimate_complexity(AlgorithmSelector::Bfs, &sizes, &cfg).await.unwrap();
  assert_eq!(result.input_sizes, sizes);
  assert_eq!(result.execution_times.len(), 3);
  // no tracking allocator in this test binary
  assert!(result.memory_usage.iter().all(|m| *m == 0));
}
