use crate::config::EngineConfig;
use crate::dispatch::{AlgorithmRequest, GraphInput, catalogue, run};
use crate::types::{Edge, Node, RunOutcome};

fn run_json(json: &str) -> crate::types::Trace {
  let request = AlgorithmRequest::from_json(json).unwrap();
  run(&request, &EngineConfig::default()).unwrap()
}

#[test]
fn bare_requests_use_demo_inputs() {
  let trace = run_json(r#"{"algorithm": "dijkstra", "end": "F"}"#);
  assert_eq!(trace.algorithm, "dijkstra");
  assert_eq!(
    trace.final_message(),
    Some("Path found: A -> C -> B -> D -> E -> F (cost 13)")
  );

  let trace = run_json(r#"{"algorithm": "knapsack"}"#);
  assert!(trace.final_message().unwrap().starts_with("Optimal value 13"));

  let trace = run_json(r#"{"algorithm": "matrix_chain"}"#);
  assert_eq!(
    trace.final_message(),
    Some("Minimum cost 15125: ((A1(A2A3))((A4A5)A6))")
  );
}

#[test]
fn every_algorithm_runs_with_defaults() {
  for family in catalogue() {
    for name in family.algorithms {
      let json = match name {
        "astar" => r#"{"algorithm": "astar", "end": "F", "heuristic": "zero"}"#.to_string(),
        "simplex" => r#"{"algorithm": "simplex", "objective": [3, 5],
          "constraints": [[1, 0], [0, 2], [3, 2]], "bounds": [4, 12, 18], "maximize": true}"#
          .to_string(),
        "constrained" => r#"{"algorithm": "constrained",
          "constraints": [{"type": "eq", "expr": "x[0] + x[1] - 1"}]}"#
          .to_string(),
        other => format!(r#"{{"algorithm": "{other}"}}"#),
      };
      let trace = run_json(&json);
      assert_eq!(trace.algorithm, name);
      assert!(!trace.is_empty(), "{name} recorded nothing");
    }
  }
}

#[test]
fn flows_treat_request_edges_as_directed() {
  let request = AlgorithmRequest::from_json(
    r#"{"algorithm": "max_flow", "source": "s", "sink": "t",
        "nodes": [{"id": "s"}, {"id": "t"}],
        "edges": [{"source": "t", "target": "s", "capacity": 4}]}"#,
  )
  .unwrap();
  let trace = run(&request, &EngineConfig::default()).unwrap();
  let last = trace.steps().unwrap().last().unwrap();
  assert_eq!(last.flow.as_ref().unwrap().total_flow, 0.0);
}

#[test]
fn traversals_treat_request_edges_as_undirected() {
  let input = GraphInput {
    nodes: vec![Node::new("a"), Node::new("b")],
    edges: vec![Edge::new("b", "a")],
    directed: None,
  };
  assert_eq!(input.build(false).unwrap().edge_count(), 2);
  assert_eq!(input.build(true).unwrap().edge_count(), 1);
  let forced = GraphInput {
    directed: Some(true),
    ..input
  };
  assert_eq!(forced.build(false).unwrap().edge_count(), 1);
}

#[test]
fn traversal_requests_walk_edges_both_ways_unless_directed() {
  let reverse_only = |directed: &str| {
    run_json(&format!(
      r#"{{"algorithm": "bfs", "start": "a", "end": "b", {directed}
          "nodes": [{{"id": "a"}}, {{"id": "b"}}],
          "edges": [{{"source": "b", "target": "a"}}]}}"#
    ))
  };
  let path = |t: &crate::types::Trace| t.steps().unwrap().last().unwrap().path.clone();
  assert_eq!(path(&reverse_only("")), Some(vec!["a".to_string(), "b".to_string()]));
  assert_eq!(path(&reverse_only(r#""directed": true,"#)), None);
}

#[test]
fn overrides_reach_the_optimizer() {
  let trace = run_json(
    r#"{"algorithm": "gradient_descent", "initial_point": [1.0],
        "objective": "(x[0] - 3)^2", "learning_rate": 0.1, "max_iterations": 3}"#,
  );
  assert_eq!(trace.outcome, RunOutcome::IterationLimit);
  assert_eq!(trace.len(), 4);

  let trace = run_json(
    r#"{"algorithm": "constrained", "method": "augmented_lagrangian",
        "constraints": [{"type": "eq", "expr": "x[0] + x[1] - 1"}]}"#,
  );
  assert_eq!(trace.outcome, RunOutcome::Converged);
}

#[test]
fn wide_points_use_a_flat_default_objective() {
  let json = serde_json::json!({
    "algorithm": "gradient_descent",
    "initial_point": vec![1.0; 2_000],
    "max_iterations": 1,
  });
  let trace = run_json(&json.to_string());
  let last = trace.optimization_steps().unwrap().last().unwrap();
  assert_eq!(last.point.len(), 2_000);
  assert!(last.objective_value.unwrap() < 2_000.0);

  let json = serde_json::json!({
    "algorithm": "gradient_descent",
    "initial_point": vec![1.0; 100_000],
  });
  let request = AlgorithmRequest::from_json(&json.to_string()).unwrap();
  let err = run(&request, &EngineConfig::default()).unwrap_err();
  assert!(err.is_invalid_input());
  assert!(err.to_string().contains("10000"), "{err}");
}

#[test]
fn bad_requests_are_rejected() {
  assert!(AlgorithmRequest::from_json(r#"{"algorithm": "quicksort"}"#).is_err());
  assert!(AlgorithmRequest::from_json("not json").is_err());
  let bad = [
    r#"{"algorithm": "dfs", "start": "Z"}"#,
    r#"{"algorithm": "lcs", "str1": ""}"#,
    r#"{"algorithm": "constrained", "method": "newton"}"#,
    r#"{"algorithm": "gradient_descent", "objective": "x[5]"}"#,
  ];
  for json in bad {
    let request = AlgorithmRequest::from_json(json).unwrap();
    let err = run(&request, &EngineConfig::default()).unwrap_err();
    assert!(err.is_invalid_input(), "{json}: {err}");
  }
}

#[test]
fn catalogue_lists_three_families() {
  let families = catalogue();
  let names: Vec<_> = families.iter().map(|f| f.name).collect();
  assert_eq!(names, ["graph_traversal", "dynamic_programming", "optimization"]);
  let total: usize = families.iter().map(|f| f.algorithms.len()).sum();
  assert_eq!(total, 12);
  let optimization = &families[2];
  assert!(!optimization.benchmarkable.contains(&"constrained"));
  assert!(optimization.benchmarkable.contains(&"simplex"));
}
