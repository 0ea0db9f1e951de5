//! Tests for `Step` and its payloads.

use std::collections::BTreeMap;

use super::{Distances, DpTable, Graph, Step, StepKind};

#[test]
fn infinite_distance_serializes_as_string() {
  let mut d = BTreeMap::new();
  d.insert("A".to_string(), 0.0);
  d.insert("B".to_string(), f64::INFINITY);
  let v = serde_json::to_value(Distances(d)).unwrap();
  assert_eq!(v["A"], 0.0);
  assert_eq!(v["B"], "Infinity");
}

#[test]
fn distances_roundtrip() {
  let d: Distances = serde_json::from_str(r#"{"A":1.5,"B":"Infinity"}"#).unwrap();
  assert_eq!(d.get("A").copied(), Some(1.5));
  assert_eq!(d.get("B").copied(), Some(f64::INFINITY));
  assert!(serde_json::from_str::<Distances>(r#"{"A":"far"}"#).is_err());
}

#[test]
fn graph_snapshot_copies_nodes_and_edges() {
  let g = Graph::sample();
  let s = Step::graph_snapshot(&g, "start")
    .with_current(Some("A".to_string()))
    .with_visited(vec!["A".to_string()]);
  assert_eq!(s.kind, StepKind::Graph);
  assert_eq!(s.nodes.len(), 6);
  assert_eq!(s.edges.len(), 18);
  assert_eq!(s.current.as_deref(), Some("A"));
}

#[test]
fn table_step_serializes_type_and_cell() {
  let table = DpTable {
    cells: vec![vec![Some(0.0), None]],
    cell: Some((0, 1)),
    ..DpTable::default()
  };
  let s = Step::table(StepKind::MatrixChain, table, "m");
  let v = serde_json::to_value(&s).unwrap();
  assert_eq!(v["type"], "matrix_chain");
  assert_eq!(v["table"]["cell"], serde_json::json!([0, 1]));
  assert_eq!(v["table"]["cells"], serde_json::json!([[0.0, null]]));
  assert!(v.get("distances").is_none());
}

#[test]
fn steps_compare_by_value() {
  let g = Graph::sample();
  let a = Step::graph_snapshot(&g, "x");
  let b = Step::graph_snapshot(&g, "x");
  assert_eq!(a, b);
  assert_ne!(a, b.with_next(vec!["B".to_string()]));
}
