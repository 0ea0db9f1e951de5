//! Tests for `Edge`.

use super::{Edge, EdgeState};

#[test]
fn weight_defaults_to_unit() {
  let e = Edge::new("A", "B");
  assert_eq!(e.weight_or_unit(), 1.0);
  let w = Edge::weighted("A", "B", 3.5);
  assert_eq!(w.weight_or_unit(), 3.5);
}

#[test]
fn residual_is_capacity_minus_flow() {
  let mut e = Edge::new("s", "t").with_capacity(10.0);
  assert_eq!(e.residual(), 10.0);
  e.flow = Some(4.0);
  assert_eq!(e.residual(), 6.0);
}

#[test]
fn deserialize_flow_edge() {
  let e: Edge = serde_json::from_str(r#"{"source":"s","target":"a","capacity":3,"cost":2}"#).unwrap();
  assert_eq!(e.capacity, Some(3.0));
  assert_eq!(e.cost, Some(2.0));
  assert_eq!(e.state, EdgeState::Normal);
}
