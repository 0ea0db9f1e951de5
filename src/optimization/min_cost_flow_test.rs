use crate::error::AlgoError;
use crate::optimization::min_cost_flow;
use crate::recorder::StepRecorder;
use crate::types::{Edge, Graph, Node, RunOutcome, Step};

fn summary(steps: &[Step]) -> (f64, f64) {
  let flow = steps.last().unwrap().flow.as_ref().unwrap();
  (flow.total_flow, flow.total_cost.unwrap())
}

fn three_nodes() -> Graph {
  Graph::new(
    vec![Node::new("s"), Node::new("a"), Node::new("t")],
    vec![
      Edge::new("s", "a").with_capacity(1.0).with_cost(1.0),
      Edge::new("a", "t").with_capacity(1.0).with_cost(1.0),
      Edge::new("s", "t").with_capacity(1.0).with_cost(5.0),
    ],
  )
  .unwrap()
}

#[test]
fn cheapest_paths_are_used_first() {
  let trace = min_cost_flow(&three_nodes(), "s", "t", Some(2.0), 100, StepRecorder::new()).unwrap();
  assert_eq!(trace.outcome, RunOutcome::Completed);
  let steps = trace.steps().unwrap();
  assert_eq!(summary(steps), (2.0, 7.0));
  assert_eq!(steps[1].path.as_ref().unwrap(), &vec!["s", "a", "t"]);
  assert_eq!(steps[2].path.as_ref().unwrap(), &vec!["s", "t"]);
  assert_eq!(steps[1].message, "Path s -> a -> t (unit cost 2) carries 1");
  assert_eq!(trace.final_message().unwrap(), "Minimum cost flow: cost 7, flow 2");
}

#[test]
fn demand_caps_the_last_augmentation() {
  let trace = min_cost_flow(&Graph::sample(), "A", "F", Some(5.0), 100, StepRecorder::new()).unwrap();
  assert_eq!(summary(trace.steps().unwrap()), (5.0, 15.0));
}

#[test]
fn without_demand_routes_the_maximum_flow() {
  let trace = min_cost_flow(&Graph::sample(), "A", "F", None, 100, StepRecorder::new()).unwrap();
  assert_eq!(summary(trace.steps().unwrap()), (6.0, 18.0));
}

#[test]
fn unmet_demand_is_infeasible() {
  let trace = min_cost_flow(&Graph::sample(), "A", "F", Some(7.0), 100, StepRecorder::new()).unwrap();
  assert_eq!(trace.outcome, RunOutcome::Infeasible);
  assert_eq!(
    trace.final_message().unwrap(),
    "Infeasible: only 6 of demand 7 can be routed"
  );
  assert!(matches!(trace.ensure_solved(), Err(AlgoError::Infeasible(_))));
}

#[test]
fn zero_demand_records_start_and_finish() {
  let trace = min_cost_flow(&three_nodes(), "s", "t", Some(0.0), 100, StepRecorder::new()).unwrap();
  assert_eq!(trace.len(), 2);
  assert_eq!(summary(trace.steps().unwrap()), (0.0, 0.0));
}

#[test]
fn rejects_negative_demand_and_cycles() {
  let err = min_cost_flow(&three_nodes(), "s", "t", Some(-1.0), 100, StepRecorder::new());
  assert!(err.unwrap_err().is_invalid_input());

  let g = Graph::new(
    vec![Node::new("s"), Node::new("a"), Node::new("b"), Node::new("t")],
    vec![
      Edge::new("s", "a").with_capacity(1.0),
      Edge::new("a", "b").with_capacity(1.0).with_cost(-2.0),
      Edge::new("b", "a").with_capacity(1.0).with_cost(1.0),
      Edge::new("b", "t").with_capacity(1.0),
    ],
  )
  .unwrap();
  let err = min_cost_flow(&g, "s", "t", None, 100, StepRecorder::new()).unwrap_err();
  assert!(err.to_string().contains("negative-cost cycle"));
}

#[test]
fn disabled_recorder_still_solves() {
  let trace = min_cost_flow(&three_nodes(), "s", "t", Some(2.0), 100, StepRecorder::disabled()).unwrap();
  assert!(trace.is_empty());
  assert_eq!(trace.outcome, RunOutcome::Completed);
}
