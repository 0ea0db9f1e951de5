//! Tests for `Trace`.

use super::{OptimizationKind, OptimizationStep, RunOutcome, Trace};
use crate::error::AlgoError;

fn opt_step(msg: &str) -> OptimizationStep {
  OptimizationStep::new(OptimizationKind::Constrained, 0, vec![0.0], None, msg)
}

#[test]
fn ensure_solved_passes_completed() {
  let t = Trace::from_optimization("simplex", RunOutcome::Completed, vec![opt_step("ok")]);
  assert!(t.ensure_solved().is_ok());
}

#[test]
fn ensure_solved_maps_infeasible() {
  let t = Trace::from_optimization(
    "min_cost_flow",
    RunOutcome::Infeasible,
    vec![opt_step("Infeasible: demand too high")],
  );
  match t.ensure_solved() {
    Err(AlgoError::Infeasible(m)) => assert!(m.contains("demand")),
    other => panic!("expected infeasible, got {other:?}"),
  }
}

#[test]
fn ensure_solved_maps_unbounded() {
  let t = Trace::from_optimization("simplex", RunOutcome::Unbounded, vec![opt_step("Unbounded")]);
  assert!(matches!(t.ensure_solved(), Err(AlgoError::Unbounded(_))));
}

#[test]
fn accessors_match_variant() {
  let t = Trace::from_steps("dfs", RunOutcome::Completed, vec![]);
  assert!(t.is_empty());
  assert!(t.steps().is_some());
  assert!(t.optimization_steps().is_none());
  assert_eq!(t.final_message(), None);
}

#[test]
fn outcome_serializes_snake_case() {
  assert_eq!(
    serde_json::to_value(RunOutcome::IterationLimit).unwrap(),
    "iteration_limit"
  );
  assert_eq!(RunOutcome::Converged.to_string(), "converged");
}
