use crate::config::{ConstrainedConfig, ViolationPolicy};
use crate::optimization::constrained::aggregate;
use crate::optimization::{ConstraintKind, ConstraintSpec, Expr, Method, constrained};
use crate::recorder::StepRecorder;
use crate::types::{OptimizationKind, OptimizationStep, RunOutcome, Trace};

fn solve(constraints: &[ConstraintSpec], method: Method, cfg: &ConstrainedConfig) -> Trace {
  constrained(
    &Expr::sum_of_squares(2),
    constraints,
    &[2.0, 2.0],
    method,
    cfg,
    StepRecorder::new(),
  )
  .unwrap()
}

fn last(trace: &Trace) -> &OptimizationStep {
  trace.optimization_steps().unwrap().last().unwrap()
}

#[test]
fn penalty_method_on_an_equality() {
  let trace = solve(
    &[ConstraintSpec::eq("x[0] + x[1] - 1")],
    Method::Penalty,
    &ConstrainedConfig::default(),
  );
  assert_eq!(trace.outcome, RunOutcome::Converged);
  let steps = trace.optimization_steps().unwrap();
  assert_eq!(steps[0].iteration, 0);
  assert_eq!(steps[0].constraint_violation, Some(3.0));
  assert!(steps.iter().all(|s| s.kind == OptimizationKind::Constrained));
  for pair in steps.windows(2) {
    assert!(pair[0].iteration < pair[1].iteration);
  }
  let end = last(&trace);
  assert!(end.message.starts_with("Found optimal solution"));
  assert!((end.point[0] - 0.5).abs() < 1e-3);
  assert!((end.point[1] - 0.5).abs() < 1e-3);
  assert!((end.objective_value.unwrap() - 0.5).abs() < 1e-3);
}

#[test]
fn augmented_lagrangian_needs_fewer_iterations() {
  let constraints = [ConstraintSpec::eq("x[0] + x[1] - 1")];
  let cfg = ConstrainedConfig::default();
  let penalty = solve(&constraints, Method::Penalty, &cfg);
  let auglag = solve(&constraints, Method::AugmentedLagrangian, &cfg);
  assert_eq!(auglag.outcome, RunOutcome::Converged);
  let end = last(&auglag);
  assert!((end.point[0] - 0.5).abs() < 1e-4);
  assert!((end.point[1] - 0.5).abs() < 1e-4);
  assert!(auglag.len() < penalty.len());
}

#[test]
fn inequality_becomes_active() {
  let trace = solve(
    &[ConstraintSpec::ineq("x[0] - 1")],
    Method::Penalty,
    &ConstrainedConfig::default(),
  );
  assert_eq!(trace.outcome, RunOutcome::Converged);
  let end = last(&trace);
  assert!((end.point[0] - 1.0).abs() < 1e-3);
  assert!(end.point[1].abs() < 1e-3);
}

#[test]
fn inactive_inequality_leaves_the_unconstrained_minimum() {
  let trace = solve(
    &[ConstraintSpec::ineq("x[0] + 5")],
    Method::AugmentedLagrangian,
    &ConstrainedConfig::default(),
  );
  assert_eq!(trace.outcome, RunOutcome::Converged);
  let end = last(&trace);
  assert!(end.point.iter().all(|v| v.abs() < 1e-3));
  assert_eq!(end.constraint_violation, Some(0.0));
}

#[test]
fn iteration_cap_reports_failure() {
  let cfg = ConstrainedConfig {
    max_iterations: 1,
    ..ConstrainedConfig::default()
  };
  let trace = solve(&[ConstraintSpec::eq("x[0] + x[1] - 1")], Method::Penalty, &cfg);
  assert_eq!(trace.outcome, RunOutcome::IterationLimit);
  assert_eq!(trace.len(), 3);
  assert_eq!(
    trace.final_message().unwrap(),
    "Optimization failed to converge after 1 iterations"
  );
  let iterations: Vec<_> = trace.optimization_steps().unwrap().iter().map(|s| s.iteration).collect();
  assert_eq!(iterations, [0, 1, 2]);
}

#[test]
fn methods_parse_by_name() {
  assert_eq!("penalty".parse::<Method>().unwrap(), Method::Penalty);
  assert_eq!(
    "Augmented_Lagrangian".parse::<Method>().unwrap(),
    Method::AugmentedLagrangian
  );
  assert!("SLSQP".parse::<Method>().unwrap_err().is_invalid_input());
}

#[test]
fn constraint_expressions_are_checked_before_solving() {
  let cfg = ConstrainedConfig::default();
  let f = Expr::sum_of_squares(2);
  for bad in ["__import__('os')", "x[2] - 1", "x[0] +", ""] {
    let err = constrained(
      &f,
      &[ConstraintSpec::ineq(bad)],
      &[1.0, 1.0],
      Method::Penalty,
      &cfg,
      StepRecorder::new(),
    )
    .unwrap_err();
    assert!(err.is_invalid_input(), "{bad}");
  }
}

#[test]
fn constraint_specs_deserialize() {
  let specs: Vec<ConstraintSpec> =
    serde_json::from_str(r#"[{"type":"eq","expr":"x[0]"},{"type":"ineq","expr":"1 - x[1]"}]"#)
      .unwrap();
  assert_eq!(specs[0].kind, ConstraintKind::Eq);
  assert_eq!(specs[1], ConstraintSpec::ineq("1 - x[1]"));
}

#[test]
fn violation_policies() {
  assert_eq!(aggregate(ViolationPolicy::Max, [0.5, 2.0]), 2.0);
  assert_eq!(aggregate(ViolationPolicy::SumOfSquares, [0.5, 2.0]), 4.25);
  assert_eq!(aggregate(ViolationPolicy::Max, []), 0.0);
}
