use proptest::prelude::*;

use crate::config::{ConvergencePolicy, GradientConfig};
use crate::optimization::{Expr, MAX_POINT_DIM, gradient_descent};
use crate::recorder::StepRecorder;
use crate::types::{OptimizationKind, RunOutcome};

fn cfg(learning_rate: f64, max_iterations: usize) -> GradientConfig {
  GradientConfig {
    learning_rate,
    max_iterations,
    ..GradientConfig::default()
  }
}

#[test]
fn sum_of_squares_converges_monotonically() {
  let trace = gradient_descent(
    &Expr::sum_of_squares(2),
    &[2.0, 2.0],
    &cfg(0.1, 100),
    StepRecorder::new(),
  )
  .unwrap();
  assert_eq!(trace.outcome, RunOutcome::Converged);
  let steps = trace.optimization_steps().unwrap();
  assert_eq!(steps[0].iteration, 0);
  assert_eq!(steps[0].objective_value, Some(8.0));
  assert!(steps[0].improvement.is_none());
  assert!(steps.len() < 100);
  for (i, s) in steps.iter().enumerate() {
    assert_eq!(s.iteration, i);
    assert_eq!(s.kind, OptimizationKind::Nonlinear);
    assert!(s.gradient.is_some());
  }
  for s in &steps[1..] {
    assert!(s.improvement.unwrap() > 0.0);
  }
  let last = steps.last().unwrap();
  assert!(last.point.iter().all(|v| v.abs() < 1e-2));
  assert!(last.message.starts_with("Converged"));
}

#[test]
fn first_update_follows_the_gradient() {
  let trace = gradient_descent(
    &Expr::sum_of_squares(2),
    &[2.0, 2.0],
    &cfg(0.1, 1),
    StepRecorder::new(),
  )
  .unwrap();
  let steps = trace.optimization_steps().unwrap();
  let g0 = steps[0].gradient.as_ref().unwrap();
  assert!((g0[0] - 4.0).abs() < 1e-6);
  assert!((steps[1].point[0] - 1.6).abs() < 1e-6);
  assert!((steps[1].improvement.unwrap() - (8.0 - 5.12)).abs() < 1e-6);
}

#[test]
fn custom_objective_finds_its_minimum() {
  let f = Expr::parse("(x[0] - 3)^2 + 2 * (x[1] + 1)^2", 2).unwrap();
  let trace = gradient_descent(&f, &[0.0, 0.0], &cfg(0.1, 500), StepRecorder::new()).unwrap();
  assert_eq!(trace.outcome, RunOutcome::Converged);
  let last = trace.optimization_steps().unwrap().last().unwrap();
  assert!((last.point[0] - 3.0).abs() < 1e-2);
  assert!((last.point[1] + 1.0).abs() < 1e-2);
}

#[test]
fn iteration_cap_is_a_normal_outcome() {
  let trace = gradient_descent(
    &Expr::sum_of_squares(2),
    &[2.0, 2.0],
    &cfg(0.01, 5),
    StepRecorder::new(),
  )
  .unwrap();
  assert_eq!(trace.outcome, RunOutcome::IterationLimit);
  assert_eq!(trace.len(), 6);
  assert!(trace.final_message().unwrap().starts_with("Reached 5 iterations"));
}

#[test]
fn gradient_norm_policy() {
  let c = GradientConfig {
    convergence: ConvergencePolicy::GradientNorm,
    tolerance: 1e-3,
    ..cfg(0.1, 1000)
  };
  let trace =
    gradient_descent(&Expr::sum_of_squares(1), &[1.0], &c, StepRecorder::new()).unwrap();
  assert_eq!(trace.outcome, RunOutcome::Converged);
  let last = trace.optimization_steps().unwrap().last().unwrap();
  assert!(last.gradient.as_ref().unwrap()[0].abs() < 1e-3);
}

#[test]
fn rejects_bad_inputs() {
  let f = Expr::sum_of_squares(2);
  let r = StepRecorder::new;
  assert!(gradient_descent(&f, &[1.0, 1.0], &cfg(0.0, 10), r()).unwrap_err().is_invalid_input());
  assert!(gradient_descent(&f, &[1.0, 1.0], &cfg(-0.1, 10), r()).unwrap_err().is_invalid_input());
  assert!(gradient_descent(&f, &[1.0], &cfg(0.1, 10), r()).unwrap_err().is_invalid_input());
  assert!(gradient_descent(&f, &[], &cfg(0.1, 10), r()).unwrap_err().is_invalid_input());
  let wide = Expr::sum_of_squares(MAX_POINT_DIM + 1);
  let start = vec![1.0; MAX_POINT_DIM + 1];
  assert!(gradient_descent(&wide, &start, &cfg(0.1, 1), r()).unwrap_err().is_invalid_input());
  let ln = Expr::parse("ln(x[0])", 1).unwrap();
  assert!(gradient_descent(&ln, &[-1.0], &cfg(0.1, 10), r()).unwrap_err().is_invalid_input());
}

#[test]
fn disabled_recorder_keeps_the_outcome() {
  let trace = gradient_descent(
    &Expr::sum_of_squares(3),
    &[1.0, -2.0, 0.5],
    &cfg(0.1, 100),
    StepRecorder::disabled(),
  )
  .unwrap();
  assert!(trace.is_empty());
  assert_eq!(trace.outcome, RunOutcome::Converged);
}

proptest! {
  #[test]
  fn convex_quadratic_never_increases(
    start in prop::collection::vec(-10.0f64..10.0, 1..4),
    lr in 0.01f64..0.4,
  ) {
    let f = Expr::sum_of_squares(start.len());
    let trace = gradient_descent(&f, &start, &cfg(lr, 1000), StepRecorder::new()).unwrap();
    let steps = trace.optimization_steps().unwrap();
    prop_assert!(steps.len() <= 1001);
    for s in &steps[1..] {
      prop_assert!(s.improvement.unwrap() >= -1e-12);
    }
  }
}
