//! Fixed-step gradient descent with finite-difference gradients.

use tracing::{debug, info, instrument, warn};

use super::{Expr, central_gradient, check_initial_point, norm};
use crate::config::{ConvergencePolicy, GradientConfig};
use crate::error::{AlgoError, AlgoResult};
use crate::recorder::StepRecorder;
use crate::types::{OptimizationKind, OptimizationStep, RunOutcome, Trace};

fn check(objective: &Expr, initial_point: &[f64], cfg: &GradientConfig) -> AlgoResult<()> {
  check_initial_point(initial_point)?;
  if objective.dim() != initial_point.len() {
    return Err(AlgoError::invalid(format!(
      "objective expects {} coordinates, initial point has {}",
      objective.dim(),
      initial_point.len()
    )));
  }
  if !(cfg.learning_rate.is_finite() && cfg.learning_rate > 0.0) {
    return Err(AlgoError::invalid(format!(
      "learning rate must be positive, got {}",
      cfg.learning_rate
    )));
  }
  if cfg.tolerance.is_nan() || cfg.tolerance < 0.0 {
    return Err(AlgoError::invalid("tolerance must be non-negative"));
  }
  if !(cfg.diff_step.is_finite() && cfg.diff_step > 0.0) {
    return Err(AlgoError::invalid("finite-difference step must be positive"));
  }
  Ok(())
}

/// Minimizes `objective` from `initial_point` with `x ← x - learning_rate · ∇f(x)`.
///
/// Records the starting point as iteration 0, then one step per update carrying the gradient
/// at the new point and the objective decrease. Stops when `cfg.convergence` is met
/// ([RunOutcome::Converged]) or after `cfg.max_iterations` updates
/// ([RunOutcome::IterationLimit]).
#[instrument(level = "trace", skip(objective, recorder), fields(objective = %objective))]
pub fn gradient_descent(
  objective: &Expr,
  initial_point: &[f64],
  cfg: &GradientConfig,
  mut recorder: StepRecorder<OptimizationStep>,
) -> AlgoResult<Trace> {
  check(objective, initial_point, cfg)?;
  let mut x = initial_point.to_vec();
  let mut value = objective.eval(&x);
  if !value.is_finite() {
    return Err(AlgoError::invalid(format!(
      "objective is not finite at the initial point {x:?}"
    )));
  }
  let mut grad = central_gradient(|p| objective.eval(p), &x, cfg.diff_step);
  recorder.record_with(|| {
    OptimizationStep::new(
      OptimizationKind::Nonlinear,
      0,
      x.clone(),
      Some(value),
      format!("Initial point {x:?}"),
    )
    .with_gradient(grad.clone())
  });

  let mut outcome = RunOutcome::IterationLimit;
  let mut iterations = 0;
  for iteration in 1..=cfg.max_iterations {
    for (xi, gi) in x.iter_mut().zip(&grad) {
      *xi -= cfg.learning_rate * gi;
    }
    let next = objective.eval(&x);
    if !next.is_finite() {
      return Err(AlgoError::invalid(format!(
        "gradient descent diverged at iteration {iteration}; reduce the learning rate"
      )));
    }
    let improvement = value - next;
    value = next;
    grad = central_gradient(|p| objective.eval(p), &x, cfg.diff_step);
    iterations = iteration;

    let grad_norm = norm(&grad);
    let small_step = improvement.abs() < cfg.tolerance;
    let flat = grad_norm < cfg.tolerance;
    let converged = match cfg.convergence {
      ConvergencePolicy::Improvement => small_step,
      ConvergencePolicy::GradientNorm => flat,
      ConvergencePolicy::Either => small_step || flat,
    };
    debug!(iteration, value, improvement, grad_norm, "descent step");

    let message = if converged {
      format!("Converged at iteration {iteration}: f = {value:.6}")
    } else if iteration == cfg.max_iterations {
      format!("Reached {iteration} iterations: f = {value:.6}")
    } else {
      format!("Iteration {iteration}: f = {value:.6}")
    };
    recorder.record_with(|| {
      OptimizationStep::new(
        OptimizationKind::Nonlinear,
        iteration,
        x.clone(),
        Some(value),
        message,
      )
      .with_gradient(grad.clone())
      .with_improvement(improvement)
    });
    if converged {
      outcome = RunOutcome::Converged;
      break;
    }
  }

  if outcome == RunOutcome::IterationLimit {
    warn!(iterations, value, "gradient descent stopped at the iteration limit");
  }
  info!(iterations, value, %outcome, "gradient descent finished");
  Ok(Trace::from_optimization(
    "gradient_descent",
    outcome,
    recorder.finalize(),
  ))
}
