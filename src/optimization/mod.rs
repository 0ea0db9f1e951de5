//! Optimization and flow family: simplex, max flow, min-cost flow, gradient descent and
//! constrained nonlinear optimization.
//!
//! Simplex and the nonlinear methods record [crate::types::OptimizationStep]s; the flow
//! algorithms record `graph` steps carrying a [crate::types::FlowState].

mod constrained;
#[cfg(test)]
mod constrained_test;
mod expr;
mod flow;
mod gradient_descent;
#[cfg(test)]
mod gradient_descent_test;
mod max_flow;
mod min_cost_flow;
#[cfg(test)]
mod min_cost_flow_test;
mod simplex;

pub use constrained::{ConstraintKind, ConstraintSpec, Method, constrained};
pub use expr::{Expr, MAX_DEPTH, MAX_SOURCE_LEN};
pub use gradient_descent::gradient_descent;
pub use max_flow::max_flow;
pub use min_cost_flow::min_cost_flow;
pub use simplex::{LinearProgram, Relation, simplex};

use crate::error::{AlgoError, AlgoResult};

/// Largest accepted starting point. Numeric gradients cost two objective evaluations per
/// coordinate, so each iteration is quadratic in the dimension.
pub const MAX_POINT_DIM: usize = 10_000;

/// Central-difference gradient of `f` at `x`; the step for coordinate `j` is
/// `diff_step * max(1, |x_j|)`.
pub(crate) fn central_gradient(f: impl Fn(&[f64]) -> f64, x: &[f64], diff_step: f64) -> Vec<f64> {
  let mut probe = x.to_vec();
  (0..x.len())
    .map(|j| {
      let h = diff_step * x[j].abs().max(1.0);
      probe[j] = x[j] + h;
      let up = f(&probe);
      probe[j] = x[j] - h;
      let down = f(&probe);
      probe[j] = x[j];
      (up - down) / (2.0 * h)
    })
    .collect()
}

pub(crate) fn norm(v: &[f64]) -> f64 {
  v.iter().map(|g| g * g).sum::<f64>().sqrt()
}

/// Rejects empty, oversized or non-finite starting points.
pub(crate) fn check_initial_point(point: &[f64]) -> AlgoResult<()> {
  if point.is_empty() {
    return Err(AlgoError::invalid("initial point must not be empty"));
  }
  if point.len() > MAX_POINT_DIM {
    return Err(AlgoError::invalid(format!(
      "initial point has {} coordinates, more than the limit of {MAX_POINT_DIM}",
      point.len()
    )));
  }
  if let Some(v) = point.iter().find(|v| !v.is_finite()) {
    return Err(AlgoError::invalid(format!(
      "initial point must be finite, got {v}"
    )));
  }
  Ok(())
}
