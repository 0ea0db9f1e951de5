//! One recorded snapshot of an iterative numeric optimization.

use serde::{Deserialize, Serialize};

/// Which optimization visualization produced an [OptimizationStep].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationKind {
  /// Simplex pivots and constrained-solver iterates.
  Constrained,
  /// Unconstrained gradient descent.
  Nonlinear,
}

/// One iterate of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationStep {
  #[serde(rename = "type")]
  pub kind: OptimizationKind,
  pub point: Vec<f64>,
  /// Objective at `point`; `None` on terminal steps of infeasible or unbounded problems.
  pub objective_value: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gradient: Option<Vec<f64>>,
  /// Starts at 0 and never decreases.
  pub iteration: usize,
  /// Objective decrease relative to the previous step (positive when the objective fell).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub improvement: Option<f64>,
  /// Aggregated constraint violation at `point`, for constrained runs.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub constraint_violation: Option<f64>,
  pub message: String,
}

impl OptimizationStep {
  pub fn new(
    kind: OptimizationKind,
    iteration: usize,
    point: Vec<f64>,
    objective_value: Option<f64>,
    message: impl Into<String>,
  ) -> Self {
    Self {
      kind,
      point,
      objective_value,
      gradient: None,
      iteration,
      improvement: None,
      constraint_violation: None,
      message: message.into(),
    }
  }

  pub fn with_gradient(mut self, gradient: Vec<f64>) -> Self {
    self.gradient = Some(gradient);
    self
  }

  pub fn with_improvement(mut self, improvement: f64) -> Self {
    self.improvement = Some(improvement);
    self
  }

  pub fn with_violation(mut self, violation: f64) -> Self {
    self.constraint_violation = Some(violation);
    self
  }
}
