//! Constrained nonlinear minimization.
//!
//! Constraints are restricted expressions: `eq` means `expr(x) = 0`, `ineq` means
//! `expr(x) >= 0`. Each outer iteration minimizes a merit function (objective plus quadratic
//! penalty, or the augmented Lagrangian) by steepest descent with Armijo backtracking, then
//! grows the penalty and/or updates the multipliers. One step is recorded per outer iteration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

use super::{Expr, central_gradient, check_initial_point};
use crate::config::{ConstrainedConfig, ViolationPolicy};
use crate::error::{AlgoError, AlgoResult};
use crate::recorder::StepRecorder;
use crate::types::{OptimizationKind, OptimizationStep, RunOutcome, Trace};

/// Solver used by [constrained].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
  /// Quadratic penalty with a growing weight.
  #[default]
  Penalty,
  /// Quadratic penalty plus Lagrange multiplier estimates.
  AugmentedLagrangian,
}

impl FromStr for Method {
  type Err = AlgoError;

  fn from_str(s: &str) -> AlgoResult<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "penalty" => Ok(Method::Penalty),
      "augmented_lagrangian" | "auglag" => Ok(Method::AugmentedLagrangian),
      other => Err(AlgoError::invalid(format!(
        "unknown constrained method '{other}' (expected penalty or augmented_lagrangian)"
      ))),
    }
  }
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Method::Penalty => write!(f, "penalty"),
      Method::AugmentedLagrangian => write!(f, "augmented_lagrangian"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
  /// `expr(x) = 0`
  Eq,
  /// `expr(x) >= 0`
  Ineq,
}

/// A constraint as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
  #[serde(rename = "type")]
  pub kind: ConstraintKind,
  pub expr: String,
}

impl ConstraintSpec {
  pub fn eq(expr: impl Into<String>) -> Self {
    Self {
      kind: ConstraintKind::Eq,
      expr: expr.into(),
    }
  }

  pub fn ineq(expr: impl Into<String>) -> Self {
    Self {
      kind: ConstraintKind::Ineq,
      expr: expr.into(),
    }
  }
}

struct Constraint {
  kind: ConstraintKind,
  expr: Expr,
  multiplier: f64,
}

impl Constraint {
  fn violation(&self, x: &[f64]) -> f64 {
    let c = self.expr.eval(x);
    match self.kind {
      ConstraintKind::Eq => c.abs(),
      ConstraintKind::Ineq => (-c).max(0.0),
    }
  }
}

/// Folds per-constraint violations into one number.
pub(crate) fn aggregate(policy: ViolationPolicy, violations: impl IntoIterator<Item = f64>) -> f64 {
  let it = violations.into_iter();
  match policy {
    ViolationPolicy::Max => it.fold(0.0, f64::max),
    ViolationPolicy::SumOfSquares => it.map(|v| v * v).sum(),
  }
}

struct Problem<'a> {
  objective: &'a Expr,
  constraints: Vec<Constraint>,
  method: Method,
  penalty: f64,
}

impl Problem<'_> {
  fn merit(&self, x: &[f64]) -> f64 {
    let mu = self.penalty;
    let mut m = self.objective.eval(x);
    for c in &self.constraints {
      let v = c.expr.eval(x);
      let lambda = c.multiplier;
      m += match (self.method, c.kind) {
        (Method::Penalty, ConstraintKind::Eq) => 0.5 * mu * v * v,
        (Method::Penalty, ConstraintKind::Ineq) => {
          let short = v.min(0.0);
          0.5 * mu * short * short
        }
        (Method::AugmentedLagrangian, ConstraintKind::Eq) => lambda * v + 0.5 * mu * v * v,
        (Method::AugmentedLagrangian, ConstraintKind::Ineq) => {
          let s = (lambda - mu * v).max(0.0);
          (s * s - lambda * lambda) / (2.0 * mu)
        }
      };
    }
    m
  }

  fn violation(&self, x: &[f64], policy: ViolationPolicy) -> f64 {
    aggregate(policy, self.constraints.iter().map(|c| c.violation(x)))
  }

  fn update_multipliers(&mut self, x: &[f64]) {
    let mu = self.penalty;
    for c in &mut self.constraints {
      let v = c.expr.eval(x);
      c.multiplier = match c.kind {
        ConstraintKind::Eq => c.multiplier + mu * v,
        ConstraintKind::Ineq => (c.multiplier - mu * v).max(0.0),
      };
    }
  }

  fn grow_penalty(&mut self, cfg: &ConstrainedConfig) {
    let grown = (self.penalty * cfg.penalty_growth).min(cfg.max_penalty);
    if grown > self.penalty {
      debug!(from = self.penalty, to = grown, "penalty increased");
      self.penalty = grown;
    }
  }

  /// Steepest descent on the merit function with Armijo backtracking. Returns the number of
  /// accepted steps.
  fn descend(&self, x: &mut [f64], cfg: &ConstrainedConfig) -> usize {
    let mut accepted = 0;
    for _ in 0..cfg.inner_iterations {
      let m = self.merit(x);
      let g = central_gradient(|p| self.merit(p), x, cfg.diff_step);
      let gg: f64 = g.iter().map(|v| v * v).sum();
      if gg.sqrt() < cfg.tolerance {
        break;
      }
      let mut t = cfg.initial_step;
      let mut next = None;
      for _ in 0..cfg.line_search_max_steps {
        let trial: Vec<f64> = x.iter().zip(&g).map(|(xi, gi)| xi - t * gi).collect();
        let mt = self.merit(&trial);
        if mt.is_finite() && mt <= m - cfg.sufficient_decrease * t * gg {
          next = Some(trial);
          break;
        }
        t *= cfg.line_search_shrink;
      }
      let Some(next) = next else {
        break;
      };
      x.copy_from_slice(&next);
      accepted += 1;
    }
    accepted
  }
}

fn check(objective: &Expr, initial_point: &[f64], cfg: &ConstrainedConfig) -> AlgoResult<()> {
  check_initial_point(initial_point)?;
  if objective.dim() != initial_point.len() {
    return Err(AlgoError::invalid(format!(
      "objective expects {} coordinates, initial point has {}",
      objective.dim(),
      initial_point.len()
    )));
  }
  if !(cfg.penalty_weight.is_finite() && cfg.penalty_weight > 0.0) {
    return Err(AlgoError::invalid("penalty weight must be positive"));
  }
  if !(cfg.initial_step.is_finite() && cfg.initial_step > 0.0) {
    return Err(AlgoError::invalid("initial line-search step must be positive"));
  }
  if cfg.tolerance.is_nan() || cfg.tolerance < 0.0 {
    return Err(AlgoError::invalid("tolerance must be non-negative"));
  }
  Ok(())
}

/// Minimizes `objective` subject to `constraints` starting from `initial_point`.
///
/// Records iteration 0 at the starting point, one step per outer iteration (point, objective,
/// improvement, aggregated violation), and a terminal step stating whether a solution was
/// found. The run converges once the violation and the objective change both fall to
/// `cfg.tolerance`.
#[instrument(level = "trace", skip(objective, constraints, recorder), fields(objective = %objective))]
pub fn constrained(
  objective: &Expr,
  constraints: &[ConstraintSpec],
  initial_point: &[f64],
  method: Method,
  cfg: &ConstrainedConfig,
  mut recorder: StepRecorder<OptimizationStep>,
) -> AlgoResult<Trace> {
  check(objective, initial_point, cfg)?;
  let n = initial_point.len();
  let compiled = constraints
    .iter()
    .map(|c| -> AlgoResult<Constraint> {
      Ok(Constraint {
        kind: c.kind,
        expr: Expr::parse(&c.expr, n)?,
        multiplier: 0.0,
      })
    })
    .collect::<AlgoResult<Vec<_>>>()?;
  let mut problem = Problem {
    objective,
    constraints: compiled,
    method,
    penalty: cfg.penalty_weight,
  };

  let mut x = initial_point.to_vec();
  let mut value = objective.eval(&x);
  let mut violation = problem.violation(&x, cfg.violation);
  if !value.is_finite() || !violation.is_finite() {
    return Err(AlgoError::invalid(format!(
      "objective or constraints are not finite at the initial point {x:?}"
    )));
  }
  recorder.record_with(|| {
    OptimizationStep::new(
      OptimizationKind::Constrained,
      0,
      x.clone(),
      Some(value),
      format!("Initial point {x:?}"),
    )
    .with_violation(violation)
  });

  let mut outcome = RunOutcome::IterationLimit;
  let mut iteration = 0;
  for k in 1..=cfg.max_iterations {
    let inner = problem.descend(&mut x, cfg);
    let next = objective.eval(&x);
    let next_violation = problem.violation(&x, cfg.violation);
    if !next.is_finite() || !next_violation.is_finite() {
      warn!(iteration = k, "constrained solver left the finite region");
      break;
    }
    iteration = k;
    let improvement = value - next;
    let converged = next_violation <= cfg.tolerance && improvement.abs() <= cfg.tolerance;
    debug!(
      iteration,
      inner,
      value = next,
      violation = next_violation,
      penalty = problem.penalty,
      "outer iteration"
    );
    let penalty = problem.penalty;
    recorder.record_with(|| {
      OptimizationStep::new(
        OptimizationKind::Constrained,
        iteration,
        x.clone(),
        Some(next),
        format!("Iteration {iteration}: penalty {penalty}, violation {next_violation:.3e}"),
      )
      .with_improvement(improvement)
      .with_violation(next_violation)
    });
    value = next;
    if converged {
      outcome = RunOutcome::Converged;
      break;
    }

    match method {
      Method::Penalty => {
        if next_violation > cfg.tolerance {
          problem.grow_penalty(cfg);
        }
      }
      Method::AugmentedLagrangian => {
        problem.update_multipliers(&x);
        if next_violation > 0.25 * violation {
          problem.grow_penalty(cfg);
        }
      }
    }
    violation = next_violation;
  }

  let final_violation = problem.violation(&x, cfg.violation);
  let message = if outcome == RunOutcome::Converged {
    format!("Found optimal solution: {x:?}")
  } else {
    warn!(iteration, %method, "constrained optimization stopped without converging");
    format!("Optimization failed to converge after {iteration} iterations")
  };
  recorder.record_with(|| {
    OptimizationStep::new(
      OptimizationKind::Constrained,
      iteration + 1,
      x.clone(),
      Some(value),
      message,
    )
    .with_violation(final_violation)
  });
  info!(iteration, value, %method, %outcome, "constrained optimization finished");
  Ok(Trace::from_optimization(
    "constrained",
    outcome,
    recorder.finalize(),
  ))
}
