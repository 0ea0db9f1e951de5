//! The complete result of one algorithm run.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{OptimizationStep, Step};
use crate::error::{AlgoError, AlgoResult};

/// How a run ended. Every variant is a normal terminal outcome, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
  /// The algorithm ran to its natural end.
  Completed,
  /// An iterative method met its convergence criterion.
  Converged,
  /// An iteration cap stopped the run.
  IterationLimit,
  Infeasible,
  Unbounded,
}

impl fmt::Display for RunOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RunOutcome::Completed => write!(f, "completed"),
      RunOutcome::Converged => write!(f, "converged"),
      RunOutcome::IterationLimit => write!(f, "iteration_limit"),
      RunOutcome::Infeasible => write!(f, "infeasible"),
      RunOutcome::Unbounded => write!(f, "unbounded"),
    }
  }
}

/// The ordered step sequence of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceSteps {
  Steps(Vec<Step>),
  Optimization(Vec<OptimizationStep>),
}

/// Steps plus terminal outcome, owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
  pub algorithm: String,
  pub outcome: RunOutcome,
  pub steps: TraceSteps,
}

impl Trace {
  pub fn from_steps(algorithm: impl Into<String>, outcome: RunOutcome, steps: Vec<Step>) -> Self {
    Self {
      algorithm: algorithm.into(),
      outcome,
      steps: TraceSteps::Steps(steps),
    }
  }

  pub fn from_optimization(
    algorithm: impl Into<String>,
    outcome: RunOutcome,
    steps: Vec<OptimizationStep>,
  ) -> Self {
    Self {
      algorithm: algorithm.into(),
      outcome,
      steps: TraceSteps::Optimization(steps),
    }
  }

  pub fn len(&self) -> usize {
    match &self.steps {
      TraceSteps::Steps(s) => s.len(),
      TraceSteps::Optimization(s) => s.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Graph/table steps, if this is such a trace.
  pub fn steps(&self) -> Option<&[Step]> {
    match &self.steps {
      TraceSteps::Steps(s) => Some(s),
      TraceSteps::Optimization(_) => None,
    }
  }

  /// Optimization steps, if this is such a trace.
  pub fn optimization_steps(&self) -> Option<&[OptimizationStep]> {
    match &self.steps {
      TraceSteps::Steps(_) => None,
      TraceSteps::Optimization(s) => Some(s),
    }
  }

  /// Message of the last step.
  pub fn final_message(&self) -> Option<&str> {
    match &self.steps {
      TraceSteps::Steps(s) => s.last().map(|s| s.message.as_str()),
      TraceSteps::Optimization(s) => s.last().map(|s| s.message.as_str()),
    }
  }

  /// Turns an infeasible or unbounded outcome into the matching error.
  pub fn ensure_solved(self) -> AlgoResult<Self> {
    let msg = self.final_message().unwrap_or_default().to_string();
    match self.outcome {
      RunOutcome::Infeasible => Err(AlgoError::Infeasible(msg)),
      RunOutcome::Unbounded => Err(AlgoError::Unbounded(msg)),
      _ => Ok(self),
    }
  }
}
