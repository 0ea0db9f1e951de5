//! A directed edge of the run graph.

use serde::{Deserialize, Serialize};

/// Visualization state of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeState {
  #[default]
  Normal,
  Path,
}

/// A directed edge. Only the payload fields relevant to the running family are set:
/// `weight` for traversal, `capacity`/`flow` for flow problems, `cost` for min-cost flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
  pub source: String,
  pub target: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub weight: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub capacity: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub flow: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cost: Option<f64>,
  #[serde(default)]
  pub state: EdgeState,
}

impl Edge {
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      target: target.into(),
      weight: None,
      capacity: None,
      flow: None,
      cost: None,
      state: EdgeState::Normal,
    }
  }

  pub fn weighted(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
    Self {
      weight: Some(weight),
      ..Self::new(source, target)
    }
  }

  pub fn with_capacity(mut self, capacity: f64) -> Self {
    self.capacity = Some(capacity);
    self
  }

  pub fn with_cost(mut self, cost: f64) -> Self {
    self.cost = Some(cost);
    self
  }

  /// Traversal weight; edges without one count as 1.
  pub fn weight_or_unit(&self) -> f64 {
    self.weight.unwrap_or(1.0)
  }

  /// Remaining forward capacity (`capacity - flow`).
  pub fn residual(&self) -> f64 {
    self.capacity.unwrap_or(0.0) - self.flow.unwrap_or(0.0)
  }
}
