//! A vertex of the run graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visualization state of a node at one instant of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
  #[default]
  Unvisited,
  Visited,
  Current,
  Next,
  Path,
}

impl fmt::Display for NodeState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NodeState::Unvisited => write!(f, "unvisited"),
      NodeState::Visited => write!(f, "visited"),
      NodeState::Current => write!(f, "current"),
      NodeState::Next => write!(f, "next"),
      NodeState::Path => write!(f, "path"),
    }
  }
}

/// A vertex: caller-supplied id, optional payload and coordinates, and the state the
/// running algorithm assigns to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub value: Option<f64>,
  /// Layout coordinates; used by the A* straight-line heuristic.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pos: Option<[f64; 2]>,
  #[serde(default)]
  pub state: NodeState,
}

impl Node {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      value: None,
      pos: None,
      state: NodeState::Unvisited,
    }
  }

  pub fn with_pos(mut self, x: f64, y: f64) -> Self {
    self.pos = Some([x, y]);
    self
  }

  pub fn with_value(mut self, value: f64) -> Self {
    self.value = Some(value);
    self
  }
}
