//! One recorded snapshot of a graph or dynamic-programming run.
//!
//! A step owns value copies of everything it shows. The algorithm keeps mutating its own graph
//! or table afterwards; nothing here points back into that live state.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::{Edge, Graph, Node};

/// Which family/visualization produced a [Step].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
  /// Graph traversal and flow steps.
  Graph,
  Knapsack,
  Lcs,
  MatrixChain,
}

/// Best known distance per node id. Unreached nodes hold `f64::INFINITY`, which is written
/// as the string `"Infinity"` on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distances(pub BTreeMap<String, f64>);

impl Deref for Distances {
  type Target = BTreeMap<String, f64>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for Distances {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl Serialize for Distances {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (k, v) in &self.0 {
      if v.is_finite() {
        map.serialize_entry(k, v)?;
      } else {
        map.serialize_entry(k, "Infinity")?;
      }
    }
    map.end()
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DistanceRepr {
  Finite(f64),
  Named(String),
}

impl<'de> Deserialize<'de> for Distances {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = BTreeMap::<String, DistanceRepr>::deserialize(deserializer)?;
    let mut out = BTreeMap::new();
    for (k, v) in raw {
      let d = match v {
        DistanceRepr::Finite(f) => f,
        DistanceRepr::Named(s) if s == "Infinity" => f64::INFINITY,
        DistanceRepr::Named(s) => {
          return Err(de::Error::custom(format!("invalid distance '{s}'")));
        }
      };
      out.insert(k, d);
    }
    Ok(Distances(out))
  }
}

/// Dynamic-programming table contents at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DpTable {
  /// Table cells; `None` is a cell not yet computed. Knapsack values may be fractional, so
  /// every variant writes its cells as `f64`.
  pub cells: Vec<Vec<Option<f64>>>,
  /// `(row, col)` of the cell just computed or inspected.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cell: Option<(usize, usize)>,
  /// Matrix chain: split point chosen for `cell`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub split: Option<usize>,
  /// Knapsack: item indices selected so far during backtracking.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub selected: Vec<usize>,
  /// LCS: subsequence recovered so far.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub subsequence: Option<String>,
  /// Matrix chain: optimal parenthesization, set on the final step.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parenthesization: Option<String>,
}

/// Running totals of a flow computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
  pub total_flow: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total_cost: Option<f64>,
  /// Amount pushed along the augmenting path of this step.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub augmentation: Option<f64>,
  /// Source side of a minimum cut (final max-flow step).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_cut: Option<Vec<String>>,
}

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
  #[serde(rename = "type")]
  pub kind: StepKind,
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
  pub visited: Vec<String>,
  pub current: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub next: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub distances: Option<Distances>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub table: Option<DpTable>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub flow: Option<FlowState>,
  pub message: String,
}

impl Step {
  /// A `graph` step carrying a deep copy of `graph`'s nodes and edges.
  pub fn graph_snapshot(graph: &Graph, message: impl Into<String>) -> Self {
    Self {
      kind: StepKind::Graph,
      nodes: graph.nodes().to_vec(),
      edges: graph.edges().to_vec(),
      visited: Vec::new(),
      current: None,
      next: Vec::new(),
      distances: None,
      path: None,
      table: None,
      flow: None,
      message: message.into(),
    }
  }

  /// A table step for one of the dynamic-programming variants.
  pub fn table(kind: StepKind, table: DpTable, message: impl Into<String>) -> Self {
    Self {
      kind,
      nodes: Vec::new(),
      edges: Vec::new(),
      visited: Vec::new(),
      current: None,
      next: Vec::new(),
      distances: None,
      path: None,
      table: Some(table),
      flow: None,
      message: message.into(),
    }
  }

  pub fn with_visited(mut self, visited: Vec<String>) -> Self {
    self.visited = visited;
    self
  }

  pub fn with_current(mut self, current: Option<String>) -> Self {
    self.current = current;
    self
  }

  pub fn with_next(mut self, next: Vec<String>) -> Self {
    self.next = next;
    self
  }

  pub fn with_distances(mut self, distances: Distances) -> Self {
    self.distances = Some(distances);
    self
  }

  pub fn with_path(mut self, path: Vec<String>) -> Self {
    self.path = Some(path);
    self
  }

  pub fn with_flow(mut self, flow: FlowState) -> Self {
    self.flow = Some(flow);
    self
  }
}
