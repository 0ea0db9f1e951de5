//! Arena-style graph shared by the graph-based families.
//!
//! Nodes and edges live in two vectors and refer to each other by index. A run takes its own
//! clone, mutates node/edge state and flow in place, and records value snapshots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Edge, EdgeState, Node, NodeState};
use crate::error::{AlgoError, AlgoResult};

/// Wire form of a graph: the `{nodes, edges}` pair callers send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSpec {
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

/// Validated graph with index lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphSpec", into = "GraphSpec")]
pub struct Graph {
  nodes: Vec<Node>,
  edges: Vec<Edge>,
  index: HashMap<String, usize>,
  /// `(source, target)` node indices per edge.
  endpoints: Vec<(usize, usize)>,
  /// Outgoing edge indices per node, in stored edge order.
  outgoing: Vec<Vec<usize>>,
  /// Incoming edge indices per node, in stored edge order.
  incoming: Vec<Vec<usize>>,
}

impl Graph {
  /// Builds a graph, rejecting duplicate node ids and edges with unknown endpoints.
  pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> AlgoResult<Self> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, n) in nodes.iter().enumerate() {
      if n.id.is_empty() {
        return Err(AlgoError::invalid("node id must not be empty"));
      }
      if index.insert(n.id.clone(), i).is_some() {
        return Err(AlgoError::invalid(format!("duplicate node id '{}'", n.id)));
      }
    }

    let mut endpoints = Vec::with_capacity(edges.len());
    let mut outgoing = vec![Vec::new(); nodes.len()];
    let mut incoming = vec![Vec::new(); nodes.len()];
    for (e, edge) in edges.iter().enumerate() {
      let s = *index.get(&edge.source).ok_or_else(|| {
        AlgoError::invalid(format!("edge source '{}' is not a node", edge.source))
      })?;
      let t = *index.get(&edge.target).ok_or_else(|| {
        AlgoError::invalid(format!("edge target '{}' is not a node", edge.target))
      })?;
      endpoints.push((s, t));
      outgoing[s].push(e);
      incoming[t].push(e);
    }

    Ok(Self {
      nodes,
      edges,
      index,
      endpoints,
      outgoing,
      incoming,
    })
  }

  /// Builds a graph where every edge is traversable both ways (stored as two directed edges).
  pub fn undirected(nodes: Vec<Node>, edges: Vec<Edge>) -> AlgoResult<Self> {
    let mut directed = Vec::with_capacity(edges.len() * 2);
    for e in edges {
      let mut back = e.clone();
      std::mem::swap(&mut back.source, &mut back.target);
      directed.push(e);
      directed.push(back);
    }
    Self::new(nodes, directed)
  }

  /// The built-in demo graph: six nodes `A..F` joined by nine weighted undirected edges.
  pub fn sample() -> Self {
    let nodes = ["A", "B", "C", "D", "E", "F"].into_iter().map(Node::new).collect();
    let edges = [
      ("A", "B", 4.0),
      ("A", "C", 2.0),
      ("B", "C", 1.0),
      ("B", "D", 5.0),
      ("C", "D", 8.0),
      ("C", "E", 10.0),
      ("D", "E", 2.0),
      ("D", "F", 6.0),
      ("E", "F", 3.0),
    ]
    .into_iter()
    .map(|(s, t, w)| Edge::weighted(s, t, w))
    .collect();
    // Ids are fixed and distinct, so construction cannot fail.
    Self::undirected(nodes, edges).unwrap_or_default()
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub fn node(&self, idx: usize) -> &Node {
    &self.nodes[idx]
  }

  pub fn edge(&self, idx: usize) -> &Edge {
    &self.edges[idx]
  }

  pub(crate) fn node_mut(&mut self, idx: usize) -> &mut Node {
    &mut self.nodes[idx]
  }

  pub(crate) fn edge_mut(&mut self, idx: usize) -> &mut Edge {
    &mut self.edges[idx]
  }

  pub fn index_of(&self, id: &str) -> Option<usize> {
    self.index.get(id).copied()
  }

  /// Like [Graph::index_of] but reports unknown ids as invalid input.
  pub fn require(&self, id: &str) -> AlgoResult<usize> {
    self
      .index_of(id)
      .ok_or_else(|| AlgoError::invalid(format!("unknown node id '{id}'")))
  }

  pub fn endpoints(&self, edge: usize) -> (usize, usize) {
    self.endpoints[edge]
  }

  /// Outgoing edge indices of `node`, in stored order.
  pub fn outgoing(&self, node: usize) -> &[usize] {
    &self.outgoing[node]
  }

  /// Incoming edge indices of `node`, in stored order.
  pub fn incoming(&self, node: usize) -> &[usize] {
    &self.incoming[node]
  }

  /// Puts every node back to `unvisited` and every edge to `normal`.
  pub fn reset_states(&mut self) {
    for n in &mut self.nodes {
      n.state = NodeState::Unvisited;
    }
    for e in &mut self.edges {
      e.state = EdgeState::Normal;
    }
  }

  /// Id of the node at `idx`, owned.
  pub fn id(&self, idx: usize) -> String {
    self.nodes[idx].id.clone()
  }
}

impl TryFrom<GraphSpec> for Graph {
  type Error = AlgoError;

  fn try_from(spec: GraphSpec) -> Result<Self, Self::Error> {
    Graph::new(spec.nodes, spec.edges)
  }
}

impl From<Graph> for GraphSpec {
  fn from(g: Graph) -> Self {
    GraphSpec {
      nodes: g.nodes,
      edges: g.edges,
    }
  }
}
