//! Predecessor-link path reconstruction shared by all traversal variants.

use crate::types::{EdgeState, Graph, NodeState};

/// A path as node indices (`start` first) and the edges joining them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
  pub nodes: Vec<usize>,
  pub edges: Vec<usize>,
}

/// Walks `parent` edge links back from `end` to `start`.
///
/// Returns `None` when `end` was never reached or the links do not lead back to `start`.
pub fn reconstruct_path(
  graph: &Graph,
  parent: &[Option<usize>],
  start: usize,
  end: usize,
) -> Option<Route> {
  let mut nodes = vec![end];
  let mut edges = Vec::new();
  let mut cur = end;
  while cur != start {
    // A simple path has fewer edges than nodes; anything longer is a cycle in the links.
    if edges.len() >= graph.node_count() {
      return None;
    }
    let e = parent[cur]?;
    let (s, _) = graph.endpoints(e);
    edges.push(e);
    nodes.push(s);
    cur = s;
  }
  nodes.reverse();
  edges.reverse();
  Some(Route { nodes, edges })
}

/// Marks every node and edge of `route` with the `path` state.
pub(crate) fn mark_path(graph: &mut Graph, route: &Route) {
  for &n in &route.nodes {
    graph.node_mut(n).state = NodeState::Path;
  }
  for &e in &route.edges {
    graph.edge_mut(e).state = EdgeState::Path;
  }
}
