//! Residual network shared by max-flow and min-cost flow.
//!
//! Flow lives in the run's own graph copy (`Edge::flow`). Every edge `e` yields two residual
//! arcs: forward `(e, true)` with room `capacity - flow` and backward `(e, false)` with room
//! `flow`. Pushing along a backward arc cancels flow on `e`.

use std::collections::VecDeque;

use crate::error::{AlgoError, AlgoResult};
use crate::types::{EdgeState, FlowState, Graph, NodeState, Step};

/// Residual arc: edge index and direction.
pub(crate) type Arc = (usize, bool);

/// Residual room below this is treated as saturated.
pub(crate) const FLOW_EPS: f64 = 1e-12;

pub(crate) struct FlowNetwork {
  pub graph: Graph,
  capacity: Vec<f64>,
  cost: Vec<f64>,
  /// Residual arcs leaving each node: forward arcs of outgoing edges, then backward arcs of
  /// incoming edges, each in stored edge order.
  adj: Vec<Vec<Arc>>,
  pub source: usize,
  pub sink: usize,
}

impl FlowNetwork {
  /// Clones `graph` with all flows at zero.
  ///
  /// An edge's capacity is its `capacity`, else its `weight`; an edge with neither is rejected.
  /// Costs default to 1 per unit.
  pub fn new(graph: &Graph, source: &str, sink: &str) -> AlgoResult<Self> {
    let mut g = graph.clone();
    g.reset_states();
    let s = g.require(source)?;
    let t = g.require(sink)?;
    if s == t {
      return Err(AlgoError::invalid("source and sink must differ"));
    }

    let mut capacity = Vec::with_capacity(g.edge_count());
    let mut cost = Vec::with_capacity(g.edge_count());
    for e in 0..g.edge_count() {
      let edge = g.edge_mut(e);
      let cap = edge.capacity.or(edge.weight).ok_or_else(|| {
        AlgoError::invalid(format!(
          "edge {} -> {} has no capacity",
          edge.source, edge.target
        ))
      })?;
      if !cap.is_finite() || cap < 0.0 {
        return Err(AlgoError::invalid(format!(
          "edge {} -> {} has invalid capacity {cap}",
          edge.source, edge.target
        )));
      }
      let c = edge.cost.unwrap_or(1.0);
      if !c.is_finite() {
        return Err(AlgoError::invalid(format!(
          "edge {} -> {} has non-finite cost",
          edge.source, edge.target
        )));
      }
      edge.capacity = Some(cap);
      edge.flow = Some(0.0);
      capacity.push(cap);
      cost.push(c);
    }

    let mut adj = vec![Vec::new(); g.node_count()];
    for (u, arcs) in adj.iter_mut().enumerate() {
      arcs.extend(g.outgoing(u).iter().map(|&e| (e, true)));
      arcs.extend(g.incoming(u).iter().map(|&e| (e, false)));
    }

    Ok(Self {
      graph: g,
      capacity,
      cost,
      adj,
      source: s,
      sink: t,
    })
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn arcs(&self, node: usize) -> &[Arc] {
    &self.adj[node]
  }

  pub fn flow(&self, edge: usize) -> f64 {
    self.graph.edge(edge).flow.unwrap_or(0.0)
  }

  pub fn room(&self, (e, forward): Arc) -> f64 {
    if forward {
      self.capacity[e] - self.flow(e)
    } else {
      self.flow(e)
    }
  }

  pub fn arc_cost(&self, (e, forward): Arc) -> f64 {
    if forward { self.cost[e] } else { -self.cost[e] }
  }

  /// `(tail, head)` of a residual arc.
  pub fn ends(&self, (e, forward): Arc) -> (usize, usize) {
    let (s, t) = self.graph.endpoints(e);
    if forward { (s, t) } else { (t, s) }
  }

  pub fn augment(&mut self, path: &[Arc], amount: f64) {
    for &(e, forward) in path {
      let f = self.flow(e);
      self.graph.edge_mut(e).flow = Some(if forward { f + amount } else { f - amount });
    }
  }

  pub fn bottleneck(&self, path: &[Arc]) -> f64 {
    path
      .iter()
      .map(|&a| self.room(a))
      .fold(f64::INFINITY, f64::min)
  }

  /// Node ids along `path`, source first.
  pub fn path_ids(&self, path: &[Arc]) -> Vec<String> {
    let mut ids = Vec::with_capacity(path.len() + 1);
    if let Some(&first) = path.first() {
      ids.push(self.graph.id(self.ends(first).0));
    }
    ids.extend(path.iter().map(|&a| self.graph.id(self.ends(a).1)));
    ids
  }

  /// Arcs from the source to `node` following `parent`, or `None` if `node` was not reached.
  pub fn walk_back(&self, parent: &[Option<Arc>], node: usize) -> Option<Vec<Arc>> {
    let mut path = Vec::new();
    let mut cur = node;
    while cur != self.source {
      if path.len() >= self.node_count() {
        return None;
      }
      let arc = parent[cur]?;
      path.push(arc);
      cur = self.ends(arc).0;
    }
    path.reverse();
    Some(path)
  }

  /// Snapshot with `path` (if any) highlighted; states are cleared again afterwards.
  pub fn snapshot(&mut self, message: String, flow: FlowState, path: Option<&[Arc]>) -> Step {
    let Some(path) = path else {
      return Step::graph_snapshot(&self.graph, message).with_flow(flow);
    };
    let ids = self.path_ids(path);
    for &(e, _) in path {
      self.graph.edge_mut(e).state = EdgeState::Path;
      let (s, t) = self.graph.endpoints(e);
      self.graph.node_mut(s).state = NodeState::Path;
      self.graph.node_mut(t).state = NodeState::Path;
    }
    let step = Step::graph_snapshot(&self.graph, message)
      .with_flow(flow)
      .with_path(ids);
    self.graph.reset_states();
    step
  }

  /// Nodes reachable from the source through arcs with residual room, in index order.
  pub fn source_side(&self) -> Vec<usize> {
    let mut seen = vec![false; self.node_count()];
    seen[self.source] = true;
    let mut queue = VecDeque::from([self.source]);
    while let Some(u) = queue.pop_front() {
      for &a in self.arcs(u) {
        let (_, v) = self.ends(a);
        if !seen[v] && self.room(a) > FLOW_EPS {
          seen[v] = true;
          queue.push_back(v);
        }
      }
    }
    (0..seen.len()).filter(|&i| seen[i]).collect()
  }
}
