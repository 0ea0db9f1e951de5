//! Dijkstra and A*: best-first search over non-negative edge weights.
//!
//! Both share one loop; A* adds a heuristic estimate to the queue priority. Each pop of a live
//! queue entry records one step with the full distance map. Distances improved while relaxing
//! the popped node's edges show up in the following step, listed in `next`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::Search;
use crate::error::{AlgoError, AlgoResult};
use crate::recorder::StepRecorder;
use crate::types::{Distances, Graph, Node, NodeState, Step, Trace};

/// A* distance estimate between a node and the target, from node `pos` coordinates.
///
/// Nodes without coordinates estimate 0, which keeps the search exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
  /// Straight-line distance.
  #[default]
  Euclidean,
  Manhattan,
  /// Always 0; A* degenerates to Dijkstra.
  Zero,
}

impl Heuristic {
  pub fn estimate(self, from: &Node, to: &Node) -> f64 {
    match (self, from.pos, to.pos) {
      (Heuristic::Euclidean, Some(a), Some(b)) => (a[0] - b[0]).hypot(a[1] - b[1]),
      (Heuristic::Manhattan, Some(a), Some(b)) => (a[0] - b[0]).abs() + (a[1] - b[1]).abs(),
      _ => 0.0,
    }
  }
}

/// Heap entry ordered so the smallest priority pops first; ties pop in insertion order.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
  priority: f64,
  seq: u64,
  node: usize,
  cost: f64,
}

impl Ord for QueueEntry {
  fn cmp(&self, other: &Self) -> Ordering {
    other
      .priority
      .total_cmp(&self.priority)
      .then_with(|| other.seq.cmp(&self.seq))
  }
}

impl PartialOrd for QueueEntry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for QueueEntry {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for QueueEntry {}

/// Dijkstra's algorithm from `start`. Without `end` it settles every reachable node.
#[instrument(level = "trace", skip(graph, recorder))]
pub fn dijkstra(
  graph: &Graph,
  start: &str,
  end: Option<&str>,
  recorder: StepRecorder<Step>,
) -> AlgoResult<Trace> {
  best_first("dijkstra", graph, start, end, None, recorder)
}

/// A* search from `start` to `end`, which is mandatory.
#[instrument(level = "trace", skip(graph, recorder))]
pub fn astar(
  graph: &Graph,
  start: &str,
  end: Option<&str>,
  heuristic: Heuristic,
  recorder: StepRecorder<Step>,
) -> AlgoResult<Trace> {
  let end = end.ok_or_else(|| AlgoError::invalid("A* requires an end node"))?;
  best_first("astar", graph, start, Some(end), Some(heuristic), recorder)
}

fn check_weights(graph: &Graph) -> AlgoResult<()> {
  for e in graph.edges() {
    let w = e.weight_or_unit();
    if w.is_nan() || w < 0.0 {
      return Err(AlgoError::invalid(format!(
        "edge {} -> {} has negative weight {}",
        e.source, e.target, w
      )));
    }
  }
  Ok(())
}

fn distance_map(graph: &Graph, dist: &[f64]) -> Distances {
  let mut d = Distances::default();
  for (i, &v) in dist.iter().enumerate() {
    d.insert(graph.id(i), v);
  }
  d
}

fn best_first(
  algorithm: &str,
  graph: &Graph,
  start: &str,
  end: Option<&str>,
  heuristic: Option<Heuristic>,
  mut recorder: StepRecorder<Step>,
) -> AlgoResult<Trace> {
  check_weights(graph)?;
  let mut run = Search::new(graph, start, end)?;
  let n = run.graph.node_count();
  let estimate: Vec<f64> = match (heuristic, run.target) {
    (Some(h), Some(t)) => (0..n)
      .map(|v| h.estimate(run.graph.node(v), run.graph.node(t)))
      .collect(),
    _ => vec![0.0; n],
  };

  let mut dist = vec![f64::INFINITY; n];
  let mut closed = vec![false; n];
  let mut heap = BinaryHeap::new();
  let mut seq = 0u64;
  dist[run.start] = 0.0;
  heap.push(QueueEntry {
    priority: estimate[run.start],
    seq,
    node: run.start,
    cost: 0.0,
  });
  let mut improved: Vec<usize> = Vec::new();
  let mut reached = false;

  while let Some(QueueEntry { node: u, cost, .. }) = heap.pop() {
    if closed[u] || cost > dist[u] {
      continue;
    }
    closed[u] = true;
    if !run.visited.contains(&u) {
      run.visited.push(u);
    }

    run.graph.node_mut(u).state = NodeState::Current;
    recorder.record_with(|| {
      run
        .snapshot(format!(
          "Visiting {} (distance {})",
          run.graph.node(u).id,
          dist[u]
        ))
        .with_current(Some(run.graph.id(u)))
        .with_next(run.ids(&improved))
        .with_distances(distance_map(&run.graph, &dist))
    });
    improved.clear();
    run.graph.node_mut(u).state = NodeState::Visited;

    if Some(u) == run.target {
      reached = true;
      break;
    }

    for i in 0..run.graph.outgoing(u).len() {
      let e = run.graph.outgoing(u)[i];
      let (_, v) = run.graph.endpoints(e);
      let candidate = dist[u] + run.graph.edge(e).weight_or_unit();
      if candidate < dist[v] {
        dist[v] = candidate;
        run.parent[v] = Some(e);
        // Reopen: an inconsistent heuristic may close a node before its best distance is known.
        closed[v] = false;
        seq += 1;
        heap.push(QueueEntry {
          priority: candidate + estimate[v],
          seq,
          node: v,
          cost: candidate,
        });
        run.graph.node_mut(v).state = NodeState::Next;
        if !improved.contains(&v) {
          improved.push(v);
        }
        debug!(node = %run.graph.node(v).id, distance = candidate, "relaxed");
      }
    }
  }

  let distances = distance_map(&run.graph, &dist);
  Ok(run.finish(algorithm, recorder, reached, Some(distances)))
}
