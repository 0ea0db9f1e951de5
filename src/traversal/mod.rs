//! Graph traversal family: DFS, BFS, Dijkstra and A*.
//!
//! Every variant clones the caller's graph, drives node/edge state on that copy and records a
//! `graph` step per visited node. When `end` is reached the final step carries the path with
//! its nodes and edges marked `path`.

mod bfs;
mod dfs;
mod path;
mod shortest_path;

pub use bfs::bfs;
pub use dfs::dfs;
pub use path::{Route, reconstruct_path};
pub use shortest_path::{Heuristic, astar, dijkstra};

use crate::error::AlgoResult;
use crate::recorder::StepRecorder;
use crate::types::{Distances, Graph, RunOutcome, Step, Trace};

/// Mutable state of one traversal run.
pub(crate) struct Search {
  pub graph: Graph,
  /// Edge through which each node was (last) reached.
  pub parent: Vec<Option<usize>>,
  /// Visit order.
  pub visited: Vec<usize>,
  pub start: usize,
  pub target: Option<usize>,
}

impl Search {
  /// Clones `graph`, resets its states and resolves `start`/`end`.
  pub fn new(graph: &Graph, start: &str, end: Option<&str>) -> AlgoResult<Self> {
    let mut g = graph.clone();
    g.reset_states();
    let start = g.require(start)?;
    let target = end.map(|id| g.require(id)).transpose()?;
    let n = g.node_count();
    Ok(Self {
      graph: g,
      parent: vec![None; n],
      visited: Vec::new(),
      start,
      target,
    })
  }

  pub fn ids(&self, nodes: &[usize]) -> Vec<String> {
    nodes.iter().map(|&i| self.graph.id(i)).collect()
  }

  /// Snapshot of the live graph plus the visit order so far.
  pub fn snapshot(&self, message: impl Into<String>) -> Step {
    Step::graph_snapshot(&self.graph, message).with_visited(self.ids(&self.visited))
  }

  /// Records the terminal step and builds the trace.
  ///
  /// With a reached target the step marks the path; with an unreached target it reports that
  /// no path exists; without a target it summarizes the exploration.
  pub fn finish(
    mut self,
    algorithm: &str,
    mut recorder: StepRecorder<Step>,
    reached: bool,
    distances: Option<Distances>,
  ) -> Trace {
    let start_id = self.graph.id(self.start);
    let step = match self.target {
      Some(t) if reached => match path::reconstruct_path(&self.graph, &self.parent, self.start, t) {
        Some(route) => {
          path::mark_path(&mut self.graph, &route);
          let ids = self.ids(&route.nodes);
          let cost: f64 = route
            .edges
            .iter()
            .map(|&e| self.graph.edge(e).weight_or_unit())
            .sum();
          let msg = format!("Path found: {} (cost {})", ids.join(" -> "), cost);
          self.snapshot(msg).with_path(ids)
        }
        None => self.snapshot(format!(
          "No path from {} to {}",
          start_id,
          self.graph.id(t)
        )),
      },
      Some(t) => self.snapshot(format!(
        "No path from {} to {}",
        start_id,
        self.graph.id(t)
      )),
      None => self.snapshot(format!(
        "{} complete: visited {} of {} nodes",
        algorithm,
        self.visited.len(),
        self.graph.node_count()
      )),
    };
    let step = match distances {
      Some(d) => step.with_distances(d),
      None => step,
    };
    recorder.record(step);
    let steps = recorder.finalize();
    tracing::info!(algorithm, steps = steps.len(), reached, "traversal finished");
    Trace::from_steps(algorithm, RunOutcome::Completed, steps)
  }
}

/// Neighbors of `node` not yet `seen`, one entry per neighbor in stored edge order, paired with
/// the first edge reaching them.
pub(crate) fn fresh_neighbors(graph: &Graph, node: usize, seen: &[bool]) -> Vec<(usize, usize)> {
  let mut out: Vec<(usize, usize)> = Vec::new();
  for &e in graph.outgoing(node) {
    let (_, v) = graph.endpoints(e);
    if !seen[v] && !out.iter().any(|&(w, _)| w == v) {
      out.push((v, e));
    }
  }
  out
}
