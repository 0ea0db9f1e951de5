//! Breadth-first search.

use std::collections::VecDeque;

use tracing::instrument;

use super::{Search, fresh_neighbors};
use crate::error::AlgoResult;
use crate::recorder::StepRecorder;
use crate::types::{Graph, NodeState, Step, Trace};

/// Breadth-first search from `start`, stopping early when `end` is dequeued.
///
/// Nodes are marked seen on enqueue, so each is queued once and its parent is the first edge
/// that discovered it.
#[instrument(level = "trace", skip(graph, recorder))]
pub fn bfs(
  graph: &Graph,
  start: &str,
  end: Option<&str>,
  mut recorder: StepRecorder<Step>,
) -> AlgoResult<Trace> {
  let mut run = Search::new(graph, start, end)?;
  let mut seen = vec![false; run.graph.node_count()];
  let mut queue = VecDeque::from([run.start]);
  seen[run.start] = true;
  let mut reached = false;

  while let Some(u) = queue.pop_front() {
    run.visited.push(u);
    let next = fresh_neighbors(&run.graph, u, &seen);
    for &(v, e) in &next {
      seen[v] = true;
      run.parent[v] = Some(e);
      run.graph.node_mut(v).state = NodeState::Next;
      queue.push_back(v);
    }
    run.graph.node_mut(u).state = NodeState::Current;
    recorder.record_with(|| {
      let next_ids = next.iter().map(|&(v, _)| run.graph.id(v)).collect();
      run
        .snapshot(format!("Visiting {}", run.graph.node(u).id))
        .with_current(Some(run.graph.id(u)))
        .with_next(next_ids)
    });
    run.graph.node_mut(u).state = NodeState::Visited;

    if Some(u) == run.target {
      reached = true;
      break;
    }
  }

  Ok(run.finish("bfs", recorder, reached, None))
}
