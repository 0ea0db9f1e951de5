//! Depth-first search.

use tracing::instrument;

use super::{Search, fresh_neighbors};
use crate::error::AlgoResult;
use crate::recorder::StepRecorder;
use crate::types::{Graph, NodeState, Step, Trace};

/// Depth-first search from `start`, stopping early when `end` is visited.
///
/// Neighbors are explored in stored edge order: they are pushed in reverse so the first stored
/// edge is popped first. A node's parent is the edge it was popped through.
#[instrument(level = "trace", skip(graph, recorder))]
pub fn dfs(
  graph: &Graph,
  start: &str,
  end: Option<&str>,
  mut recorder: StepRecorder<Step>,
) -> AlgoResult<Trace> {
  let mut run = Search::new(graph, start, end)?;
  let mut seen = vec![false; run.graph.node_count()];
  let mut stack: Vec<(usize, Option<usize>)> = vec![(run.start, None)];
  let mut reached = false;

  while let Some((u, via)) = stack.pop() {
    if seen[u] {
      continue;
    }
    seen[u] = true;
    run.parent[u] = via;
    run.visited.push(u);

    let next = fresh_neighbors(&run.graph, u, &seen);
    run.graph.node_mut(u).state = NodeState::Current;
    for &(v, _) in &next {
      run.graph.node_mut(v).state = NodeState::Next;
    }
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
    for &(v, e) in next.iter().rev() {
      stack.push((v, Some(e)));
    }
  }

  Ok(run.finish("dfs", recorder, reached, None))
}
