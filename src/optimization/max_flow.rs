//! Maximum flow by Edmonds–Karp (shortest augmenting paths).

use std::collections::VecDeque;

use tracing::{debug, info, instrument, warn};

use super::flow::{Arc, FLOW_EPS, FlowNetwork};
use crate::error::AlgoResult;
use crate::recorder::StepRecorder;
use crate::types::{FlowState, Graph, NodeState, RunOutcome, Step, Trace};

/// Fewest-arc augmenting path by BFS over residual arcs in stored order.
pub(crate) fn bfs_path(net: &FlowNetwork) -> Option<Vec<Arc>> {
  let n = net.node_count();
  let mut parent: Vec<Option<Arc>> = vec![None; n];
  let mut seen = vec![false; n];
  seen[net.source] = true;
  let mut queue = VecDeque::from([net.source]);
  while let Some(u) = queue.pop_front() {
    for &a in net.arcs(u) {
      let (_, v) = net.ends(a);
      if seen[v] || net.room(a) <= FLOW_EPS {
        continue;
      }
      seen[v] = true;
      parent[v] = Some(a);
      if v == net.sink {
        return net.walk_back(&parent, v);
      }
      queue.push_back(v);
    }
  }
  None
}

/// Pushes flow from `source` to `sink` along shortest residual paths until none is left.
///
/// Records a starting step, one step per augmentation (path marked, flows updated) and a final
/// step whose `min_cut` lists the source side of a minimum cut. Capacities fall back to edge
/// weights.
#[instrument(level = "trace", skip(graph, recorder))]
pub fn max_flow(
  graph: &Graph,
  source: &str,
  sink: &str,
  max_augmentations: usize,
  mut recorder: StepRecorder<Step>,
) -> AlgoResult<Trace> {
  let mut net = FlowNetwork::new(graph, source, sink)?;
  let mut total = 0.0;
  recorder.record_with(|| {
    net.snapshot(
      "Starting with zero flow".into(),
      FlowState::default(),
      None,
    )
  });

  let mut augmentations = 0usize;
  let mut outcome = RunOutcome::Completed;
  while let Some(path) = bfs_path(&net) {
    if augmentations >= max_augmentations {
      warn!(augmentations, "max flow stopped at the augmentation limit");
      outcome = RunOutcome::IterationLimit;
      break;
    }
    let amount = net.bottleneck(&path);
    net.augment(&path, amount);
    total += amount;
    augmentations += 1;
    debug!(augmentations, amount, total, "augmented");
    if recorder.is_enabled() {
      let message = format!(
        "Augmenting path {} carries {}",
        net.path_ids(&path).join(" -> "),
        amount
      );
      let flow = FlowState {
        total_flow: total,
        augmentation: Some(amount),
        ..FlowState::default()
      };
      let step = net.snapshot(message, flow, Some(&path));
      recorder.record(step);
    }
  }

  let message = match outcome {
    RunOutcome::IterationLimit => format!("Stopped after {augmentations} augmentations, flow {total}"),
    _ => format!("Maximum flow: {total}"),
  };
  let mut flow = FlowState {
    total_flow: total,
    ..FlowState::default()
  };
  if outcome == RunOutcome::Completed {
    let side = net.source_side();
    for &i in &side {
      net.graph.node_mut(i).state = NodeState::Visited;
    }
    flow.min_cut = Some(side.iter().map(|&i| net.graph.id(i)).collect());
  }
  recorder.record_with(|| net.snapshot(message, flow, None));
  info!(augmentations, total, "max flow finished");
  Ok(Trace::from_steps("max_flow", outcome, recorder.finalize()))
}
