//! Minimum-cost flow by successive shortest paths.
//!
//! Each round finds the cheapest residual source→sink path with Bellman–Ford (backward arcs
//! carry negated cost, so reduced costs may be negative) and pushes as much as the path and the
//! remaining demand allow.

use tracing::{debug, info, instrument, warn};

use super::flow::{Arc, FLOW_EPS, FlowNetwork};
use crate::error::{AlgoError, AlgoResult};
use crate::recorder::StepRecorder;
use crate::types::{FlowState, Graph, RunOutcome, Step, Trace};

/// Cheapest residual path to the sink and its unit cost.
///
/// A negative-cost cycle reachable from the source makes "cheapest" meaningless and is reported
/// as invalid input.
fn cheapest_path(net: &FlowNetwork) -> AlgoResult<Option<(Vec<Arc>, f64)>> {
  let n = net.node_count();
  let mut dist = vec![f64::INFINITY; n];
  let mut parent: Vec<Option<Arc>> = vec![None; n];
  dist[net.source] = 0.0;
  for round in 0..n {
    let mut changed = false;
    for u in 0..n {
      if dist[u].is_infinite() {
        continue;
      }
      for &a in net.arcs(u) {
        if net.room(a) <= FLOW_EPS {
          continue;
        }
        let (_, v) = net.ends(a);
        let candidate = dist[u] + net.arc_cost(a);
        if candidate < dist[v] - 1e-12 {
          dist[v] = candidate;
          parent[v] = Some(a);
          changed = true;
        }
      }
    }
    if !changed {
      break;
    }
    if round == n - 1 {
      return Err(AlgoError::invalid(
        "the network contains a negative-cost cycle",
      ));
    }
  }
  if dist[net.sink].is_infinite() {
    return Ok(None);
  }
  Ok(net.walk_back(&parent, net.sink).map(|p| (p, dist[net.sink])))
}

/// Routes `demand` units (or as much as possible when `demand` is `None`) from `source` to
/// `sink` at minimum total cost.
///
/// Unmet demand ends the run with [RunOutcome::Infeasible]; [Trace::ensure_solved] turns that
/// into [AlgoError::Infeasible].
#[instrument(level = "trace", skip(graph, recorder))]
pub fn min_cost_flow(
  graph: &Graph,
  source: &str,
  sink: &str,
  demand: Option<f64>,
  max_augmentations: usize,
  mut recorder: StepRecorder<Step>,
) -> AlgoResult<Trace> {
  if let Some(d) = demand.filter(|d| !d.is_finite() || *d < 0.0) {
    return Err(AlgoError::invalid(format!(
      "demand must be a non-negative number, got {d}"
    )));
  }
  let mut net = FlowNetwork::new(graph, source, sink)?;
  let target = demand.unwrap_or(f64::INFINITY);
  let (mut total, mut cost) = (0.0, 0.0);
  let mut augmentations = 0usize;
  let mut outcome = RunOutcome::Completed;

  recorder.record_with(|| {
    net.snapshot(
      "Starting with zero flow".into(),
      FlowState {
        total_cost: Some(0.0),
        ..FlowState::default()
      },
      None,
    )
  });

  while total < target - FLOW_EPS {
    let Some((path, unit_cost)) = cheapest_path(&net)? else {
      break;
    };
    if augmentations >= max_augmentations {
      warn!(augmentations, "min cost flow stopped at the augmentation limit");
      outcome = RunOutcome::IterationLimit;
      break;
    }
    let amount = net.bottleneck(&path).min(target - total);
    net.augment(&path, amount);
    total += amount;
    cost += amount * unit_cost;
    augmentations += 1;
    debug!(augmentations, amount, unit_cost, total, cost, "augmented");
    if recorder.is_enabled() {
      let message = format!(
        "Path {} (unit cost {}) carries {}",
        net.path_ids(&path).join(" -> "),
        unit_cost,
        amount
      );
      let flow = FlowState {
        total_flow: total,
        total_cost: Some(cost),
        augmentation: Some(amount),
        min_cut: None,
      };
      let step = net.snapshot(message, flow, Some(&path));
      recorder.record(step);
    }
  }

  let message = match demand {
    _ if outcome == RunOutcome::IterationLimit => {
      format!("Stopped after {augmentations} augmentations: flow {total}, cost {cost}")
    }
    Some(d) if total < d - 1e-9 => {
      outcome = RunOutcome::Infeasible;
      format!("Infeasible: only {total} of demand {d} can be routed")
    }
    _ => format!("Minimum cost flow: cost {cost}, flow {total}"),
  };
  let flow = FlowState {
    total_flow: total,
    total_cost: Some(cost),
    ..FlowState::default()
  };
  recorder.record_with(|| net.snapshot(message, flow, None));
  info!(augmentations, total, cost, %outcome, "min cost flow finished");
  Ok(Trace::from_steps("min_cost_flow", outcome, recorder.finalize()))
}
