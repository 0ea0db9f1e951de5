//! 0/1 knapsack.

use tracing::{info, instrument};

use super::{check_table_size, non_negative_integer};
use crate::error::{AlgoError, AlgoResult};
use crate::recorder::StepRecorder;
use crate::types::{DpTable, RunOutcome, Step, StepKind, Trace};

/// Fills `table[i][w]` (best value using the first `i` items within capacity `w`) row by row,
/// then walks back from `table[n][capacity]` to recover the chosen items.
///
/// Weights and capacity must be non-negative integers; values may be any finite numbers whose
/// absolute sum is finite. `weights` and `values` must be equally long and non-empty.
#[instrument(level = "trace", skip(weights, values, recorder))]
pub fn knapsack(
  weights: &[f64],
  values: &[f64],
  capacity: f64,
  mut recorder: StepRecorder<Step>,
) -> AlgoResult<Trace> {
  if weights.is_empty() {
    return Err(AlgoError::invalid("knapsack needs at least one item"));
  }
  if weights.len() != values.len() {
    return Err(AlgoError::invalid(format!(
      "{} weights but {} values",
      weights.len(),
      values.len()
    )));
  }
  let cap = non_negative_integer(capacity, "capacity")?;
  let w: Vec<usize> = weights
    .iter()
    .map(|&x| non_negative_integer(x, "item weight"))
    .collect::<AlgoResult<_>>()?;
  if let Some(x) = values.iter().find(|x| !x.is_finite()) {
    return Err(AlgoError::invalid(format!("item value must be finite, got {x}")));
  }
  // every table entry is a partial sum of values, so this bounds them all
  if !values.iter().map(|x| x.abs()).sum::<f64>().is_finite() {
    return Err(AlgoError::invalid("item values are too large to sum"));
  }
  let v = values;
  let n = w.len();
  check_table_size(n + 1, cap + 1)?;

  let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; cap + 1]; n + 1];
  cells[0] = vec![Some(0.0); cap + 1];
  let mut best = vec![vec![0.0f64; cap + 1]; n + 1];

  for i in 1..=n {
    let (wi, vi) = (w[i - 1], v[i - 1]);
    for c in 0..=cap {
      let skip = best[i - 1][c];
      let take = (wi <= c).then(|| vi + best[i - 1][c - wi]);
      let (val, note) = match take {
        Some(t) if t > skip => (t, "take"),
        _ => (skip, "skip"),
      };
      best[i][c] = val;
      cells[i][c] = Some(val);
      recorder.record_with(|| {
        Step::table(
          StepKind::Knapsack,
          DpTable {
            cells: cells.clone(),
            cell: Some((i, c)),
            ..DpTable::default()
          },
          format!(
            "Item {} (weight {}, value {}), capacity {}: {} -> {}",
            i - 1,
            wi,
            vi,
            c,
            note,
            val
          ),
        )
      });
    }
  }

  let mut selected = Vec::new();
  let mut c = cap;
  for i in (1..=n).rev() {
    if best[i][c] != best[i - 1][c] {
      selected.push(i - 1);
      let at = c;
      c -= w[i - 1];
      recorder.record_with(|| {
        Step::table(
          StepKind::Knapsack,
          DpTable {
            cells: cells.clone(),
            cell: Some((i, at)),
            selected: selected.clone(),
            ..DpTable::default()
          },
          format!("Backtrack: item {} is in the knapsack", i - 1),
        )
      });
    }
  }
  selected.reverse();

  let optimum = best[n][cap];
  let message = format!("Optimal value {optimum} with items {selected:?}");
  recorder.record_with(|| {
    Step::table(
      StepKind::Knapsack,
      DpTable {
        cells,
        selected,
        ..DpTable::default()
      },
      message,
    )
  });
  let steps = recorder.finalize();
  info!(items = n, capacity = cap, optimum, steps = steps.len(), "knapsack finished");
  Ok(Trace::from_steps("knapsack", RunOutcome::Completed, steps))
}
