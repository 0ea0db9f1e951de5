//! Matrix chain multiplication order.

use tracing::{info, instrument};

use super::check_table_size;
use crate::error::{AlgoError, AlgoResult};
use crate::recorder::StepRecorder;
use crate::types::{DpTable, RunOutcome, Step, StepKind, Trace};

/// Minimum scalar multiplications for the chain `A1..An` where `Ai` is
/// `dimensions[i-1] x dimensions[i]`.
///
/// `cost[i][j]` (0-based matrices) is filled by increasing chain length, then increasing start.
/// Each step's `split` is the `k` minimizing `cost[i][k] + cost[k+1][j] + d[i]·d[k+1]·d[j+1]`.
/// Costs are computed exactly in `i64`; the recorded table shows them as `f64`, with
/// uncomputed cells `None`.
#[instrument(level = "trace", skip(recorder))]
pub fn matrix_chain(dimensions: &[i64], mut recorder: StepRecorder<Step>) -> AlgoResult<Trace> {
  if dimensions.len() < 2 {
    return Err(AlgoError::invalid(
      "matrix chain needs at least two dimensions",
    ));
  }
  if let Some(d) = dimensions.iter().find(|&&d| d <= 0) {
    return Err(AlgoError::invalid(format!(
      "matrix dimensions must be positive, got {d}"
    )));
  }
  let n = dimensions.len() - 1;
  check_table_size(n, n)?;
  let d = dimensions;

  let mut costs = vec![vec![0i64; n]; n];
  let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; n]; n];
  let mut split = vec![vec![0usize; n]; n];
  for (i, row) in cells.iter_mut().enumerate() {
    row[i] = Some(0.0);
  }

  for length in 2..=n {
    for i in 0..=n - length {
      let j = i + length - 1;
      let mut best: Option<(i64, usize)> = None;
      for k in i..j {
        let (left, right) = (costs[i][k], costs[k + 1][j]);
        let cost = d[i]
          .checked_mul(d[k + 1])
          .and_then(|x| x.checked_mul(d[j + 1]))
          .and_then(|x| x.checked_add(left))
          .and_then(|x| x.checked_add(right))
          .ok_or_else(|| AlgoError::invalid("multiplication cost overflows"))?;
        if best.is_none_or(|(b, _)| cost < b) {
          best = Some((cost, k));
        }
      }
      let Some((cost, k)) = best else { continue };
      costs[i][j] = cost;
      cells[i][j] = Some(cost as f64);
      split[i][j] = k;
      recorder.record_with(|| {
        Step::table(
          StepKind::MatrixChain,
          DpTable {
            cells: cells.clone(),
            cell: Some((i, j)),
            split: Some(k),
            ..DpTable::default()
          },
          format!(
            "A{}..A{}: split after A{}, cost {}",
            i + 1,
            j + 1,
            k + 1,
            cost
          ),
        )
      });
    }
  }

  let total = costs[0][n - 1];
  let order = parenthesize(&split, 0, n - 1);
  let message = format!("Minimum cost {total}: {order}");
  info!(matrices = n, total, "matrix chain finished");
  recorder.record_with(|| {
    Step::table(
      StepKind::MatrixChain,
      DpTable {
        cells,
        parenthesization: Some(order),
        ..DpTable::default()
      },
      message,
    )
  });
  Ok(Trace::from_steps(
    "matrix_chain",
    RunOutcome::Completed,
    recorder.finalize(),
  ))
}

/// Optimal parenthesization of `A(i+1)..A(j+1)` from the split table.
pub fn parenthesize(split: &[Vec<usize>], i: usize, j: usize) -> String {
  if i == j {
    return format!("A{}", i + 1);
  }
  let k = split[i][j];
  format!(
    "({}{})",
    parenthesize(split, i, k),
    parenthesize(split, k + 1, j)
  )
}
