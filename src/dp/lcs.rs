//! Longest common subsequence.

use tracing::{info, instrument};

use super::check_table_size;
use crate::error::{AlgoError, AlgoResult};
use crate::recorder::StepRecorder;
use crate::types::{DpTable, RunOutcome, Step, StepKind, Trace};

/// LCS of `first` and `second` by the prefix-length table, compared per Unicode scalar value.
///
/// Row 0 and column 0 start at 0; every other cell is recorded as it is filled. Backtracking
/// records one step per matched character with the subsequence recovered so far.
#[instrument(level = "trace", skip(recorder))]
pub fn lcs(first: &str, second: &str, mut recorder: StepRecorder<Step>) -> AlgoResult<Trace> {
  if first.is_empty() || second.is_empty() {
    return Err(AlgoError::invalid("both strings must be non-empty"));
  }
  let a: Vec<char> = first.chars().collect();
  let b: Vec<char> = second.chars().collect();
  let (m, n) = (a.len(), b.len());
  check_table_size(m + 1, n + 1)?;

  let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; n + 1]; m + 1];
  for (i, row) in cells.iter_mut().enumerate() {
    row[0] = Some(0.0);
    if i == 0 {
      row.fill(Some(0.0));
    }
  }
  let mut len = vec![vec![0i64; n + 1]; m + 1];

  for i in 1..=m {
    for j in 1..=n {
      let message = if a[i - 1] == b[j - 1] {
        len[i][j] = len[i - 1][j - 1] + 1;
        format!("'{}' matches: extend diagonal to {}", a[i - 1], len[i][j])
      } else {
        len[i][j] = len[i - 1][j].max(len[i][j - 1]);
        format!(
          "'{}' != '{}': carry max {}",
          a[i - 1],
          b[j - 1],
          len[i][j]
        )
      };
      cells[i][j] = Some(len[i][j] as f64);
      recorder.record_with(|| {
        Step::table(
          StepKind::Lcs,
          DpTable {
            cells: cells.clone(),
            cell: Some((i, j)),
            ..DpTable::default()
          },
          message,
        )
      });
    }
  }

  let mut found: Vec<char> = Vec::new();
  let (mut i, mut j) = (m, n);
  while i > 0 && j > 0 {
    if a[i - 1] == b[j - 1] {
      found.push(a[i - 1]);
      let suffix: String = found.iter().rev().collect();
      recorder.record_with(|| {
        Step::table(
          StepKind::Lcs,
          DpTable {
            cells: cells.clone(),
            cell: Some((i, j)),
            subsequence: Some(suffix),
            ..DpTable::default()
          },
          format!("Backtrack: '{}' is in the subsequence", a[i - 1]),
        )
      });
      i -= 1;
      j -= 1;
    } else if len[i - 1][j] >= len[i][j - 1] {
      i -= 1;
    } else {
      j -= 1;
    }
  }

  let subsequence: String = found.iter().rev().collect();
  let message = format!(
    "LCS length {}: \"{}\"",
    subsequence.chars().count(),
    subsequence
  );
  info!(length = len[m][n], "lcs finished");
  recorder.record_with(|| {
    Step::table(
      StepKind::Lcs,
      DpTable {
        cells,
        subsequence: Some(subsequence),
        ..DpTable::default()
      },
      message,
    )
  });
  Ok(Trace::from_steps("lcs", RunOutcome::Completed, recorder.finalize()))
}
