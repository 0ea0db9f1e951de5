//! Dynamic-programming family: 0/1 knapsack, longest common subsequence, matrix chain.
//!
//! Each variant records one step per table cell computed, carrying a copy of the whole table
//! and the `(row, col)` just filled, then backtracking steps and a final summary step.

mod knapsack;
mod lcs;
mod matrix_chain;
#[cfg(test)]
mod matrix_chain_test;

pub use knapsack::knapsack;
pub use lcs::lcs;
pub use matrix_chain::{matrix_chain, parenthesize};

use crate::error::{AlgoError, AlgoResult};

/// Largest table (rows × columns) a run may allocate.
pub const MAX_TABLE_CELLS: usize = 4_000_000;

pub(crate) fn check_table_size(rows: usize, cols: usize) -> AlgoResult<()> {
  match rows.checked_mul(cols) {
    Some(cells) if cells <= MAX_TABLE_CELLS => Ok(()),
    _ => Err(AlgoError::invalid(format!(
      "table of {rows} x {cols} cells exceeds the limit of {MAX_TABLE_CELLS}"
    ))),
  }
}

/// `value` as a non-negative integer, or an error naming `what`.
pub(crate) fn non_negative_integer(value: f64, what: &str) -> AlgoResult<usize> {
  if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64 {
    Ok(value as usize)
  } else {
    Err(AlgoError::invalid(format!(
      "{what} must be a non-negative integer, got {value}"
    )))
  }
}
