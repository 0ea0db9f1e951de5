//! Tests for matrix chain ordering.

use crate::dp::matrix_chain;
use crate::recorder::StepRecorder;

#[test]
fn reference_chain() {
  let trace = matrix_chain(&[30, 35, 15, 5, 10, 20, 25], StepRecorder::new()).unwrap();
  let steps = trace.steps().unwrap();
  // 15 (i, j) pairs for six matrices, plus the summary
  assert_eq!(steps.len(), 16);
  let last = steps.last().unwrap();
  let table = last.table.as_ref().unwrap();
  assert_eq!(table.cells[0][5], Some(15125.0));
  assert_eq!(
    table.parenthesization.as_deref(),
    Some("((A1(A2A3))((A4A5)A6))")
  );
}

#[test]
fn ordered_by_length_then_start() {
  let trace = matrix_chain(&[10, 20, 30, 40], StepRecorder::new()).unwrap();
  let cells: Vec<(usize, usize)> = trace
    .steps()
    .unwrap()
    .iter()
    .filter_map(|s| s.table.as_ref()?.cell)
    .collect();
  assert_eq!(cells, vec![(0, 1), (1, 2), (0, 2)]);
}

#[test]
fn single_matrix_costs_nothing() {
  let trace = matrix_chain(&[4, 7], StepRecorder::new()).unwrap();
  let steps = trace.steps().unwrap();
  assert_eq!(steps.len(), 1);
  assert_eq!(steps[0].message, "Minimum cost 0: A1");
}

#[test]
fn rejects_short_or_non_positive_dimensions() {
  assert!(matrix_chain(&[5], StepRecorder::new()).unwrap_err().is_invalid_input());
  assert!(matrix_chain(&[], StepRecorder::new()).unwrap_err().is_invalid_input());
  assert!(matrix_chain(&[5, 0, 3], StepRecorder::new()).unwrap_err().is_invalid_input());
}
