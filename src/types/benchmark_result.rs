//! Output of a complexity-estimation run.

use serde::{Deserialize, Serialize};

use super::ComplexityClass;

/// Timing and memory samples per input size plus the fitted growth class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
  /// Strictly increasing, as supplied by the caller.
  pub input_sizes: Vec<usize>,
  /// Mean wall-clock seconds per size.
  pub execution_times: Vec<f64>,
  /// Peak bytes allocated above baseline per size (0 when allocation tracking is off).
  pub memory_usage: Vec<u64>,
  pub estimated_complexity: ComplexityClass,
}
