//! Growth-rate labels the complexity estimator can report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asymptotic growth class, ordered from slowest to fastest growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplexityClass {
  #[serde(rename = "O(1)")]
  Constant,
  #[serde(rename = "O(log n)")]
  Logarithmic,
  #[serde(rename = "O(n)")]
  Linear,
  #[serde(rename = "O(n log n)")]
  Linearithmic,
  #[serde(rename = "O(n^2)")]
  Quadratic,
  #[serde(rename = "O(n^3)")]
  Cubic,
  #[serde(rename = "O(2^n)")]
  Exponential,
}

impl ComplexityClass {
  /// Every candidate, slowest growth first.
  pub const ALL: [ComplexityClass; 7] = [
    ComplexityClass::Constant,
    ComplexityClass::Logarithmic,
    ComplexityClass::Linear,
    ComplexityClass::Linearithmic,
    ComplexityClass::Quadratic,
    ComplexityClass::Cubic,
    ComplexityClass::Exponential,
  ];

  /// Reference curve `f(n)`; the fitted model is `a * f(n)`.
  pub fn reference(self, n: f64) -> f64 {
    match self {
      ComplexityClass::Constant => 1.0,
      ComplexityClass::Logarithmic => n.max(1.0).ln().max(f64::MIN_POSITIVE),
      ComplexityClass::Linear => n,
      ComplexityClass::Linearithmic => n * n.max(1.0).ln().max(f64::MIN_POSITIVE),
      ComplexityClass::Quadratic => n * n,
      ComplexityClass::Cubic => n * n * n,
      ComplexityClass::Exponential => n.exp2(),
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      ComplexityClass::Constant => "O(1)",
      ComplexityClass::Logarithmic => "O(log n)",
      ComplexityClass::Linear => "O(n)",
      ComplexityClass::Linearithmic => "O(n log n)",
      ComplexityClass::Quadratic => "O(n^2)",
      ComplexityClass::Cubic => "O(n^3)",
      ComplexityClass::Exponential => "O(2^n)",
    }
  }
}

impl fmt::Display for ComplexityClass {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.label())
  }
}
