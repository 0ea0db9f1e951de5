//! Growth-class fitting by least squares against reference curves.

use crate::types::ComplexityClass;

/// Squared residual of the best `a * f(n)` fit for one class, or `None` when the reference curve
/// overflows at these sizes.
pub fn residual(class: ComplexityClass, sizes: &[usize], times: &[f64]) -> Option<f64> {
  let refs: Vec<f64> = sizes.iter().map(|&n| class.reference(n as f64)).collect();
  let ff: f64 = refs.iter().map(|f| f * f).sum();
  if !ff.is_finite() || ff == 0.0 {
    return None;
  }
  let a = refs.iter().zip(times).map(|(f, y)| f * y).sum::<f64>() / ff;
  let r = refs
    .iter()
    .zip(times)
    .map(|(f, y)| (y - a * f).powi(2))
    .sum::<f64>();
  r.is_finite().then_some(r)
}

/// Picks the class whose scaled reference curve best matches `(sizes, times)`.
///
/// Times are normalized by their maximum first. On equal residuals the slower-growing class
/// wins; an all-zero series is [ComplexityClass::Constant].
pub fn fit_complexity(sizes: &[usize], times: &[f64]) -> ComplexityClass {
  let peak = times.iter().copied().fold(0.0, f64::max);
  if sizes.len() < 2 || peak <= 0.0 || !peak.is_finite() {
    return ComplexityClass::Constant;
  }
  let normalized: Vec<f64> = times.iter().map(|t| t / peak).collect();
  let mut best = (ComplexityClass::Constant, f64::INFINITY);
  for class in ComplexityClass::ALL {
    if let Some(r) = residual(class, sizes, &normalized)
      && r < best.1
    {
      best = (class, r);
    }
  }
  best.0
}
