//! Engine configuration: iteration caps, optimizer defaults, benchmark settings.
//!
//! Defaults come from [EngineConfig::default]; `ALGOTRACE_*` environment variables override
//! them; CLI flags override both.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AlgoError, AlgoResult};

/// When gradient descent stops before `max_iterations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergencePolicy {
  /// `|improvement| < tolerance`.
  #[default]
  Improvement,
  /// `‖gradient‖ < tolerance`.
  GradientNorm,
  /// Whichever of the two fires first.
  Either,
}

/// How several constraint violations at one point are combined into one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
  /// Largest single violation.
  #[default]
  Max,
  /// Sum of squared violations.
  SumOfSquares,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
  pub learning_rate: f64,
  pub max_iterations: usize,
  pub tolerance: f64,
  pub convergence: ConvergencePolicy,
  /// Central-difference step, scaled by `max(1, |x_j|)`.
  pub diff_step: f64,
}

impl Default for GradientConfig {
  fn default() -> Self {
    Self {
      learning_rate: 0.01,
      max_iterations: 1000,
      tolerance: 1e-6,
      convergence: ConvergencePolicy::Improvement,
      diff_step: 1e-6,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstrainedConfig {
  /// Outer (penalty / multiplier update) iterations; one step is recorded per iteration.
  pub max_iterations: usize,
  /// Descent iterations per outer iteration.
  pub inner_iterations: usize,
  pub tolerance: f64,
  pub penalty_weight: f64,
  pub penalty_growth: f64,
  pub max_penalty: f64,
  pub initial_step: f64,
  /// Backtracking shrink factor (0 < shrink < 1).
  pub line_search_shrink: f64,
  pub line_search_max_steps: usize,
  /// Armijo constant: a step must achieve this fraction of the predicted decrease.
  pub sufficient_decrease: f64,
  pub diff_step: f64,
  pub violation: ViolationPolicy,
}

impl Default for ConstrainedConfig {
  fn default() -> Self {
    Self {
      max_iterations: 200,
      inner_iterations: 50,
      tolerance: 1e-6,
      penalty_weight: 10.0,
      penalty_growth: 2.0,
      max_penalty: 1e9,
      initial_step: 1.0,
      line_search_shrink: 0.5,
      line_search_max_steps: 30,
      sufficient_decrease: 0.5,
      diff_step: 1e-6,
      violation: ViolationPolicy::Max,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
  /// Timed repetitions per input size; times are averaged.
  pub trials: usize,
  /// Run one untimed repetition per size first.
  pub warmup: bool,
  /// Measure different input sizes on separate worker threads.
  pub parallel: bool,
  /// Base seed for the deterministic input generators.
  pub seed: u64,
}

impl Default for BenchmarkConfig {
  fn default() -> Self {
    Self {
      trials: 3,
      warmup: true,
      parallel: true,
      seed: 0x5eed,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  pub simplex_max_pivots: usize,
  pub flow_max_augmentations: usize,
  pub gradient: GradientConfig,
  pub constrained: ConstrainedConfig,
  pub benchmark: BenchmarkConfig,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      simplex_max_pivots: 10_000,
      flow_max_augmentations: 10_000,
      gradient: GradientConfig::default(),
      constrained: ConstrainedConfig::default(),
      benchmark: BenchmarkConfig::default(),
    }
  }
}

/// Environment variables read by [EngineConfig::from_env].
pub const ENV_TRIALS: &str = "ALGOTRACE_TRIALS";
pub const ENV_SIMPLEX_MAX_PIVOTS: &str = "ALGOTRACE_SIMPLEX_MAX_PIVOTS";
pub const ENV_FLOW_MAX_AUGMENTATIONS: &str = "ALGOTRACE_FLOW_MAX_AUGMENTATIONS";
pub const ENV_PARALLEL: &str = "ALGOTRACE_PARALLEL";
pub const ENV_SEED: &str = "ALGOTRACE_SEED";

impl EngineConfig {
  /// Defaults with `ALGOTRACE_*` overrides from the process environment.
  pub fn from_env() -> AlgoResult<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Defaults with overrides from `lookup` (an environment-like key/value source).
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AlgoResult<Self> {
    let mut cfg = Self::default();
    if let Some(v) = lookup(ENV_TRIALS) {
      cfg.benchmark.trials = parse_var(ENV_TRIALS, &v)?;
    }
    if let Some(v) = lookup(ENV_SIMPLEX_MAX_PIVOTS) {
      cfg.simplex_max_pivots = parse_var(ENV_SIMPLEX_MAX_PIVOTS, &v)?;
    }
    if let Some(v) = lookup(ENV_FLOW_MAX_AUGMENTATIONS) {
      cfg.flow_max_augmentations = parse_var(ENV_FLOW_MAX_AUGMENTATIONS, &v)?;
    }
    if let Some(v) = lookup(ENV_PARALLEL) {
      cfg.benchmark.parallel = parse_bool(ENV_PARALLEL, &v)?;
    }
    if let Some(v) = lookup(ENV_SEED) {
      cfg.benchmark.seed = parse_var(ENV_SEED, &v)?;
    }
    cfg.validate()?;
    Ok(cfg)
  }

  /// Rejects settings no run could make progress with.
  pub fn validate(&self) -> AlgoResult<()> {
    if self.benchmark.trials == 0 {
      return Err(AlgoError::invalid("benchmark trials must be at least 1"));
    }
    if self.simplex_max_pivots == 0 || self.flow_max_augmentations == 0 {
      return Err(AlgoError::invalid("iteration caps must be at least 1"));
    }
    let shrink = self.constrained.line_search_shrink;
    if !(shrink > 0.0 && shrink < 1.0) {
      return Err(AlgoError::invalid("line_search_shrink must lie in (0, 1)"));
    }
    let armijo = self.constrained.sufficient_decrease;
    if !(armijo > 0.0 && armijo < 1.0) {
      return Err(AlgoError::invalid("sufficient_decrease must lie in (0, 1)"));
    }
    if self.constrained.penalty_growth <= 1.0 {
      return Err(AlgoError::invalid("penalty_growth must exceed 1"));
    }
    Ok(())
  }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> AlgoResult<T> {
  value
    .trim()
    .parse()
    .map_err(|_| AlgoError::invalid(format!("{key}: cannot parse '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> AlgoResult<bool> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    _ => Err(AlgoError::invalid(format!("{key}: expected a boolean, got '{value}'"))),
  }
}
