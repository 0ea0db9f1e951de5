//! Error taxonomy for algorithm runs.
//!
//! `InvalidInput` aborts a single run. `Infeasible` and `Unbounded` exist so callers can
//! turn a terminal optimization outcome into an error via [crate::types::Trace::ensure_solved];
//! the family modules themselves report those outcomes as terminal steps.

use thiserror::Error;

/// Errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum AlgoError {
  /// Malformed or out-of-domain input.
  #[error("invalid input: {0}")]
  InvalidInput(String),
  /// The problem has no feasible solution.
  #[error("infeasible: {0}")]
  Infeasible(String),
  /// The objective can be improved without bound.
  #[error("unbounded: {0}")]
  Unbounded(String),
  /// Reading or writing a trace document failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),
  /// A request or trace document could not be (de)serialized.
  #[error(transparent)]
  Serialization(#[from] serde_json::Error),
}

impl AlgoError {
  /// Shorthand for [AlgoError::InvalidInput].
  pub fn invalid(msg: impl Into<String>) -> Self {
    AlgoError::InvalidInput(msg.into())
  }

  /// True for errors caused by the caller's input.
  pub fn is_invalid_input(&self) -> bool {
    matches!(self, AlgoError::InvalidInput(_))
  }
}

/// Result alias used across the crate.
pub type AlgoResult<T> = Result<T, AlgoError>;
