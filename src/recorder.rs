//! Step recorder: the ordered, append-only step log of one run.
//!
//! A recorder is owned by exactly one run. [StepRecorder::finalize] consumes it, so nothing can
//! be recorded once the sequence has been handed out.

use tracing::trace;

/// Append-only step sequence for one run.
///
/// Consecutive duplicates are dropped: a step equal to the previous one changes no observable
/// field. A disabled recorder (benchmarking) never builds snapshots at all.
#[derive(Debug)]
pub struct StepRecorder<S> {
  steps: Vec<S>,
  enabled: bool,
  /// State transitions reported, including ones not stored.
  transitions: usize,
}

impl<S: PartialEq> StepRecorder<S> {
  /// A recorder that stores steps.
  pub fn new() -> Self {
    Self::with_enabled(true)
  }

  /// A recorder that only counts transitions.
  pub fn disabled() -> Self {
    Self::with_enabled(false)
  }

  pub fn with_enabled(enabled: bool) -> Self {
    Self {
      steps: Vec::new(),
      enabled,
      transitions: 0,
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  /// Appends `step` unless it repeats the previous step.
  pub fn record(&mut self, step: S) {
    self.transitions += 1;
    if !self.enabled {
      return;
    }
    if self.steps.last() == Some(&step) {
      trace!(index = self.steps.len(), "dropping step identical to its predecessor");
      return;
    }
    self.steps.push(step);
  }

  /// Like [StepRecorder::record], but only builds the snapshot when recording is enabled.
  pub fn record_with(&mut self, build: impl FnOnce() -> S) {
    if self.enabled {
      self.record(build());
    } else {
      self.transitions += 1;
    }
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn last(&self) -> Option<&S> {
    self.steps.last()
  }

  pub fn transitions(&self) -> usize {
    self.transitions
  }

  /// Ends the run and hands over the recorded sequence.
  pub fn finalize(self) -> Vec<S> {
    self.steps
  }
}

impl<S: PartialEq> Default for StepRecorder<S> {
  fn default() -> Self {
    Self::new()
  }
}
