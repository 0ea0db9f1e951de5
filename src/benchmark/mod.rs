//! Complexity estimation: deterministic generators, timed trials, growth-class fitting.

mod estimator;
mod fit;
mod generators;
mod memory;
#[cfg(test)]
mod memory_test;

pub use estimator::{Estimator, Sample, estimate_complexity, measure, validate_sizes};
pub use fit::{fit_complexity, residual};
pub use generators::{AlgorithmSelector, Workload, generate};
pub use memory::{MemoryProbe, TrackingAllocator, tracking_installed};
