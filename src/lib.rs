//! # algotrace
//!
//! Instrumented algorithm engine: runs classic algorithms step by step and records every
//! intermediate state, plus an empirical complexity estimator.
//!
//! ## Architecture
//!
//! Each algorithm lives in a family module and takes a [recorder::StepRecorder]:
//!
//! - `traversal`: DFS, BFS, Dijkstra, A*
//! - `dp`: 0/1 knapsack, longest common subsequence, matrix-chain ordering
//! - `optimization`: simplex, max flow, min-cost flow, gradient descent, constrained
//!   minimization
//!
//! [dispatch::run] routes a tagged [dispatch::AlgorithmRequest] to its family and returns
//! the finished [types::Trace]. The `benchmark` module times seeded instances of growing
//! size and fits a growth class to the timings.

pub mod benchmark;
pub mod config;
pub mod dispatch;
#[cfg(test)]
mod dispatch_test;
pub mod dp;
pub mod error;
pub mod optimization;
pub mod recorder;
#[cfg(test)]
mod recorder_test;
pub mod trace_io;
pub mod traversal;
pub mod types;

pub use benchmark::{AlgorithmSelector, estimate_complexity};
pub use config::EngineConfig;
pub use dispatch::{AlgorithmRequest, catalogue, run};
pub use error::{AlgoError, AlgoResult};
pub use recorder::StepRecorder;
pub use types::{BenchmarkResult, ComplexityClass, Graph, RunOutcome, Trace};
