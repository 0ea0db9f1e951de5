//! Data model shared by every algorithm family.
//!
//! Graphs are created fresh per request and cloned per run; steps are value snapshots owned by
//! the caller once a run returns.

mod benchmark_result;
mod complexity_class;
mod edge;
#[cfg(test)]
mod edge_test;
mod graph;
mod node;
mod optimization_step;
mod step;
#[cfg(test)]
mod step_test;
mod trace;
#[cfg(test)]
mod trace_test;

pub use benchmark_result::BenchmarkResult;
pub use complexity_class::ComplexityClass;
pub use edge::{Edge, EdgeState};
pub use graph::{Graph, GraphSpec};
pub use node::{Node, NodeState};
pub use optimization_step::{OptimizationKind, OptimizationStep};
pub use step::{Distances, DpTable, FlowState, Step, StepKind};
pub use trace::{RunOutcome, Trace, TraceSteps};
