//! Request dispatch: one tagged request type covering every algorithm, routed to its family.
//!
//! Requests are JSON objects tagged by `"algorithm"`. Omitted fields fall back to the demo
//! inputs (the sample graph, the classic DP instances) or to [EngineConfig] defaults.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::benchmark::AlgorithmSelector;
use crate::config::{ConvergencePolicy, EngineConfig, GradientConfig};
use crate::dp::{knapsack, lcs, matrix_chain};
use crate::error::AlgoResult;
use crate::optimization::{
  ConstraintSpec, Expr, LinearProgram, Method, constrained, gradient_descent, max_flow,
  min_cost_flow, simplex,
};
use crate::recorder::StepRecorder;
use crate::traversal::{Heuristic, astar, bfs, dfs, dijkstra};
use crate::types::{Edge, Graph, Node, Trace};

/// Nodes and edges of a request; both empty means the sample graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
  #[serde(default)]
  pub nodes: Vec<Node>,
  #[serde(default)]
  pub edges: Vec<Edge>,
  /// Whether `edges` are one-way. Traversals default to two-way edges, flows to one-way.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub directed: Option<bool>,
}

impl GraphInput {
  pub fn build(&self, directed_by_default: bool) -> AlgoResult<Graph> {
    if self.nodes.is_empty() && self.edges.is_empty() {
      return Ok(Graph::sample());
    }
    let (nodes, edges) = (self.nodes.clone(), self.edges.clone());
    if self.directed.unwrap_or(directed_by_default) {
      Graph::new(nodes, edges)
    } else {
      Graph::undirected(nodes, edges)
    }
  }
}

fn default_start() -> String {
  "A".into()
}

fn default_sink() -> String {
  "F".into()
}

/// Search from `start`, optionally stopping at `end`.
///
/// Request edges are two-way unless the request sets `"directed": true`: an edge `a -> b`
/// also lets the search walk `b -> a`, the same as the sample graph's roads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalRequest {
  #[serde(flatten)]
  pub graph: GraphInput,
  #[serde(default = "default_start")]
  pub start: String,
  #[serde(default)]
  pub end: Option<String>,
  /// A* only.
  #[serde(default)]
  pub heuristic: Heuristic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackRequest {
  #[serde(default = "KnapsackRequest::default_weights")]
  pub weights: Vec<f64>,
  #[serde(default = "KnapsackRequest::default_values")]
  pub values: Vec<f64>,
  #[serde(default = "KnapsackRequest::default_capacity")]
  pub capacity: f64,
}

impl KnapsackRequest {
  fn default_weights() -> Vec<f64> {
    vec![2.0, 3.0, 4.0, 5.0]
  }

  fn default_values() -> Vec<f64> {
    vec![3.0, 4.0, 5.0, 6.0]
  }

  fn default_capacity() -> f64 {
    10.0
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LcsRequest {
  #[serde(default = "LcsRequest::default_first")]
  pub str1: String,
  #[serde(default = "LcsRequest::default_second")]
  pub str2: String,
}

impl LcsRequest {
  fn default_first() -> String {
    "ABCDGH".into()
  }

  fn default_second() -> String {
    "AEDFHR".into()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixChainRequest {
  #[serde(default = "MatrixChainRequest::default_dimensions")]
  pub dimensions: Vec<i64>,
}

impl MatrixChainRequest {
  fn default_dimensions() -> Vec<i64> {
    vec![30, 35, 15, 5, 10, 20, 25]
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRequest {
  #[serde(flatten)]
  pub graph: GraphInput,
  #[serde(default = "default_start")]
  pub source: String,
  #[serde(default = "default_sink")]
  pub sink: String,
  /// Min-cost flow only: units to route, `null` for as much as possible.
  #[serde(default = "FlowRequest::default_demand")]
  pub demand: Option<f64>,
}

impl FlowRequest {
  fn default_demand() -> Option<f64> {
    Some(5.0)
  }
}

fn default_point() -> Vec<f64> {
  vec![2.0, 2.0]
}

/// Objective text parsed against the point's dimension; absent means sum of squares.
fn objective(source: Option<&str>, dim: usize) -> AlgoResult<Expr> {
  match source {
    Some(src) => Expr::parse(src, dim),
    None => Ok(Expr::sum_of_squares(dim)),
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientRequest {
  #[serde(default)]
  pub objective: Option<String>,
  #[serde(default = "default_point")]
  pub initial_point: Vec<f64>,
  #[serde(default)]
  pub learning_rate: Option<f64>,
  #[serde(default)]
  pub max_iterations: Option<usize>,
  #[serde(default)]
  pub tolerance: Option<f64>,
  #[serde(default)]
  pub convergence: Option<ConvergencePolicy>,
}

impl GradientRequest {
  fn settings(&self, base: &GradientConfig) -> GradientConfig {
    GradientConfig {
      learning_rate: self.learning_rate.unwrap_or(base.learning_rate),
      max_iterations: self.max_iterations.unwrap_or(base.max_iterations),
      tolerance: self.tolerance.unwrap_or(base.tolerance),
      convergence: self.convergence.unwrap_or(base.convergence),
      ..*base
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstrainedRequest {
  #[serde(default)]
  pub objective: Option<String>,
  #[serde(default = "default_point")]
  pub initial_point: Vec<f64>,
  #[serde(default)]
  pub constraints: Vec<ConstraintSpec>,
  /// `penalty` (default) or `augmented_lagrangian`.
  #[serde(default)]
  pub method: Option<String>,
  #[serde(default)]
  pub max_iterations: Option<usize>,
  #[serde(default)]
  pub tolerance: Option<f64>,
}

/// One algorithm invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum AlgorithmRequest {
  Dfs(TraversalRequest),
  Bfs(TraversalRequest),
  Dijkstra(TraversalRequest),
  Astar(TraversalRequest),
  Knapsack(KnapsackRequest),
  Lcs(LcsRequest),
  MatrixChain(MatrixChainRequest),
  MaxFlow(FlowRequest),
  MinCostFlow(FlowRequest),
  Simplex(LinearProgram),
  GradientDescent(GradientRequest),
  Constrained(ConstrainedRequest),
}

impl AlgorithmRequest {
  pub fn name(&self) -> &'static str {
    match self {
      AlgorithmRequest::Dfs(_) => "dfs",
      AlgorithmRequest::Bfs(_) => "bfs",
      AlgorithmRequest::Dijkstra(_) => "dijkstra",
      AlgorithmRequest::Astar(_) => "astar",
      AlgorithmRequest::Knapsack(_) => "knapsack",
      AlgorithmRequest::Lcs(_) => "lcs",
      AlgorithmRequest::MatrixChain(_) => "matrix_chain",
      AlgorithmRequest::MaxFlow(_) => "max_flow",
      AlgorithmRequest::MinCostFlow(_) => "min_cost_flow",
      AlgorithmRequest::Simplex(_) => "simplex",
      AlgorithmRequest::GradientDescent(_) => "gradient_descent",
      AlgorithmRequest::Constrained(_) => "constrained",
    }
  }

  pub fn from_json(text: &str) -> AlgoResult<Self> {
    Ok(serde_json::from_str(text)?)
  }
}

/// Runs `request` with step recording on and returns its trace.
#[instrument(level = "trace", skip_all, fields(algorithm = request.name()))]
pub fn run(request: &AlgorithmRequest, cfg: &EngineConfig) -> AlgoResult<Trace> {
  info!(algorithm = request.name(), "run started");
  let trace = match request {
    AlgorithmRequest::Dfs(r) => dfs(&r.graph.build(false)?, &r.start, r.end.as_deref(), StepRecorder::new()),
    AlgorithmRequest::Bfs(r) => bfs(&r.graph.build(false)?, &r.start, r.end.as_deref(), StepRecorder::new()),
    AlgorithmRequest::Dijkstra(r) => {
      dijkstra(&r.graph.build(false)?, &r.start, r.end.as_deref(), StepRecorder::new())
    }
    AlgorithmRequest::Astar(r) => astar(
      &r.graph.build(false)?,
      &r.start,
      r.end.as_deref(),
      r.heuristic,
      StepRecorder::new(),
    ),
    AlgorithmRequest::Knapsack(r) => knapsack(&r.weights, &r.values, r.capacity, StepRecorder::new()),
    AlgorithmRequest::Lcs(r) => lcs(&r.str1, &r.str2, StepRecorder::new()),
    AlgorithmRequest::MatrixChain(r) => matrix_chain(&r.dimensions, StepRecorder::new()),
    AlgorithmRequest::MaxFlow(r) => max_flow(
      &r.graph.build(true)?,
      &r.source,
      &r.sink,
      cfg.flow_max_augmentations,
      StepRecorder::new(),
    ),
    AlgorithmRequest::MinCostFlow(r) => min_cost_flow(
      &r.graph.build(true)?,
      &r.source,
      &r.sink,
      r.demand,
      cfg.flow_max_augmentations,
      StepRecorder::new(),
    ),
    AlgorithmRequest::Simplex(lp) => simplex(lp, cfg.simplex_max_pivots, StepRecorder::new()),
    AlgorithmRequest::GradientDescent(r) => {
      let f = objective(r.objective.as_deref(), r.initial_point.len())?;
      gradient_descent(&f, &r.initial_point, &r.settings(&cfg.gradient), StepRecorder::new())
    }
    AlgorithmRequest::Constrained(r) => {
      let f = objective(r.objective.as_deref(), r.initial_point.len())?;
      let method = match &r.method {
        Some(name) => name.parse()?,
        None => Method::default(),
      };
      let mut settings = cfg.constrained;
      settings.max_iterations = r.max_iterations.unwrap_or(settings.max_iterations);
      settings.tolerance = r.tolerance.unwrap_or(settings.tolerance);
      constrained(&f, &r.constraints, &r.initial_point, method, &settings, StepRecorder::new())
    }
  }?;
  info!(algorithm = request.name(), steps = trace.len(), outcome = %trace.outcome, "run finished");
  Ok(trace)
}

/// One algorithm family and the selectors it answers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Family {
  pub name: &'static str,
  pub algorithms: Vec<&'static str>,
  /// Selectors of this family the complexity estimator accepts.
  pub benchmarkable: Vec<&'static str>,
}

/// The families and algorithms this engine serves.
pub fn catalogue() -> Vec<Family> {
  let families: [(&'static str, &[&'static str]); 3] = [
    ("graph_traversal", &["dfs", "bfs", "dijkstra", "astar"]),
    ("dynamic_programming", &["knapsack", "lcs", "matrix_chain"]),
    (
      "optimization",
      &["simplex", "max_flow", "min_cost_flow", "gradient_descent", "constrained"],
    ),
  ];
  families
    .into_iter()
    .map(|(name, algorithms)| Family {
      name,
      algorithms: algorithms.to_vec(),
      benchmarkable: algorithms
        .iter()
        .copied()
        .filter(|a| a.parse::<AlgorithmSelector>().is_ok())
        .collect(),
    })
    .collect()
}
