//! Deterministic input generators, one per benchmarkable algorithm.
//!
//! Every generator is driven by a seeded [StdRng], so the same `(selector, size, seed)` always
//! yields the same instance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::EngineConfig;
use crate::dp::{knapsack, lcs, matrix_chain};
use crate::error::{AlgoError, AlgoResult};
use crate::optimization::{Expr, LinearProgram, gradient_descent, max_flow, min_cost_flow, simplex};
use crate::recorder::StepRecorder;
use crate::traversal::{Heuristic, astar, bfs, dfs, dijkstra};
use crate::types::{Edge, Graph, Node, Trace};

/// Algorithms the complexity estimator can generate inputs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmSelector {
  Dfs,
  Bfs,
  Dijkstra,
  Astar,
  Knapsack,
  Lcs,
  MatrixChain,
  MaxFlow,
  MinCostFlow,
  Simplex,
  GradientDescent,
}

impl AlgorithmSelector {
  pub const ALL: [AlgorithmSelector; 11] = [
    AlgorithmSelector::Dfs,
    AlgorithmSelector::Bfs,
    AlgorithmSelector::Dijkstra,
    AlgorithmSelector::Astar,
    AlgorithmSelector::Knapsack,
    AlgorithmSelector::Lcs,
    AlgorithmSelector::MatrixChain,
    AlgorithmSelector::MaxFlow,
    AlgorithmSelector::MinCostFlow,
    AlgorithmSelector::Simplex,
    AlgorithmSelector::GradientDescent,
  ];

  pub fn name(self) -> &'static str {
    match self {
      AlgorithmSelector::Dfs => "dfs",
      AlgorithmSelector::Bfs => "bfs",
      AlgorithmSelector::Dijkstra => "dijkstra",
      AlgorithmSelector::Astar => "astar",
      AlgorithmSelector::Knapsack => "knapsack",
      AlgorithmSelector::Lcs => "lcs",
      AlgorithmSelector::MatrixChain => "matrix_chain",
      AlgorithmSelector::MaxFlow => "max_flow",
      AlgorithmSelector::MinCostFlow => "min_cost_flow",
      AlgorithmSelector::Simplex => "simplex",
      AlgorithmSelector::GradientDescent => "gradient_descent",
    }
  }
}

impl fmt::Display for AlgorithmSelector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for AlgorithmSelector {
  type Err = AlgoError;

  fn from_str(s: &str) -> AlgoResult<Self> {
    let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
    Self::ALL
      .into_iter()
      .find(|sel| sel.name() == wanted)
      .ok_or_else(|| AlgoError::invalid(format!("unknown algorithm '{s}'")))
  }
}

/// A generated input, ready to run with recording disabled.
#[derive(Debug, Clone)]
pub enum Workload {
  Traversal {
    selector: AlgorithmSelector,
    graph: Graph,
    start: String,
    end: String,
  },
  Knapsack {
    weights: Vec<f64>,
    values: Vec<f64>,
    capacity: f64,
  },
  Lcs {
    first: String,
    second: String,
  },
  MatrixChain {
    dimensions: Vec<i64>,
  },
  Flow {
    min_cost: bool,
    graph: Graph,
    source: String,
    sink: String,
  },
  Simplex(LinearProgram),
  GradientDescent {
    objective: Expr,
    point: Vec<f64>,
  },
}

fn node_id(i: usize) -> String {
  format!("n{i}")
}

/// Connected undirected graph on a line: node `i` sits at `(i, 0)` and every edge weighs at
/// least the distance between its ends, so the Euclidean heuristic stays admissible.
fn traversal_graph(n: usize, rng: &mut StdRng) -> AlgoResult<Graph> {
  let nodes = (0..n)
    .map(|i| Node::new(node_id(i)).with_pos(i as f64, 0.0))
    .collect();
  let mut edges = Vec::with_capacity(2 * n);
  let mut link = |a: usize, b: usize, rng: &mut StdRng| {
    let w = a.abs_diff(b) as f64 + rng.gen_range(0..5) as f64;
    edges.push(Edge::weighted(node_id(a), node_id(b), w));
  };
  for i in 1..n {
    link(i - 1, i, &mut *rng);
  }
  for _ in 0..n {
    let a = rng.gen_range(0..n);
    let b = rng.gen_range(0..n);
    if a != b {
      link(a, b, &mut *rng);
    }
  }
  Graph::undirected(nodes, edges)
}

/// Directed network with a spine `n0 -> n1 -> ...` and extra forward edges.
fn flow_graph(n: usize, rng: &mut StdRng) -> AlgoResult<Graph> {
  let nodes = (0..n).map(|i| Node::new(node_id(i))).collect();
  let mut edges = Vec::with_capacity(2 * n);
  let mut arc = |a: usize, b: usize, rng: &mut StdRng| {
    let cap = rng.gen_range(1..=20) as f64;
    let cost = rng.gen_range(1..=10) as f64;
    edges.push(Edge::new(node_id(a), node_id(b)).with_capacity(cap).with_cost(cost));
  };
  for i in 1..n {
    arc(i - 1, i, &mut *rng);
  }
  for _ in 0..n {
    let a = rng.gen_range(0..n);
    let b = rng.gen_range(0..n);
    if a < b {
      arc(a, b, &mut *rng);
    }
  }
  Graph::new(nodes, edges)
}

/// Builds the instance of `selector` at `size`.
pub fn generate(selector: AlgorithmSelector, size: usize, seed: u64) -> AlgoResult<Workload> {
  if size == 0 {
    return Err(AlgoError::invalid("input size must be positive"));
  }
  let mut rng = StdRng::seed_from_u64(seed ^ (size as u64).rotate_left(32));
  let workload = match selector {
    AlgorithmSelector::Dfs
    | AlgorithmSelector::Bfs
    | AlgorithmSelector::Dijkstra
    | AlgorithmSelector::Astar => {
      let n = size.max(2);
      Workload::Traversal {
        selector,
        graph: traversal_graph(n, &mut rng)?,
        start: node_id(0),
        end: node_id(n - 1),
      }
    }
    AlgorithmSelector::Knapsack => Workload::Knapsack {
      weights: (0..size).map(|_| rng.gen_range(1..=20) as f64).collect(),
      values: (0..size).map(|_| rng.gen_range(1..=50) as f64).collect(),
      capacity: (5 * size) as f64,
    },
    AlgorithmSelector::Lcs => {
      const ALPHABET: &[u8] = b"ACGT";
      let mut word = || -> String {
        (0..size)
          .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
          .collect()
      };
      let first = word();
      let second = word();
      Workload::Lcs { first, second }
    }
    AlgorithmSelector::MatrixChain => Workload::MatrixChain {
      dimensions: (0..=size).map(|_| rng.gen_range(1..=50i64)).collect(),
    },
    AlgorithmSelector::MaxFlow | AlgorithmSelector::MinCostFlow => {
      let n = size.max(2);
      Workload::Flow {
        min_cost: selector == AlgorithmSelector::MinCostFlow,
        graph: flow_graph(n, &mut rng)?,
        source: node_id(0),
        sink: node_id(n - 1),
      }
    }
    AlgorithmSelector::Simplex => {
      let mut coeff = |lo: i32, hi: i32| rng.gen_range(lo..=hi) as f64;
      let constraints: Vec<Vec<f64>> = (0..size)
        .map(|_| (0..size).map(|_| coeff(1, 9)).collect())
        .collect();
      let bounds: Vec<f64> = (0..size).map(|_| coeff(10, 100)).collect();
      let objective: Vec<f64> = (0..size).map(|_| coeff(1, 9)).collect();
      Workload::Simplex(LinearProgram {
        objective,
        constraints,
        bounds,
        relations: Vec::new(),
        maximize: true,
      })
    }
    AlgorithmSelector::GradientDescent => Workload::GradientDescent {
      objective: Expr::sum_of_squares(size),
      point: (0..size).map(|_| rng.gen_range(-5.0..5.0)).collect(),
    },
  };
  Ok(workload)
}

impl Workload {
  /// Runs the instance with step recording disabled.
  pub fn run(&self, cfg: &EngineConfig) -> AlgoResult<Trace> {
    match self {
      Workload::Traversal {
        selector,
        graph,
        start,
        end,
      } => {
        let end = Some(end.as_str());
        match selector {
          AlgorithmSelector::Dfs => dfs(graph, start, end, StepRecorder::disabled()),
          AlgorithmSelector::Bfs => bfs(graph, start, end, StepRecorder::disabled()),
          AlgorithmSelector::Astar => {
            astar(graph, start, end, Heuristic::Euclidean, StepRecorder::disabled())
          }
          _ => dijkstra(graph, start, end, StepRecorder::disabled()),
        }
      }
      Workload::Knapsack {
        weights,
        values,
        capacity,
      } => knapsack(weights, values, *capacity, StepRecorder::disabled()),
      Workload::Lcs { first, second } => lcs(first, second, StepRecorder::disabled()),
      Workload::MatrixChain { dimensions } => matrix_chain(dimensions, StepRecorder::disabled()),
      Workload::Flow {
        min_cost,
        graph,
        source,
        sink,
      } => {
        let cap = cfg.flow_max_augmentations;
        if *min_cost {
          min_cost_flow(graph, source, sink, None, cap, StepRecorder::disabled())
        } else {
          max_flow(graph, source, sink, cap, StepRecorder::disabled())
        }
      }
      Workload::Simplex(lp) => simplex(lp, cfg.simplex_max_pivots, StepRecorder::disabled()),
      Workload::GradientDescent { objective, point } => {
        gradient_descent(objective, point, &cfg.gradient, StepRecorder::disabled())
      }
    }
  }
}
