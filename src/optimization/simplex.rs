//! Two-phase tableau simplex for linear programs over `x >= 0`.
//!
//! The tableau is an `ndarray::Array2`: one row per constraint plus the objective row, one
//! column per decision, slack, surplus and artificial variable plus the right-hand side.
//! Entering columns follow Bland's rule; the minimum-ratio test breaks ties on the smaller basic
//! index. One step is recorded per pivot.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{AlgoError, AlgoResult};
use crate::recorder::StepRecorder;
use crate::types::{OptimizationKind, OptimizationStep, RunOutcome, Trace};

const EPS: f64 = 1e-10;
const FEASIBILITY_EPS: f64 = 1e-8;

/// Sense of one constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Relation {
  #[default]
  #[serde(rename = "<=", alias = "le")]
  LessEqual,
  #[serde(rename = ">=", alias = "ge")]
  GreaterEqual,
  #[serde(rename = "=", alias = "==", alias = "eq")]
  Equal,
}

impl Relation {
  fn flipped(self) -> Self {
    match self {
      Relation::LessEqual => Relation::GreaterEqual,
      Relation::GreaterEqual => Relation::LessEqual,
      Relation::Equal => Relation::Equal,
    }
  }
}

/// `min`/`max objective·x` subject to `constraints[i]·x (relation) bounds[i]`, `x >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearProgram {
  pub objective: Vec<f64>,
  pub constraints: Vec<Vec<f64>>,
  pub bounds: Vec<f64>,
  /// One per constraint row; omitted means all `<=`.
  #[serde(default)]
  pub relations: Vec<Relation>,
  #[serde(default)]
  pub maximize: bool,
}

impl LinearProgram {
  fn validate(&self) -> AlgoResult<()> {
    let n = self.objective.len();
    if n == 0 {
      return Err(AlgoError::invalid("objective needs at least one coefficient"));
    }
    if self.constraints.len() != self.bounds.len() {
      return Err(AlgoError::invalid(format!(
        "{} constraint rows but {} bounds",
        self.constraints.len(),
        self.bounds.len()
      )));
    }
    if !self.relations.is_empty() && self.relations.len() != self.constraints.len() {
      return Err(AlgoError::invalid(format!(
        "{} relations for {} constraint rows",
        self.relations.len(),
        self.constraints.len()
      )));
    }
    if let Some((i, row)) = self
      .constraints
      .iter()
      .enumerate()
      .find(|(_, r)| r.len() != n)
    {
      return Err(AlgoError::invalid(format!(
        "constraint row {i} has {} coefficients, expected {n}",
        row.len()
      )));
    }
    let mut all = self
      .objective
      .iter()
      .chain(self.bounds.iter())
      .chain(self.constraints.iter().flatten());
    if all.any(|v| !v.is_finite()) {
      return Err(AlgoError::invalid("linear program coefficients must be finite"));
    }
    Ok(())
  }

  fn relation(&self, row: usize) -> Relation {
    self.relations.get(row).copied().unwrap_or_default()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LpStatus {
  Optimal,
  Unbounded,
  IterationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  One,
  Two,
}

struct Tableau {
  t: Array2<f64>,
  basis: Vec<usize>,
  /// Decision variables.
  n: usize,
  slack_offset: usize,
  artificial_offset: usize,
  /// Columns excluding the right-hand side.
  total: usize,
}

impl Tableau {
  fn build(lp: &LinearProgram) -> Self {
    let n = lp.objective.len();
    let m = lp.constraints.len();
    let mut rows: Vec<(Vec<f64>, Relation, f64)> = (0..m)
      .map(|i| (lp.constraints[i].clone(), lp.relation(i), lp.bounds[i]))
      .collect();
    // A non-negative right-hand side lets slack/artificial columns form the first basis.
    for (coeffs, rel, rhs) in &mut rows {
      if *rhs < 0.0 {
        *rhs = -*rhs;
        coeffs.iter_mut().for_each(|c| *c = -*c);
        *rel = rel.flipped();
      }
    }
    let slack_count = rows
      .iter()
      .filter(|r| r.1 != Relation::Equal)
      .count();
    let artificial_count = rows
      .iter()
      .filter(|r| r.1 != Relation::LessEqual)
      .count();
    let slack_offset = n;
    let artificial_offset = n + slack_count;
    let total = artificial_offset + artificial_count;

    let mut t = Array2::<f64>::zeros((m + 1, total + 1));
    let mut basis = vec![0usize; m];
    let (mut s, mut a) = (slack_offset, artificial_offset);
    for (i, (coeffs, rel, rhs)) in rows.iter().enumerate() {
      for (j, &c) in coeffs.iter().enumerate() {
        t[[i, j]] = c;
      }
      t[[i, total]] = *rhs;
      match rel {
        Relation::LessEqual => {
          t[[i, s]] = 1.0;
          basis[i] = s;
          s += 1;
        }
        Relation::GreaterEqual => {
          t[[i, s]] = -1.0;
          s += 1;
          t[[i, a]] = 1.0;
          basis[i] = a;
          a += 1;
        }
        Relation::Equal => {
          t[[i, a]] = 1.0;
          basis[i] = a;
          a += 1;
        }
      }
    }
    Self {
      t,
      basis,
      n,
      slack_offset,
      artificial_offset,
      total,
    }
  }

  fn m(&self) -> usize {
    self.basis.len()
  }

  fn has_artificials(&self) -> bool {
    self.artificial_offset < self.total
  }

  /// Phase I: maximize `-Σ artificial`, expressed in the starting basis.
  fn set_phase_one_objective(&mut self) {
    let m = self.m();
    self.t.row_mut(m).fill(0.0);
    for i in 0..m {
      if self.basis[i] >= self.artificial_offset {
        let row = self.t.row(i).to_owned();
        self.t.row_mut(m).scaled_add(1.0, &row);
      }
    }
    for col in self.artificial_offset..self.total {
      self.t[[m, col]] = 0.0;
    }
  }

  /// Phase II: maximize `c·x`, expressed in the current basis.
  fn set_phase_two_objective(&mut self, c: &[f64]) {
    let m = self.m();
    self.t.row_mut(m).fill(0.0);
    for (j, &cj) in c.iter().enumerate() {
      self.t[[m, j]] = cj;
    }
    for i in 0..m {
      let b = self.basis[i];
      let factor = self.t[[m, b]];
      if factor.abs() > 1e-12 {
        let row = self.t.row(i).to_owned();
        self.t.row_mut(m).scaled_add(-factor, &row);
      }
    }
  }

  /// Phase I objective left at the optimum: the total artificial infeasibility.
  fn infeasibility(&self) -> f64 {
    self.t[[self.m(), self.total]]
  }

  fn entering(&self, limit: usize) -> Option<usize> {
    let m = self.m();
    (0..limit).find(|&col| self.t[[m, col]] > EPS)
  }

  fn leaving(&self, entering: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for row in 0..self.m() {
      let a = self.t[[row, entering]];
      if a <= EPS {
        continue;
      }
      let ratio = self.t[[row, self.total]] / a;
      let better = match best {
        None => true,
        Some((r, b)) => {
          ratio < b - 1e-12 || ((ratio - b).abs() <= 1e-12 && self.basis[row] < self.basis[r])
        }
      };
      if better {
        best = Some((row, ratio));
      }
    }
    best.map(|(r, _)| r)
  }

  fn pivot(&mut self, row: usize, col: usize) {
    let p = self.t[[row, col]];
    self.t.row_mut(row).mapv_inplace(|v| v / p);
    let pivot_row = self.t.row(row).to_owned();
    for r in 0..self.t.nrows() {
      if r == row {
        continue;
      }
      let factor = self.t[[r, col]];
      if factor.abs() < 1e-12 {
        continue;
      }
      self.t.row_mut(r).scaled_add(-factor, &pivot_row);
    }
    self.basis[row] = col;
  }

  /// Current basic solution restricted to the decision variables.
  fn point(&self) -> Vec<f64> {
    let mut x = vec![0.0; self.n];
    for (row, &b) in self.basis.iter().enumerate() {
      if b < self.n {
        x[b] = self.t[[row, self.total]];
      }
    }
    x
  }

  fn name(&self, col: usize) -> String {
    if col < self.slack_offset {
      format!("x{}", col + 1)
    } else if col < self.artificial_offset {
      format!("s{}", col - self.slack_offset + 1)
    } else {
      format!("a{}", col - self.artificial_offset + 1)
    }
  }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
  a.iter().zip(b).map(|(x, y)| x * y).sum()
}

struct Run<'a> {
  lp: &'a LinearProgram,
  tab: Tableau,
  pivots: usize,
  max_pivots: usize,
  recorder: StepRecorder<OptimizationStep>,
}

impl Run<'_> {
  fn record(&mut self, iteration: usize, objective: Option<f64>, message: String) {
    let point = self.tab.point();
    self.recorder.record_with(|| {
      OptimizationStep::new(
        OptimizationKind::Constrained,
        iteration,
        point,
        objective,
        message,
      )
    });
  }

  fn current_objective(&self) -> f64 {
    dot(&self.lp.objective, &self.tab.point())
  }

  fn pivot(&mut self, row: usize, col: usize, phase: Phase) {
    let leaving = self.tab.name(self.tab.basis[row]);
    let entering = self.tab.name(col);
    self.tab.pivot(row, col);
    self.pivots += 1;
    let objective = self.current_objective();
    debug!(pivot = self.pivots, %entering, %leaving, objective, "simplex pivot");
    let phase = if phase == Phase::One { "I" } else { "II" };
    self.record(
      self.pivots,
      Some(objective),
      format!("Phase {phase} pivot: {entering} enters, {leaving} leaves"),
    );
  }

  fn iterate(&mut self, phase: Phase) -> LpStatus {
    let limit = match phase {
      Phase::One => self.tab.total,
      Phase::Two => self.tab.artificial_offset,
    };
    while self.pivots < self.max_pivots {
      let Some(col) = self.tab.entering(limit) else {
        return LpStatus::Optimal;
      };
      let Some(row) = self.tab.leaving(col) else {
        return LpStatus::Unbounded;
      };
      self.pivot(row, col, phase);
    }
    LpStatus::IterationLimit
  }

  /// Pivots zero-valued artificial variables out of the basis so phase II cannot raise them.
  /// Rows with no other non-zero entry are redundant and keep their artificial.
  fn drive_out_artificials(&mut self) {
    for row in 0..self.tab.m() {
      if self.tab.basis[row] < self.tab.artificial_offset {
        continue;
      }
      let col = (0..self.tab.artificial_offset).find(|&c| self.tab.t[[row, c]].abs() > EPS);
      if let Some(col) = col {
        self.pivot(row, col, Phase::One);
      }
    }
  }

  fn finish(mut self, outcome: RunOutcome, objective: Option<f64>, message: String) -> Trace {
    info!(pivots = self.pivots, %outcome, "simplex finished");
    // the terminal step follows the last pivot
    self.record(self.pivots + 1, objective, message);
    Trace::from_optimization("simplex", outcome, self.recorder.finalize())
  }
}

/// Solves `lp`, recording one step per pivot, bracketed by an initial-basis step and a terminal
/// step. Infeasible and unbounded programs end normally with the matching [RunOutcome].
#[instrument(level = "trace", skip(lp, recorder))]
pub fn simplex(
  lp: &LinearProgram,
  max_pivots: usize,
  recorder: StepRecorder<OptimizationStep>,
) -> AlgoResult<Trace> {
  lp.validate()?;
  let maximize_coeffs: Vec<f64> = if lp.maximize {
    lp.objective.clone()
  } else {
    lp.objective.iter().map(|c| -c).collect()
  };

  let mut run = Run {
    lp,
    tab: Tableau::build(lp),
    pivots: 0,
    max_pivots,
    recorder,
  };
  let start = run.current_objective();
  run.record(0, Some(start), "Initial basis: slack and artificial variables".into());

  if run.tab.has_artificials() {
    run.tab.set_phase_one_objective();
    match run.iterate(Phase::One) {
      LpStatus::Optimal => {}
      _ => return Ok(limit_reached(run)),
    }
    let infeasibility = run.tab.infeasibility();
    if infeasibility > FEASIBILITY_EPS {
      return Ok(run.finish(
        RunOutcome::Infeasible,
        None,
        format!("Infeasible: no point satisfies every constraint (residual {infeasibility:.3e})"),
      ));
    }
    run.drive_out_artificials();
  }

  run.tab.set_phase_two_objective(&maximize_coeffs);
  match run.iterate(Phase::Two) {
    LpStatus::Optimal => {
      let value = run.current_objective();
      let x = run.tab.point();
      Ok(run.finish(
        RunOutcome::Completed,
        Some(value),
        format!("Optimal solution {x:?} with objective value {value}"),
      ))
    }
    LpStatus::Unbounded => Ok(run.finish(
      RunOutcome::Unbounded,
      None,
      "Unbounded: the objective improves without limit".into(),
    )),
    LpStatus::IterationLimit => Ok(limit_reached(run)),
  }
}

fn limit_reached(run: Run<'_>) -> Trace {
  warn!(pivots = run.pivots, "simplex stopped at the pivot limit");
  let value = run.current_objective();
  let msg = format!("Stopped after {} pivots without reaching an optimum", run.pivots);
  run.finish(RunOutcome::IterationLimit, Some(value), msg)
}
