//! Complexity estimator: time each input size, then fit a growth class.
//!
//! Sizes are independent, so with `parallel` enabled each size is measured on its own blocking
//! worker. The trials of one size always run back to back on that worker, which is also the
//! thread the memory probe observes.

use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::fit::fit_complexity;
use super::generators::{AlgorithmSelector, generate};
use super::memory::{MemoryProbe, tracking_installed};
use crate::config::EngineConfig;
use crate::error::{AlgoError, AlgoResult};
use crate::types::BenchmarkResult;

/// Mean time and peak memory for one input size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
  pub seconds: f64,
  pub peak_bytes: u64,
}

/// Rejects empty, zero or non-increasing size lists.
pub fn validate_sizes(sizes: &[usize]) -> AlgoResult<()> {
  if sizes.is_empty() {
    return Err(AlgoError::invalid("at least one input size is required"));
  }
  if sizes.contains(&0) {
    return Err(AlgoError::invalid("input sizes must be positive"));
  }
  if let Some(w) = sizes.windows(2).find(|w| w[0] >= w[1]) {
    return Err(AlgoError::invalid(format!(
      "input sizes must be strictly increasing ({} is followed by {})",
      w[0], w[1]
    )));
  }
  Ok(())
}

/// Generates the `size` instance and times `trials` runs of it on the current thread.
pub fn measure(selector: AlgorithmSelector, size: usize, cfg: &EngineConfig) -> AlgoResult<Sample> {
  let bench = &cfg.benchmark;
  let workload = generate(selector, size, bench.seed)?;
  if bench.warmup {
    workload.run(cfg)?;
  }
  let mut total = 0.0;
  let mut peak = 0u64;
  for _ in 0..bench.trials {
    let probe = MemoryProbe::start();
    let started = Instant::now();
    let trace = workload.run(cfg)?;
    total += started.elapsed().as_secs_f64();
    peak = peak.max(probe.peak_bytes());
    drop(trace);
  }
  let sample = Sample {
    seconds: total / bench.trials as f64,
    peak_bytes: peak,
  };
  debug!(%selector, size, seconds = sample.seconds, bytes = sample.peak_bytes, "measured");
  Ok(sample)
}

/// Measures every size of `sizes` and fits a growth class to the timings.
pub struct Estimator {
  cfg: EngineConfig,
}

impl Estimator {
  pub fn new(cfg: EngineConfig) -> Self {
    Self { cfg }
  }

  #[instrument(level = "trace", skip(self))]
  pub async fn estimate(
    &self,
    selector: AlgorithmSelector,
    sizes: &[usize],
  ) -> AlgoResult<BenchmarkResult> {
    validate_sizes(sizes)?;
    self.cfg.validate()?;
    info!(%selector, sizes = sizes.len(), trials = self.cfg.benchmark.trials, "benchmark started");

    let samples = if self.cfg.benchmark.parallel {
      self.measure_parallel(selector, sizes).await?
    } else {
      let mut out = Vec::with_capacity(sizes.len());
      for &size in sizes {
        let cfg = self.cfg;
        let sample = tokio::task::spawn_blocking(move || measure(selector, size, &cfg))
          .await
          .unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()))?;
        out.push(sample);
      }
      out
    };

    let execution_times: Vec<f64> = samples.iter().map(|s| s.seconds).collect();
    let memory_usage = samples.iter().map(|s| s.peak_bytes).collect();
    if !tracking_installed() {
      warn!("no tracking allocator installed; memory usage reads as zero");
    }
    let estimated_complexity = fit_complexity(sizes, &execution_times);
    info!(%selector, %estimated_complexity, "benchmark finished");
    Ok(BenchmarkResult {
      input_sizes: sizes.to_vec(),
      execution_times,
      memory_usage,
      estimated_complexity,
    })
  }

  async fn measure_parallel(
    &self,
    selector: AlgorithmSelector,
    sizes: &[usize],
  ) -> AlgoResult<Vec<Sample>> {
    let mut set = JoinSet::new();
    for (idx, &size) in sizes.iter().enumerate() {
      let cfg = self.cfg;
      set.spawn_blocking(move || (idx, measure(selector, size, &cfg)));
    }
    let mut slots: Vec<Option<Sample>> = vec![None; sizes.len()];
    while let Some(joined) = set.join_next().await {
      let (idx, sample) = joined.unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()));
      slots[idx] = Some(sample?);
    }
    slots
      .into_iter()
      .map(|s| s.ok_or_else(|| AlgoError::invalid("a benchmark worker produced no sample")))
      .collect()
  }
}

/// [Estimator::estimate] with a one-off estimator.
pub async fn estimate_complexity(
  selector: AlgorithmSelector,
  sizes: &[usize],
  cfg: &EngineConfig,
) -> AlgoResult<BenchmarkResult> {
  Estimator::new(*cfg).estimate(selector, sizes).await
}
