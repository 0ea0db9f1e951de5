//! Benchmarks for the family modules with step recording disabled.
//!
//! Run with: cargo bench --bench family_modules

use algotrace::benchmark::{AlgorithmSelector, generate};
use algotrace::config::EngineConfig;
use algotrace::dp::lcs;
use algotrace::recorder::StepRecorder;
use algotrace::traversal::dijkstra;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn bench_generated(c: &mut Criterion) {
  let cfg = EngineConfig::default();
  for selector in [
    AlgorithmSelector::Bfs,
    AlgorithmSelector::Dijkstra,
    AlgorithmSelector::Knapsack,
    AlgorithmSelector::MatrixChain,
    AlgorithmSelector::MaxFlow,
    AlgorithmSelector::Simplex,
  ] {
    let mut group = c.benchmark_group(selector.name());
    for size in [16, 64, 256] {
      let workload = match generate(selector, size, cfg.benchmark.seed) {
        Ok(w) => w,
        Err(e) => panic!("{selector} at {size}: {e}"),
      };
      group.bench_with_input(BenchmarkId::from_parameter(size), &workload, |b, w| {
        b.iter(|| black_box(w.run(&cfg)))
      });
    }
    group.finish();
  }
}

/// Recording on vs. off for the same run.
fn bench_recording_overhead(c: &mut Criterion) {
  let graph = algotrace::Graph::sample();
  let mut group = c.benchmark_group("recording");
  group.bench_function("dijkstra_recorded", |b| {
    b.iter(|| black_box(dijkstra(&graph, "A", Some("F"), StepRecorder::new())))
  });
  group.bench_function("dijkstra_disabled", |b| {
    b.iter(|| black_box(dijkstra(&graph, "A", Some("F"), StepRecorder::disabled())))
  });
  let (a, b) = ("ACGTTGCAACGTAGCT".repeat(8), "TGCAACGTTACGGATC".repeat(8));
  group.bench_function("lcs_recorded", |bench| {
    bench.iter(|| black_box(lcs(&a, &b, StepRecorder::new())))
  });
  group.bench_function("lcs_disabled", |bench| {
    bench.iter(|| black_box(lcs(&a, &b, StepRecorder::disabled())))
  });
  group.finish();
}

criterion_group!(benches, bench_generated, bench_recording_overhead);
criterion_main!(benches);
