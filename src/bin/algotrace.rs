//! CLI: run an algorithm request or estimate an algorithm's complexity.
//!
//! Usage:
//!   `algotrace run <request.json> [--output trace.json]`
//!   `algotrace bench <selector> --sizes 100,200,400 [--trials N]`
//!   `algotrace sample`
//!   `algotrace list`
//!
//! Set RUST_LOG=algotrace=trace for span-level detail.

use std::fs;
use std::path::PathBuf;
use std::process;

use algotrace::benchmark::TrackingAllocator;
use algotrace::dispatch::{self, AlgorithmRequest};
use algotrace::trace_io::{TraceDocument, save_trace};
use algotrace::{AlgorithmSelector, EngineConfig, Graph, estimate_complexity};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

/// Step-by-step algorithm runs and empirical complexity estimates.
#[derive(Parser, Debug)]
#[command(name = "algotrace")]
#[command(
  after_help = r#"Environment variables (flags take precedence when both are given):
  ALGOTRACE_TRIALS                  Timed runs per input size (default 3)
  ALGOTRACE_PARALLEL                Measure sizes concurrently (default true)
  ALGOTRACE_SEED                    Seed for generated benchmark inputs
  ALGOTRACE_SIMPLEX_MAX_PIVOTS      Pivot cap for simplex (default 10000)
  ALGOTRACE_FLOW_MAX_AUGMENTATIONS  Augmentation cap for flows (default 10000)

Examples:
  algotrace run request.json --output trace.json
  algotrace bench lcs --sizes 100,200,400,800"#
)]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run one algorithm request (JSON tagged by "algorithm") and print its trace.
  Run {
    #[arg(value_name = "request.json")]
    request: PathBuf,
    /// Also save the run as a trace document.
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
  },
  /// Estimate the growth class of an algorithm over increasing input sizes.
  Bench {
    #[arg(value_name = "selector")]
    selector: AlgorithmSelector,
    #[arg(long, value_delimiter = ',', required = true)]
    sizes: Vec<usize>,
    #[arg(long)]
    trials: Option<usize>,
    /// Measure sizes one after another.
    #[arg(long)]
    sequential: bool,
  },
  /// Print the six-node sample graph.
  Sample,
  /// List algorithm families and their algorithms.
  List,
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
  eprintln!("{context}: {err}");
  process::exit(1);
}

fn print_json(value: &impl serde::Serialize) {
  match serde_json::to_string_pretty(value) {
    Ok(json) => println!("{json}"),
    Err(e) => fail("Error encoding output", e),
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let mut cfg = EngineConfig::from_env().unwrap_or_else(|e| fail("Error in environment", e));

  match args.command {
    Command::Run { request, output } => {
      let text = fs::read_to_string(&request)
        .unwrap_or_else(|e| fail(&format!("Error reading {}", request.display()), e));
      let req = AlgorithmRequest::from_json(&text).unwrap_or_else(|e| fail("Error parsing request", e));
      let started = Utc::now();
      let trace = dispatch::run(&req, &cfg).unwrap_or_else(|e| fail("Run failed", e));
      let finished = Utc::now();
      print_json(&trace);
      if let Some(path) = output {
        save_trace(&path, &TraceDocument::new(trace, started, finished))
          .unwrap_or_else(|e| fail(&format!("Error writing {}", path.display()), e));
        info!(path = %path.display(), "trace saved");
      }
    }
    Command::Bench {
      selector,
      sizes,
      trials,
      sequential,
    } => {
      if let Some(t) = trials {
        cfg.benchmark.trials = t;
      }
      if sequential {
        cfg.benchmark.parallel = false;
      }
      info!(%selector, ?sizes, trials = cfg.benchmark.trials, "options (env or flags)");
      let result = estimate_complexity(selector, &sizes, &cfg)
        .await
        .unwrap_or_else(|e| fail("Benchmark failed", e));
      print_json(&result);
    }
    Command::Sample => print_json(&Graph::sample()),
    Command::List => print_json(&dispatch::catalogue()),
  }
}
