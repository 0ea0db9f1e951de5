//! Trace documents: a recorded run saved to disk as JSON.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AlgoError, AlgoResult};
use crate::types::{RunOutcome, Trace, TraceSteps};

/// Current document format version.
pub const TRACE_FORMAT_VERSION: u32 = 1;

/// Root structure of a trace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDocument {
  pub version: u32,
  pub run_id: Uuid,
  pub algorithm: String,
  /// RFC 3339 timestamp taken before the run started.
  pub started_at: String,
  /// RFC 3339 timestamp taken after the run returned.
  pub finished_at: String,
  pub outcome: RunOutcome,
  pub steps: TraceSteps,
}

impl TraceDocument {
  /// Wraps `trace` with a fresh run id and the given run window.
  pub fn new(trace: Trace, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
    Self {
      version: TRACE_FORMAT_VERSION,
      run_id: Uuid::new_v4(),
      algorithm: trace.algorithm,
      started_at: started_at.to_rfc3339(),
      finished_at: finished_at.to_rfc3339(),
      outcome: trace.outcome,
      steps: trace.steps,
    }
  }

  /// The run as a [Trace] again.
  pub fn into_trace(self) -> Trace {
    Trace {
      algorithm: self.algorithm,
      outcome: self.outcome,
      steps: self.steps,
    }
  }
}

/// Writes `doc` to `path` as pretty JSON, creating parent directories as needed.
#[instrument(level = "trace", skip(path, doc))]
pub fn save_trace(path: &Path, doc: &TraceDocument) -> AlgoResult<()> {
  let json = serde_json::to_string_pretty(doc)?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)?;
  Ok(())
}

/// Loads a trace document. Documents from a newer format version are rejected.
#[instrument(level = "trace", skip(path))]
pub fn load_trace(path: &Path) -> AlgoResult<TraceDocument> {
  let bytes = std::fs::read(path)?;
  let doc: TraceDocument = serde_json::from_slice(&bytes)?;
  if doc.version > TRACE_FORMAT_VERSION {
    return Err(AlgoError::invalid(format!(
      "trace format version {} is newer than supported version {}",
      doc.version, TRACE_FORMAT_VERSION
    )));
  }
  Ok(doc)
}
