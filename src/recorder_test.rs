//! Tests for `StepRecorder`.

use crate::recorder::StepRecorder;

#[test]
fn records_in_order() {
  let mut r = StepRecorder::new();
  r.record(1);
  r.record(2);
  r.record(3);
  assert_eq!(r.len(), 3);
  assert_eq!(r.finalize(), vec![1, 2, 3]);
}

#[test]
fn drops_consecutive_duplicates_only() {
  let mut r = StepRecorder::new();
  r.record("a");
  r.record("a");
  r.record("b");
  r.record("a");
  assert_eq!(r.transitions(), 4);
  assert_eq!(r.finalize(), vec!["a", "b", "a"]);
}

#[test]
fn disabled_recorder_counts_but_never_builds() {
  let mut r: StepRecorder<u32> = StepRecorder::disabled();
  let mut built = false;
  r.record_with(|| {
    built = true;
    7
  });
  r.record(8);
  assert!(!built);
  assert!(r.is_empty());
  assert_eq!(r.transitions(), 2);
  assert!(r.finalize().is_empty());
}

#[test]
fn record_with_builds_when_enabled() {
  let mut r = StepRecorder::new();
  r.record_with(|| String::from("snapshot"));
  assert_eq!(r.last().map(String::as_str), Some("snapshot"));
}
