use crate::benchmark::{MemoryProbe, TrackingAllocator, tracking_installed};

// Installed for the whole unit-test binary; it only forwards to the system allocator.
#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[test]
fn probe_sees_a_large_allocation() {
  let probe = MemoryProbe::start();
  let buf = vec![1u8; 1 << 20];
  assert_eq!(buf.len(), 1 << 20);
  drop(buf);
  assert!(tracking_installed());
  assert!(probe.peak_bytes() >= 1 << 20);
}

#[test]
fn freed_memory_does_not_count_twice() {
  let probe = MemoryProbe::start();
  for _ in 0..8 {
    let buf = vec![0u64; 1 << 14];
    std::hint::black_box(&buf);
  }
  let peak = probe.peak_bytes();
  assert!(peak >= 8 << 14);
  assert!(peak < 4 * (8 << 14));
}

#[test]
fn other_threads_are_not_counted() {
  let probe = MemoryProbe::start();
  std::thread::spawn(|| std::hint::black_box(vec![0u8; 1 << 22]))
    .join()
    .unwrap();
  assert!(probe.peak_bytes() < 1 << 22);
}
