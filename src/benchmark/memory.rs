//! Per-thread allocation tracking for benchmark memory samples.
//!
//! [TrackingAllocator] forwards to the system allocator and keeps live/peak byte counters per
//! thread. A binary opts in with `#[global_allocator]`; without it every probe reads 0.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

static INSTALLED: AtomicBool = AtomicBool::new(false);

thread_local! {
  static LIVE: Cell<usize> = const { Cell::new(0) };
  static PEAK: Cell<usize> = const { Cell::new(0) };
}

/// System allocator with per-thread byte accounting.
pub struct TrackingAllocator;

fn grow(bytes: usize) {
  if !INSTALLED.load(Ordering::Relaxed) {
    INSTALLED.store(true, Ordering::Relaxed);
  }
  // try_with: the counters may already be gone while a thread shuts down
  let _ = LIVE.try_with(|live| {
    let now = live.get().saturating_add(bytes);
    live.set(now);
    let _ = PEAK.try_with(|peak| {
      if now > peak.get() {
        peak.set(now);
      }
    });
  });
}

fn shrink(bytes: usize) {
  let _ = LIVE.try_with(|live| live.set(live.get().saturating_sub(bytes)));
}

unsafe impl GlobalAlloc for TrackingAllocator {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    let ptr = unsafe { System.alloc(layout) };
    if !ptr.is_null() {
      grow(layout.size());
    }
    ptr
  }

  unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
    let ptr = unsafe { System.alloc_zeroed(layout) };
    if !ptr.is_null() {
      grow(layout.size());
    }
    ptr
  }

  unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
    unsafe { System.dealloc(ptr, layout) };
    shrink(layout.size());
  }

  unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
    let out = unsafe { System.realloc(ptr, layout, new_size) };
    if !out.is_null() {
      shrink(layout.size());
      grow(new_size);
    }
    out
  }
}

/// True once a [TrackingAllocator] has served an allocation in this process.
pub fn tracking_installed() -> bool {
  INSTALLED.load(Ordering::Relaxed)
}

/// Measures the peak bytes allocated on the current thread since [MemoryProbe::start].
#[derive(Debug)]
pub struct MemoryProbe {
  baseline: usize,
}

impl MemoryProbe {
  pub fn start() -> Self {
    let baseline = LIVE.with(Cell::get);
    PEAK.with(|p| p.set(baseline));
    Self { baseline }
  }

  /// Peak live bytes above the starting level; 0 without a [TrackingAllocator].
  pub fn peak_bytes(&self) -> u64 {
    let peak = PEAK.with(Cell::get);
    peak.saturating_sub(self.baseline) as u64
  }
}
