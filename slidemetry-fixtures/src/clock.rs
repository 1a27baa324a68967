//! Frame clocks for tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use slidemetry_core::FrameClock;

/// Frame clock that resolves immediately and counts ticks.
///
/// Clones share the tick counter, so a test can keep a handle after moving
/// the clock into a capturer.
#[derive(Debug, Clone, Default)]
pub struct InstantClock {
    ticks: Arc<AtomicU64>,
}

impl InstantClock {
    /// Create a clock with a zeroed tick counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frame waits observed so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

#[async_trait(?Send)]
impl FrameClock for InstantClock {
    async fn next_frame(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }
}
