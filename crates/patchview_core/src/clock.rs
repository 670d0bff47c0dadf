//! Millisecond clocks
//!
//! Timed behaviour (the trigger flash) is a polled condition against an
//! injected clock, so hosts and tests decide how time advances.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic millisecond time source
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary fixed epoch
    fn now_ms(&self) -> u64;
}

/// Shared clock handle cloned into every widget that needs time
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock backed by [`Instant`]
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(100);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 350);
        clock.set(5);
        assert_eq!(clock.now_ms(), 5);
    }

    #[test]
    fn test_manual_clock_as_shared() {
        let clock = Arc::new(ManualClock::new(0));
        let shared: SharedClock = clock.clone();
        clock.advance(10);
        assert_eq!(shared.now_ms(), 10);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
