//! Cooperative cancellation for the continuous loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Granularity of the interruptible sleep. A triggered shutdown is noticed
/// within one step.
pub const SLEEP_STEP: Duration = Duration::from_millis(100);

/// Shared stop flag.
///
/// Clones share the same flag; triggering any clone stops every loop that
/// observes it. Typically one clone goes to a signal handler and another to
/// [`Scheduler::run_continuous`](super::Scheduler::run_continuous).
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Idempotent.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration` in [`SLEEP_STEP`] slices, returning early once
    /// shutdown is triggered. Returns `true` if the full duration elapsed.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_triggered() {
                return false;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return true;
            }
            std::thread::sleep(remaining.min(SLEEP_STEP));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let shutdown = Shutdown::new();
        let handle = shutdown.clone();
        assert!(!shutdown.is_triggered());
        handle.trigger();
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn test_sleep_completes_without_trigger() {
        let shutdown = Shutdown::new();
        let start = Instant::now();
        assert!(shutdown.sleep(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_sleep_returns_immediately_when_triggered() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let start = Instant::now();
        assert!(!shutdown.sleep(Duration::from_secs(60)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_sleep_interrupted_from_other_thread() {
        let shutdown = Shutdown::new();
        let handle = shutdown.clone();
        let trigger = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            handle.trigger();
        });

        let start = Instant::now();
        assert!(!shutdown.sleep(Duration::from_secs(60)));
        assert!(start.elapsed() < Duration::from_secs(2));
        trigger.join().unwrap();
    }

    #[test]
    fn test_zero_sleep() {
        assert!(Shutdown::new().sleep(Duration::ZERO));
    }
}
