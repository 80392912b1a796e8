//! Clock abstraction for WIF.
//!
//! Classifiers that reload models record when the model currently in use was
//! loaded. The time source is a trait so that the recorded timestamps can be
//! pinned in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock time in whole seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Returns the current time as Unix seconds.
    fn epoch_seconds(&self) -> u64;
}

/// Clock backed by `SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_seconds(&self) -> u64 {
        // A clock set before 1970 reads as the epoch itself.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    seconds: u64,
}

impl FixedClock {
    pub fn new(seconds: u64) -> Self {
        Self { seconds }
    }
}

impl Clock for FixedClock {
    fn epoch_seconds(&self) -> u64 {
        self.seconds
    }
}

/// Clock that moves forward by a fixed step every time it is read.
///
/// Lets a test observe that something was re-stamped (e.g. after a model
/// reload) without sleeping.
#[derive(Debug)]
pub struct SteppingClock {
    next: AtomicU64,
    step: u64,
}

impl SteppingClock {
    /// First read returns `start`, each following read adds `step`.
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
            step,
        }
    }

    /// Value the next read will return, without consuming it.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl Clock for SteppingClock {
    fn epoch_seconds(&self) -> u64 {
        self.next.fetch_add(self.step, Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn epoch_seconds(&self) -> u64 {
        (**self).epoch_seconds()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn epoch_seconds(&self) -> u64 {
        (**self).epoch_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_fixed_clock_never_moves() {
        let clock = FixedClock::new(1_700_000_000);
        assert_eq!(clock.epoch_seconds(), 1_700_000_000);
        assert_eq!(clock.epoch_seconds(), 1_700_000_000);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.epoch_seconds() > 1_577_836_800);
    }

    #[test]
    fn test_stepping_clock_steps_on_each_read() {
        let clock = SteppingClock::new(100, 10);
        assert_eq!(clock.epoch_seconds(), 100);
        assert_eq!(clock.epoch_seconds(), 110);
        assert_eq!(clock.peek(), 120);
        assert_eq!(clock.epoch_seconds(), 120);
    }

    #[test]
    fn test_stepping_clock_zero_step_behaves_fixed() {
        let clock = SteppingClock::new(5, 0);
        assert_eq!(clock.epoch_seconds(), 5);
        assert_eq!(clock.epoch_seconds(), 5);
    }

    #[test]
    fn test_shared_clock_handles() {
        let clock = Arc::new(SteppingClock::new(1, 1));
        let other = Arc::clone(&clock);
        assert_eq!(clock.epoch_seconds(), 1);
        assert_eq!(other.epoch_seconds(), 2);

        let by_ref: &dyn Clock = &FixedClock::new(9);
        assert_eq!(by_ref.epoch_seconds(), 9);
    }
}
