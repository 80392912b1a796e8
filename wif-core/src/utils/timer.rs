//! Periodic timer running a callback on a background thread.
//!
//! The waiting between ticks is interruptible: `cancel()` wakes the thread
//! and joins it without waiting for the rest of the interval.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Result, WifError};

/// Hooks invoked by the timer thread.
pub trait TimerCallback: Send {
    /// Called once when the thread starts.
    fn on_start(&mut self) {}

    /// Called after every elapsed interval.
    fn on_tick(&mut self);

    /// Called once when the thread stops.
    fn on_end(&mut self) {}
}

#[derive(Debug, Default)]
struct CancellationToken {
    cancelled: Mutex<bool>,
    wakeup: Condvar,
}

impl CancellationToken {
    fn cancel(&self) {
        let mut cancelled = match self.cancelled.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cancelled = true;
        self.wakeup.notify_all();
    }

    fn reset(&self) {
        let mut cancelled = match self.cancelled.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cancelled = false;
    }

    /// Wait up to `interval`. Returns true if cancelled meanwhile.
    fn wait(&self, interval: Duration) -> bool {
        let guard = match self.cancelled.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match self
            .wakeup
            .wait_timeout_while(guard, interval, |cancelled| !*cancelled)
        {
            Ok((cancelled, _)) => *cancelled,
            Err(_) => true,
        }
    }
}

type Callback = Box<dyn TimerCallback>;

/// Runs a [`TimerCallback`] every `interval` until cancelled or dropped.
pub struct Timer {
    interval: Duration,
    callback: Option<Callback>,
    token: Arc<CancellationToken>,
    thread: Option<JoinHandle<Callback>>,
}

impl Timer {
    pub fn new(interval: Duration, callback: Callback) -> Self {
        Self {
            interval,
            callback: Some(callback),
            token: Arc::new(CancellationToken::default()),
            thread: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Spawn the ticking thread. Starting a running timer does nothing.
    ///
    /// A zero interval is rejected, the thread would never wait between ticks.
    pub fn start(&mut self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(WifError::InvalidArgument(
                "timer interval must be greater than zero".to_string(),
            ));
        }
        let mut callback = match self.callback.take() {
            Some(callback) => callback,
            None => return Ok(()),
        };

        self.token.reset();
        let token = Arc::clone(&self.token);
        let interval = self.interval;

        let handle = std::thread::Builder::new()
            .name("wif-timer".to_string())
            .spawn(move || {
                callback.on_start();
                while !token.wait(interval) {
                    callback.on_tick();
                }
                callback.on_end();
                callback
            })?;

        debug!(interval_ms = interval.as_millis() as u64, "timer started");
        self.thread = Some(handle);
        Ok(())
    }

    /// Stop the thread and wait for it. The timer can be started again.
    pub fn cancel(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };

        self.token.cancel();
        match handle.join() {
            Ok(callback) => self.callback = Some(callback),
            Err(_) => warn!("timer callback panicked"),
        }
        debug!("timer stopped");
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[derive(Default)]
    struct Counters {
        starts: AtomicUsize,
        ticks: AtomicUsize,
        ends: AtomicUsize,
    }

    struct CountingCallback(Arc<Counters>);

    impl TimerCallback for CountingCallback {
        fn on_start(&mut self) {
            self.0.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_tick(&mut self) {
            self.0.ticks.fetch_add(1, Ordering::SeqCst);
        }

        fn on_end(&mut self) {
            self.0.ends.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct TickOnly(Arc<AtomicUsize>);

    impl TimerCallback for TickOnly {
        fn on_tick(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn wait_until(deadline: Duration, condition: impl Fn() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    // ===========================================
    // Lifecycle
    // ===========================================

    #[test]
    fn test_not_running_before_start() {
        let counters = Arc::new(Counters::default());
        let timer = Timer::new(
            Duration::from_millis(10),
            Box::new(CountingCallback(Arc::clone(&counters))),
        );
        assert!(!timer.is_running());
        drop(timer);
        assert_eq!(counters.starts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ticks_until_cancelled() {
        let counters = Arc::new(Counters::default());
        let mut timer = Timer::new(
            Duration::from_millis(5),
            Box::new(CountingCallback(Arc::clone(&counters))),
        );
        timer.start().expect("start");
        assert!(timer.is_running());

        assert!(wait_until(Duration::from_secs(5), || {
            counters.ticks.load(Ordering::SeqCst) >= 3
        }));
        timer.cancel();

        assert!(!timer.is_running());
        assert_eq!(counters.starts.load(Ordering::SeqCst), 1);
        assert_eq!(counters.ends.load(Ordering::SeqCst), 1);

        let ticks = counters.ticks.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(counters.ticks.load(Ordering::SeqCst), ticks);
    }

    #[test]
    fn test_cancel_is_prompt() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut timer = Timer::new(Duration::from_secs(3600), Box::new(TickOnly(Arc::clone(&ticks))));
        timer.start().expect("start");

        let start = Instant::now();
        timer.cancel();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_cancels() {
        let counters = Arc::new(Counters::default());
        {
            let mut timer = Timer::new(
                Duration::from_secs(3600),
                Box::new(CountingCallback(Arc::clone(&counters))),
            );
            timer.start().expect("start");
        }
        assert_eq!(counters.ends.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_start_twice_is_noop() {
        let counters = Arc::new(Counters::default());
        let mut timer = Timer::new(
            Duration::from_secs(3600),
            Box::new(CountingCallback(Arc::clone(&counters))),
        );
        timer.start().expect("start");
        timer.start().expect("second start");
        timer.cancel();
        assert_eq!(counters.starts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restart_after_cancel() {
        let counters = Arc::new(Counters::default());
        let mut timer = Timer::new(
            Duration::from_secs(3600),
            Box::new(CountingCallback(Arc::clone(&counters))),
        );
        timer.start().expect("start");
        timer.cancel();
        timer.start().expect("restart");
        timer.cancel();
        assert_eq!(counters.starts.load(Ordering::SeqCst), 2);
        assert_eq!(counters.ends.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cancel_without_start() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut timer = Timer::new(Duration::from_millis(1), Box::new(TickOnly(ticks)));
        timer.cancel();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut timer = Timer::new(Duration::ZERO, Box::new(TickOnly(Arc::clone(&ticks))));
        assert!(matches!(timer.start(), Err(WifError::InvalidArgument(_))));
        assert!(!timer.is_running());
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_debug_output() {
        let timer = Timer::new(Duration::from_secs(60), Box::new(TickOnly(Arc::default())));
        let debug = format!("{:?}", timer);
        assert!(debug.contains("Timer"));
        assert!(debug.contains("running: false"));
        assert_eq!(timer.interval(), Duration::from_secs(60));
    }
}
