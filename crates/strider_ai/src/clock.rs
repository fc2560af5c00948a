//! Time sources
//!
//! Controllers never read the wall clock directly. Every delay goes through
//! [`Clock::sleep`] with a cancellation token, so tests can drive time with a
//! [`ManualClock`] and a simulation can advance its world while "sleeping".

use parking_lot::Mutex;
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;

/// Monotonic time source with cancellable delays
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Wait for `duration` or until `cancel` fires.
    ///
    /// Returns `true` if the full duration elapsed.
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool;
}

/// Real time, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        !cancel.wait_timeout(duration)
    }
}

/// Clock that only moves when told to. `sleep` advances it instantly.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now: Duration) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn set(&self, now: Duration) {
        *self.now.lock() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        self.advance(duration);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_on_sleep() {
        let clock = ManualClock::new();
        let token = CancelToken::new();

        assert!(clock.sleep(Duration::from_millis(250), &token));
        clock.advance(Duration::from_millis(750));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn test_manual_clock_cancelled_sleep() {
        let clock = ManualClock::starting_at(Duration::from_secs(3));
        let token = CancelToken::new();
        token.cancel();

        assert!(!clock.sleep(Duration::from_secs(1), &token));
        assert_eq!(clock.now(), Duration::from_secs(3));
    }

    #[test]
    fn test_system_clock_cancelled_sleep_returns_early() {
        let clock = SystemClock::new();
        let token = CancelToken::new();
        token.cancel();

        let start = Instant::now();
        assert!(!clock.sleep(Duration::from_secs(5), &token));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        assert!(clock.sleep(Duration::from_millis(2), &CancelToken::new()));
        assert!(clock.now() >= a + Duration::from_millis(2));
    }
}
