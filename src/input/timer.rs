//! Buffer-reset timer.
//!
//! The engine runs on the UI thread, so the timer is a deadline rather than a
//! spawned task: the event loop calls [`ResetTimer::fire_if_due`] on every tick.
//! Arming always replaces the previous deadline, so at most one reset is ever
//! outstanding.

use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Cancellable single-shot deadline.
///
#[derive(Debug, Clone)]
pub struct ResetTimer {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl Default for ResetTimer {
    fn default() -> Self {
        ResetTimer::new(DEFAULT_TIMEOUT)
    }
}

impl ResetTimer {
    pub fn new(timeout: Duration) -> Self {
        ResetTimer {
            timeout,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and schedule a new one relative to `now`.
    ///
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm and return true if the deadline has passed.
    ///
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_timeout() {
        let start = Instant::now();
        let mut timer = ResetTimer::new(Duration::from_millis(100));
        timer.arm(start);
        assert!(!timer.fire_if_due(start + Duration::from_millis(99)));
        assert!(timer.fire_if_due(start + Duration::from_millis(100)));
        assert!(!timer.is_armed());
        assert!(!timer.fire_if_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let start = Instant::now();
        let mut timer = ResetTimer::new(Duration::from_millis(100));
        timer.arm(start);
        timer.arm(start + Duration::from_millis(80));
        assert!(!timer.fire_if_due(start + Duration::from_millis(120)));
        assert!(timer.fire_if_due(start + Duration::from_millis(180)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timer = ResetTimer::default();
        timer.arm(start);
        timer.cancel();
        assert!(!timer.fire_if_due(start + DEFAULT_TIMEOUT * 2));
    }
}
