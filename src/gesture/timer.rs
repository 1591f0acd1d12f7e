//! Cancellable fixed-interval ticker
//!
//! The recognizer does not own a thread. It exposes the ticker's next
//! deadline and whoever drives it (the perception worker, or a test)
//! calls back in once that deadline has passed.

use std::time::{Duration, Instant};

/// Repeating deadline that can be started and cancelled
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Arm the ticker; the first tick is due one interval after `now`
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    /// Disarm the ticker. Pending ticks are discarded.
    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Consume a due tick.
    ///
    /// Returns true at most once per call. Ticks missed while the caller
    /// was busy are skipped rather than replayed in a burst.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(deadline) if deadline <= now => {
                let mut next = deadline + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next = Some(next);
                true
            }
            _ => false,
        }
    }
}
