//! Time sources.
//!
//! Every component takes `now` in milliseconds as an argument; a `Clock`
//! is only a convenience for hosts and tests that want one place to read it.

use std::cell::Cell;

pub trait Clock {
    /// Current time in milliseconds on a monotonic timeline.
    fn now_ms(&self) -> f64;
}

/// Hand-driven clock for deterministic tests and offline rendering.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward by `ms` and return the new time.
    pub fn advance(&self, ms: f64) -> f64 {
        let next = self.now.get() + ms.max(0.0);
        self.now.set(next);
        next
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
