//! Reduced-motion gate.
//!
//! Single owner of the user's reduced-motion preference. The host reports a
//! change with `notify_change`; the value consumers observe only flips when
//! the owner calls `apply_pending` at the start of its next tick, so every
//! component sees the same value for a whole frame.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MotionGate {
    reduced: bool,
    #[serde(skip)]
    pending: Option<bool>,
}

impl MotionGate {
    /// Gate seeded with the preference read at startup.
    pub fn new(reduced: bool) -> Self {
        Self {
            reduced,
            pending: None,
        }
    }

    /// Effective preference for the current tick.
    #[inline]
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// Record a preference change. Takes effect on the next `apply_pending`.
    pub fn notify_change(&mut self, reduced: bool) {
        self.pending = Some(reduced);
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a queued change. Returns the new value when it actually differs.
    pub fn apply_pending(&mut self) -> Option<bool> {
        let next = self.pending.take()?;
        if next == self.reduced {
            return None;
        }
        self.reduced = next;
        log::debug!("reduced-motion preference now {next}");
        Some(next)
    }
}
