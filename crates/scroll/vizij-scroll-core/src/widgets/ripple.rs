//! Press ripples. Each press gets its own record and its own expiry timer.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::geometry::{Point, Rect};
use crate::timer::TimerQueue;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ripple {
    pub id: u32,
    /// Press point relative to the button's top-left corner.
    pub x: f32,
    pub y: f32,
    /// Diameter that covers the whole button from the press point.
    pub size: f32,
    pub born_at: f64,
}

#[derive(Debug)]
pub struct RippleButton {
    decay_ms: f64,
    next_id: u32,
    active: Vec<Ripple>,
    expiry: TimerQueue<u32>,
}

impl RippleButton {
    pub fn new(cfg: &Config) -> Self {
        Self::with_decay(cfg.ripple_decay_ms)
    }

    pub fn with_decay(decay_ms: f64) -> Self {
        Self {
            decay_ms,
            next_id: 0,
            active: Vec::new(),
            expiry: TimerQueue::new(),
        }
    }

    /// Record a press at `pointer` (page coordinates) on a button at `bounds`.
    /// No ripple is produced under reduced motion.
    pub fn press(
        &mut self,
        pointer: Point,
        bounds: Rect,
        now: f64,
        reduced: bool,
    ) -> Option<u32> {
        if reduced {
            return None;
        }
        let x = pointer.x - bounds.x;
        let y = pointer.y - bounds.y;
        let reach_x = x.max(bounds.width - x);
        let reach_y = y.max(bounds.height - y);
        let size = 2.0 * (reach_x * reach_x + reach_y * reach_y).sqrt();

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.active.push(Ripple {
            id,
            x,
            y,
            size,
            born_at: now,
        });
        self.expiry.schedule(now + self.decay_ms, id);
        Some(id)
    }

    /// Remove ripples whose decay elapsed. Returns their ids.
    pub fn prune(&mut self, now: f64) -> Vec<u32> {
        let expired: Vec<u32> = self
            .expiry
            .drain_due(now)
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        if !expired.is_empty() {
            self.active.retain(|r| !expired.contains(&r.id));
        }
        expired
    }

    pub fn active(&self) -> &[Ripple] {
        &self.active
    }

    /// Linear 0..1 life fraction, for scale-up / fade-out rendering.
    pub fn progress(&self, ripple: &Ripple, now: f64) -> f32 {
        (((now - ripple.born_at) / self.decay_ms).clamp(0.0, 1.0)) as f32
    }

    /// Drop all ripples and their timers (button unmounted).
    pub fn clear(&mut self) {
        self.active.clear();
        self.expiry.clear();
    }
}
