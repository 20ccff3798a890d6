//! Animated numeric counter (ease-out-cubic).

use serde::{Deserialize, Serialize};

#[inline]
fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Counts from a start value to a target over `duration_ms`. Displayed values
/// are integers, stay between start and target, and the last sample is the
/// target exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatedCounter {
    from: i64,
    target: i64,
    duration_ms: f64,
    started_at: Option<f64>,
    current: i64,
}

impl AnimatedCounter {
    pub fn new(target: i64, duration_ms: f64) -> Self {
        Self::from_value(0, target, duration_ms)
    }

    pub fn from_value(from: i64, target: i64, duration_ms: f64) -> Self {
        Self {
            from,
            target,
            duration_ms: if duration_ms.is_finite() {
                duration_ms.max(0.0)
            } else {
                0.0
            },
            started_at: None,
            current: from,
        }
    }

    #[inline]
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Last sampled value.
    #[inline]
    pub fn value(&self) -> i64 {
        self.current
    }

    /// Begin counting at `now` (usually when the counter scrolls into view).
    pub fn start(&mut self, now: f64) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Count toward a new target starting from whatever is displayed now.
    pub fn retarget(&mut self, target: i64, now: f64) {
        self.from = self.current;
        self.target = target;
        self.started_at = Some(now);
    }

    pub fn is_done(&self, now: f64) -> bool {
        match self.started_at {
            Some(at) => self.duration_ms <= 0.0 || now - at >= self.duration_ms,
            None => false,
        }
    }

    /// Value for the frame at `now`. Before `start` this is the start value.
    pub fn sample(&mut self, now: f64, reduced: bool) -> i64 {
        self.current = self.value_at(now, reduced);
        self.current
    }

    /// Pure version of `sample`.
    pub fn value_at(&self, now: f64, reduced: bool) -> i64 {
        let Some(at) = self.started_at else {
            return if reduced { self.target } else { self.from };
        };
        if reduced || self.duration_ms <= 0.0 {
            return self.target;
        }
        let t = (now - at) / self.duration_ms;
        if t >= 1.0 {
            return self.target;
        }
        // f64 span: the i64 difference can overflow for far-apart endpoints.
        let span = self.target as f64 - self.from as f64;
        let raw = self.from as f64 + span * ease_out_cubic(t);
        let lo = self.from.min(self.target);
        let hi = self.from.max(self.target);
        (raw.round() as i64).clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_exactly_and_never_overshoots() {
        for target in [-500i64, -1, 0, 1, 7, 99, 1234, 1_000_000] {
            let mut c = AnimatedCounter::new(target, 2000.0);
            c.start(0.0);
            let mut frame = 0.0;
            while frame < 2000.0 {
                let v = c.sample(frame, false);
                assert!(v >= target.min(0) && v <= target.max(0), "{v} for {target}");
                frame += 16.0;
            }
            assert_eq!(c.sample(2000.0, false), target);
            assert_eq!(c.sample(5000.0, false), target);
        }
    }

    #[test]
    fn negative_to_positive() {
        let mut c = AnimatedCounter::from_value(-50, 50, 1000.0);
        c.start(0.0);
        assert_eq!(c.sample(0.0, false), -50);
        let mid = c.sample(500.0, false);
        assert!(mid > 0 && mid <= 50);
        assert_eq!(c.sample(1000.0, false), 50);
    }

    #[test]
    fn retarget_continues_from_displayed_value() {
        let mut c = AnimatedCounter::new(100, 1000.0);
        c.start(0.0);
        let shown = c.sample(500.0, false);
        c.retarget(10, 500.0);
        assert_eq!(c.sample(500.0, false), shown);
        assert_eq!(c.sample(1500.0, false), 10);
    }

    #[test]
    fn extreme_endpoints_do_not_overflow() {
        let mut c = AnimatedCounter::from_value(i64::MIN, i64::MAX, 1000.0);
        c.start(0.0);
        assert_eq!(c.sample(0.0, false), i64::MIN);
        let mid = c.sample(500.0, false);
        assert!(mid > i64::MIN && mid < i64::MAX);
        assert_eq!(c.sample(1000.0, false), i64::MAX);

        let mut down = AnimatedCounter::from_value(i64::MAX, i64::MIN, 1000.0);
        down.start(0.0);
        assert!(down.sample(250.0, false) < i64::MAX);
        assert_eq!(down.sample(1000.0, false), i64::MIN);
    }

    #[test]
    fn reduced_motion_jumps_to_target() {
        let mut c = AnimatedCounter::new(42, 1000.0);
        c.start(0.0);
        assert_eq!(c.sample(0.0, true), 42);
    }
}
