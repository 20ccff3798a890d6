//! Progress ring / speedometer gauge.
//!
//! The displayed value eases toward the target by a fixed fraction of the
//! remaining gap per frame and snaps once the gap is below epsilon.

use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcKind {
    /// Full circle.
    #[default]
    Ring,
    /// 270 degree gauge.
    Speedometer,
}

impl ArcKind {
    pub fn total_sweep(&self) -> f32 {
        match self {
            ArcKind::Ring => 360.0,
            ArcKind::Speedometer => 270.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressRing {
    kind: ArcKind,
    current: f32,
    target: f32,
    rate: f32,
    epsilon: f32,
}

fn clamp_percent(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

impl ProgressRing {
    pub fn new(kind: ArcKind, cfg: &Config) -> Self {
        Self::with_rate(kind, cfg.progress_rate, cfg.progress_epsilon)
    }

    pub fn with_rate(kind: ArcKind, rate: f32, epsilon: f32) -> Self {
        Self {
            kind,
            current: 0.0,
            target: 0.0,
            rate: rate.clamp(f32::EPSILON, 1.0),
            epsilon: epsilon.max(f32::EPSILON),
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn kind(&self) -> ArcKind {
        self.kind
    }

    pub fn set_target(&mut self, percent: f32) {
        self.target = clamp_percent(percent);
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one frame. Returns the displayed value.
    pub fn tick(&mut self, reduced: bool) -> f32 {
        let gap = self.target - self.current;
        if reduced || gap.abs() <= self.epsilon {
            self.current = self.target;
        } else {
            self.current += gap * self.rate;
        }
        self.current
    }

    /// Upper bound on frames needed to settle from a `gap`-sized jump.
    pub fn frames_to_settle(&self, gap: f32) -> u32 {
        let gap = gap.abs();
        if gap <= self.epsilon || self.rate >= 1.0 {
            return 1;
        }
        let frames = (self.epsilon / gap).ln() / (1.0 - self.rate).ln();
        frames.ceil() as u32 + 1
    }

    /// Arc angle in degrees for the displayed value.
    pub fn sweep_degrees(&self) -> f32 {
        self.current / 100.0 * self.kind.total_sweep()
    }

    /// SVG `stroke-dashoffset` for a stroke whose visible arc has `arc_length`.
    pub fn dash_offset(&self, arc_length: f32) -> f32 {
        arc_length * (1.0 - self.current / 100.0)
    }
}
