//! Timing functions (CSS model: input and output both in [0, 1]).

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    EaseOutCubic,
    /// Control points (x1, y1, x2, y2); x values must lie in [0, 1].
    CubicBezier([f32; 4]),
}

#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the x polynomial by bisection, then evaluate y.
fn bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

/// 1 - (1 - t)^3
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

impl Easing {
    /// Map linear progress to eased progress. Endpoints are exact.
    pub fn apply(&self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => bezier_ease(t, 0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => bezier_ease(t, 0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => bezier_ease(t, 0.42, 0.0, 0.58, 1.0),
            Easing::EaseOutCubic => ease_out_cubic(t),
            Easing::CubicBezier([x1, y1, x2, y2]) => {
                bezier_ease(t, x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2)
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Easing::CubicBezier(c) => {
                c.iter().all(|v| v.is_finite())
                    && (0.0..=1.0).contains(&c[0])
                    && (0.0..=1.0).contains(&c[2])
            }
            _ => true,
        }
    }
}
