//! Core configuration for vizij-scroll-core.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrollFxError};

/// Tunables for the scroll coordinator and widgets.
///
/// Every field has a default, so hosts may pass a partial JSON object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum spacing between scroll state recomputations.
    pub throttle_ms: f64,
    /// Scroll inactivity after which `is_active` drops to false.
    pub quiet_ms: f64,

    /// Blur pixels per pixel/sample of scroll velocity.
    pub blur_per_velocity: f32,
    /// Upper bound for the motion blur approximation.
    pub blur_cap_px: f32,

    /// Lifetime of a ripple record.
    pub ripple_decay_ms: f64,
    /// Fraction of the remaining gap a progress ring closes per frame.
    pub progress_rate: f32,
    /// Gap below which a progress ring snaps onto its target.
    pub progress_epsilon: f32,
    /// Default pull toward the pointer for magnetic buttons.
    pub magnetic_strength: f32,

    /// Rolling window used by the frame-rate estimator.
    pub fps_window_ms: f64,
    /// When set, parallax blur is suppressed while the measured frame rate
    /// is below this value. `None` only reports the metric.
    pub degrade_blur_below_fps: Option<f32>,

    /// Fallback intersection threshold for registrations that omit one.
    pub default_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            throttle_ms: 16.0,
            quiet_ms: 150.0,
            blur_per_velocity: 0.05,
            blur_cap_px: 8.0,
            ripple_decay_ms: 600.0,
            progress_rate: 0.1,
            progress_epsilon: 0.05,
            magnetic_strength: 0.3,
            fps_window_ms: 1000.0,
            degrade_blur_below_fps: None,
            default_threshold: 0.1,
        }
    }
}

fn invalid(reason: impl Into<String>) -> ScrollFxError {
    ScrollFxError::InvalidConfig {
        reason: reason.into(),
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check ranges that would otherwise produce nonsense timings.
    pub fn validate(&self) -> Result<()> {
        if !self.throttle_ms.is_finite() || self.throttle_ms < 0.0 {
            return Err(invalid("throttle_ms must be finite and >= 0"));
        }
        if !self.quiet_ms.is_finite() || self.quiet_ms <= 0.0 {
            return Err(invalid("quiet_ms must be finite and > 0"));
        }
        if !self.blur_per_velocity.is_finite() || self.blur_per_velocity < 0.0 {
            return Err(invalid("blur_per_velocity must be finite and >= 0"));
        }
        if !self.blur_cap_px.is_finite() || self.blur_cap_px < 0.0 {
            return Err(invalid("blur_cap_px must be finite and >= 0"));
        }
        if !self.ripple_decay_ms.is_finite() || self.ripple_decay_ms <= 0.0 {
            return Err(invalid("ripple_decay_ms must be finite and > 0"));
        }
        if !(self.progress_rate > 0.0 && self.progress_rate <= 1.0) {
            return Err(invalid("progress_rate must be within (0, 1]"));
        }
        if !self.progress_epsilon.is_finite() || self.progress_epsilon <= 0.0 {
            return Err(invalid("progress_epsilon must be finite and > 0"));
        }
        if !self.magnetic_strength.is_finite() {
            return Err(invalid("magnetic_strength must be finite"));
        }
        if !self.fps_window_ms.is_finite() || self.fps_window_ms <= 0.0 {
            return Err(invalid("fps_window_ms must be finite and > 0"));
        }
        if let Some(fps) = self.degrade_blur_below_fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(invalid("degrade_blur_below_fps must be finite and > 0"));
            }
        }
        if !(0.0..=1.0).contains(&self.default_threshold) {
            return Err(invalid("default_threshold must be within [0, 1]"));
        }
        Ok(())
    }
}
