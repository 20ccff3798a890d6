//! Visual style record produced by reveals and parallax.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// The subset of presentation state the effects animate. Missing JSON
/// fields fall back to the identity style.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub rotate_deg: f32,
    pub blur_px: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl Style {
    pub const IDENTITY: Style = Style {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotate_deg: 0.0,
        blur_px: 0.0,
    };

    pub const HIDDEN: Style = Style {
        opacity: 0.0,
        ..Style::IDENTITY
    };

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_translate(mut self, x: f32, y: f32) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotate(mut self, deg: f32) -> Self {
        self.rotate_deg = deg;
        self
    }

    pub fn with_blur(mut self, px: f32) -> Self {
        self.blur_px = px;
        self
    }

    /// Component-wise interpolation; `t` is used as given (may overshoot for
    /// back-style curves).
    pub fn lerp(&self, to: &Style, t: f32) -> Style {
        Style {
            opacity: lerp(self.opacity, to.opacity, t).clamp(0.0, 1.0),
            translate_x: lerp(self.translate_x, to.translate_x, t),
            translate_y: lerp(self.translate_y, to.translate_y, t),
            scale: lerp(self.scale, to.scale, t),
            rotate_deg: lerp(self.rotate_deg, to.rotate_deg, t),
            blur_px: lerp(self.blur_px, to.blur_px, t).max(0.0),
        }
    }

    /// Interpolate with easing applied to linear progress `t`.
    /// Progress at or past 1 returns `to` exactly.
    pub fn ease(&self, to: &Style, t: f32, easing: Easing) -> Style {
        if t >= 1.0 {
            return *to;
        }
        if t.is_nan() || t <= 0.0 {
            return *self;
        }
        self.lerp(to, easing.apply(t))
    }

    pub fn is_finite(&self) -> bool {
        [
            self.opacity,
            self.translate_x,
            self.translate_y,
            self.scale,
            self.rotate_deg,
            self.blur_px,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Inline CSS declarations for this style.
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "opacity: {}; transform: translate3d({}px, {}px, 0) scale({}) rotate({}deg);",
            self.opacity, self.translate_x, self.translate_y, self.scale, self.rotate_deg
        );
        if self.blur_px > 0.0 {
            css.push_str(&format!(" filter: blur({}px);", self.blur_px));
        }
        css
    }
}
