//! Animation descriptors and the named preset catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{Result, ScrollFxError};
use crate::style::Style;

/// Fully resolved reveal transition. Immutable once resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    pub initial: Style,
    #[serde(rename = "final")]
    pub final_style: Style,
    #[serde(default = "default_duration")]
    pub duration_ms: f64,
    #[serde(default)]
    pub delay_ms: f64,
    #[serde(default = "default_easing")]
    pub easing: Easing,
    #[serde(default)]
    pub stagger_ms: Option<f64>,
}

fn default_duration() -> f64 {
    600.0
}

fn default_easing() -> Easing {
    Easing::EaseOut
}

fn bad(reason: impl Into<String>) -> ScrollFxError {
    ScrollFxError::InvalidDescriptor {
        reason: reason.into(),
    }
}

impl AnimationDescriptor {
    pub fn new(initial: Style, final_style: Style) -> Self {
        Self {
            initial,
            final_style,
            duration_ms: default_duration(),
            delay_ms: 0.0,
            easing: default_easing(),
            stagger_ms: None,
        }
    }

    pub fn with_timing(mut self, duration_ms: f64, delay_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_stagger(mut self, stagger_ms: f64) -> Self {
        self.stagger_ms = Some(stagger_ms);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(bad("duration_ms must be finite and >= 0"));
        }
        if !self.delay_ms.is_finite() || self.delay_ms < 0.0 {
            return Err(bad("delay_ms must be finite and >= 0"));
        }
        if let Some(stagger) = self.stagger_ms {
            if !stagger.is_finite() || stagger < 0.0 {
                return Err(bad("stagger_ms must be finite and >= 0"));
            }
        }
        if !self.initial.is_finite() || !self.final_style.is_finite() {
            return Err(bad("styles must be finite"));
        }
        if !self.easing.is_valid() {
            return Err(bad("cubic-bezier x control points must lie in [0, 1]"));
        }
        Ok(())
    }

    /// Delay for the child at `index` within a staggered group.
    #[inline]
    pub fn delay_for(&self, index: usize) -> f64 {
        self.delay_ms + index as f64 * self.stagger_ms.unwrap_or(0.0)
    }

    /// Style `elapsed_ms` after the trigger for a child with `delay_ms`.
    pub fn style_at(&self, elapsed_ms: f64, delay_ms: f64) -> Style {
        let local = elapsed_ms - delay_ms;
        if local < 0.0 {
            return self.initial;
        }
        if self.duration_ms <= 0.0 {
            return self.final_style;
        }
        let t = (local / self.duration_ms) as f32;
        self.initial.ease(&self.final_style, t, self.easing)
    }

    /// Time after the trigger at which the child at `delay_ms` settles.
    #[inline]
    pub fn settles_at(&self, delay_ms: f64) -> f64 {
        delay_ms + self.duration_ms
    }
}

/// Closed set of built-in reveal presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    FadeIn,
    FadeUp,
    FadeDown,
    FadeLeft,
    FadeRight,
    ScaleIn,
    ZoomOut,
    SlideUp,
    BlurIn,
    RotateIn,
}

const PRESET_NAMES: [(Preset, &str); 10] = [
    (Preset::FadeIn, "fade-in"),
    (Preset::FadeUp, "fade-up"),
    (Preset::FadeDown, "fade-down"),
    (Preset::FadeLeft, "fade-left"),
    (Preset::FadeRight, "fade-right"),
    (Preset::ScaleIn, "scale-in"),
    (Preset::ZoomOut, "zoom-out"),
    (Preset::SlideUp, "slide-up"),
    (Preset::BlurIn, "blur-in"),
    (Preset::RotateIn, "rotate-in"),
];

/// Lowercase with separators stripped, so "fadeUp", "fade_up" and "fade-up"
/// all compare equal.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl Preset {
    pub fn all() -> impl Iterator<Item = Preset> {
        PRESET_NAMES.iter().map(|(p, _)| *p)
    }

    pub fn name(&self) -> &'static str {
        PRESET_NAMES
            .iter()
            .find_map(|(p, n)| (p == self).then_some(*n))
            .unwrap_or("fade-in")
    }

    pub fn descriptor(&self) -> AnimationDescriptor {
        let shown = Style::IDENTITY;
        let hidden = Style::HIDDEN;
        match self {
            Preset::FadeIn => AnimationDescriptor::new(hidden, shown),
            Preset::FadeUp => AnimationDescriptor::new(hidden.with_translate(0.0, 40.0), shown),
            Preset::FadeDown => AnimationDescriptor::new(hidden.with_translate(0.0, -40.0), shown),
            Preset::FadeLeft => AnimationDescriptor::new(hidden.with_translate(40.0, 0.0), shown),
            Preset::FadeRight => AnimationDescriptor::new(hidden.with_translate(-40.0, 0.0), shown),
            Preset::ScaleIn => AnimationDescriptor::new(hidden.with_scale(0.9), shown),
            Preset::ZoomOut => AnimationDescriptor::new(hidden.with_scale(1.15), shown),
            Preset::SlideUp => AnimationDescriptor::new(shown.with_translate(0.0, 100.0), shown)
                .with_timing(800.0, 0.0)
                .with_easing(Easing::EaseOutCubic),
            Preset::BlurIn => AnimationDescriptor::new(hidden.with_blur(10.0), shown),
            Preset::RotateIn => {
                AnimationDescriptor::new(hidden.with_rotate(-8.0).with_scale(0.95), shown)
                    .with_timing(700.0, 0.0)
            }
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ScrollFxError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        PRESET_NAMES
            .iter()
            .find_map(|(p, n)| (normalize(n) == wanted).then_some(*p))
            .ok_or_else(|| {
                log::warn!("unknown animation preset '{s}'");
                ScrollFxError::UnknownPreset { name: s.to_string() }
            })
    }
}

/// What a caller hands to the reveal scheduler: a preset name, a preset
/// with timing overrides, or a literal descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptorSource {
    Named(String),
    Preset {
        preset: String,
        #[serde(default)]
        duration_ms: Option<f64>,
        #[serde(default)]
        delay_ms: Option<f64>,
        #[serde(default)]
        easing: Option<Easing>,
        #[serde(default)]
        stagger_ms: Option<f64>,
    },
    Custom(AnimationDescriptor),
}

impl From<Preset> for DescriptorSource {
    fn from(p: Preset) -> Self {
        DescriptorSource::Named(p.name().to_string())
    }
}

impl From<AnimationDescriptor> for DescriptorSource {
    fn from(d: AnimationDescriptor) -> Self {
        DescriptorSource::Custom(d)
    }
}

impl DescriptorSource {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Resolve to validated literal data. Unknown preset names are an error.
    pub fn resolve(&self) -> Result<AnimationDescriptor> {
        let desc = match self {
            DescriptorSource::Named(name) => name.parse::<Preset>()?.descriptor(),
            DescriptorSource::Preset {
                preset,
                duration_ms,
                delay_ms,
                easing,
                stagger_ms,
            } => {
                let mut d = preset.parse::<Preset>()?.descriptor();
                if let Some(v) = duration_ms {
                    d.duration_ms = *v;
                }
                if let Some(v) = delay_ms {
                    d.delay_ms = *v;
                }
                if let Some(v) = easing {
                    d.easing = *v;
                }
                if stagger_ms.is_some() {
                    d.stagger_ms = *stagger_ms;
                }
                d
            }
            DescriptorSource::Custom(d) => d.clone(),
        };
        desc.validate()?;
        Ok(desc)
    }
}
