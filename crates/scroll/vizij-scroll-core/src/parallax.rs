//! Parallax transform engine.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Result, ScrollFxError};
use crate::ids::{BindingId, ElementId, IdAllocator};
use crate::outputs::{Outputs, ParallaxChange};
use crate::scroll::ScrollState;

/// Background scale applied while parallax is active, so translated edges
/// never expose empty space.
pub const BACKGROUND_OVERSCALE: f32 = 1.1;

/// Tinted layer drawn over a parallax background.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxBinding {
    pub element: ElementId,
    /// < 1 drifts slower than the page, negative moves against the scroll.
    pub speed_factor: f32,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxTransform {
    pub translate_y: f32,
    pub blur_px: f32,
    pub scale: f32,
    pub overlay_opacity: f32,
}

impl ParallaxTransform {
    /// Untransformed background.
    pub const REST: ParallaxTransform = ParallaxTransform {
        translate_y: 0.0,
        blur_px: 0.0,
        scale: 1.0,
        overlay_opacity: 0.0,
    };

    pub fn to_css(&self) -> String {
        let mut css = format!(
            "transform: translate3d(0, {}px, 0) scale({});",
            self.translate_y, self.scale
        );
        if self.blur_px > 0.0 {
            css.push_str(&format!(" filter: blur({}px);", self.blur_px));
        }
        css
    }
}

#[inline]
pub fn translation(offset: f32, speed_factor: f32) -> f32 {
    offset * speed_factor
}

/// Cosmetic blur estimate: grows with velocity, capped.
#[inline]
pub fn motion_blur(velocity: f32, per_velocity: f32, cap: f32) -> f32 {
    (velocity.abs() * per_velocity).min(cap).max(0.0)
}

#[derive(Debug)]
struct Bound {
    binding: ParallaxBinding,
    applied: Option<ParallaxTransform>,
}

#[derive(Debug)]
pub struct ParallaxEngine {
    blur_per_velocity: f32,
    blur_cap_px: f32,
    ids: IdAllocator,
    bindings: HashMap<BindingId, Bound>,
    order: Vec<BindingId>,
}

impl ParallaxEngine {
    pub fn new(cfg: &Config) -> Self {
        Self {
            blur_per_velocity: cfg.blur_per_velocity,
            blur_cap_px: cfg.blur_cap_px,
            ids: IdAllocator::new(),
            bindings: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn bind(&mut self, binding: ParallaxBinding) -> Result<BindingId> {
        if !binding.speed_factor.is_finite() {
            return Err(ScrollFxError::InvalidDescriptor {
                reason: "parallax speed_factor must be finite".into(),
            });
        }
        let id = self.ids.alloc_binding();
        log::debug!(
            "parallax binding {} on element {} (factor {})",
            id.0,
            binding.element.0,
            binding.speed_factor
        );
        self.bindings.insert(
            id,
            Bound {
                binding,
                applied: None,
            },
        );
        self.order.push(id);
        Ok(id)
    }

    pub fn unbind(&mut self, id: BindingId) -> bool {
        self.order.retain(|b| *b != id);
        self.bindings.remove(&id).is_some()
    }

    /// Remove all bindings driving `element`.
    pub fn remove_element(&mut self, element: ElementId) -> usize {
        let doomed: Vec<BindingId> = self
            .order
            .iter()
            .copied()
            .filter(|id| {
                self.bindings
                    .get(id)
                    .is_some_and(|b| b.binding.element == element)
            })
            .collect();
        for id in &doomed {
            self.unbind(*id);
        }
        doomed.len()
    }

    pub fn binding(&self, id: BindingId) -> Option<&ParallaxBinding> {
        self.bindings.get(&id).map(|b| &b.binding)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Transform for one binding under `state`.
    pub fn compute(
        &self,
        binding: &ParallaxBinding,
        state: &ScrollState,
        reduced: bool,
        blur_enabled: bool,
    ) -> ParallaxTransform {
        if reduced {
            return ParallaxTransform {
                overlay_opacity: binding.overlay.opacity,
                ..ParallaxTransform::REST
            };
        }
        let blur_px = if blur_enabled {
            motion_blur(state.velocity, self.blur_per_velocity, self.blur_cap_px)
        } else {
            0.0
        };
        ParallaxTransform {
            translate_y: translation(state.offset, binding.speed_factor),
            blur_px,
            scale: BACKGROUND_OVERSCALE,
            overlay_opacity: binding.overlay.opacity,
        }
    }

    /// Recompute on-screen bindings and push those whose transform changed.
    pub fn update<F>(
        &mut self,
        state: &ScrollState,
        reduced: bool,
        blur_enabled: bool,
        on_screen: F,
        out: &mut Outputs,
    ) where
        F: Fn(ElementId) -> bool,
    {
        for id in &self.order {
            let Some(bound) = self.bindings.get(id) else {
                continue;
            };
            if !on_screen(bound.binding.element) {
                continue;
            }
            let transform = self.compute(&bound.binding, state, reduced, blur_enabled);
            if bound.applied == Some(transform) {
                continue;
            }
            let element = bound.binding.element;
            if let Some(bound) = self.bindings.get_mut(id) {
                bound.applied = Some(transform);
            }
            out.parallax.push(ParallaxChange {
                binding: *id,
                element,
                transform,
            });
        }
    }
}
