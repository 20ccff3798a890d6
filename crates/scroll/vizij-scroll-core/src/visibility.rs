//! Visibility observer controller.
//!
//! Tracks registered elements against the viewport. Geometry comes from a
//! per-element `BoundsProvider` and the host viewport, both injected, so the
//! controller runs the same against the DOM or a test fake.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrollFxError};
use crate::geometry::Rect;
use crate::ids::{ElementId, IdAllocator};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityState {
    #[default]
    NotYetSeen,
    Intersecting,
    HasBeenSeen,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationMode {
    /// Latch at `HasBeenSeen` on first intersection and stop observing.
    #[default]
    Once,
    /// Follow the live intersection indefinitely.
    Repeating,
}

/// Host capability returning an element's current screen rectangle.
/// `None` means the element has no layout box right now.
pub trait BoundsProvider {
    fn bounds(&self) -> Option<Rect>;
}

impl BoundsProvider for Rect {
    fn bounds(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl<F> BoundsProvider for F
where
    F: Fn() -> Option<Rect>,
{
    fn bounds(&self) -> Option<Rect> {
        self()
    }
}

struct TrackedElement {
    bounds: Box<dyn BoundsProvider>,
    state: VisibilityState,
    mode: ObservationMode,
    threshold: f32,
    ratio: f32,
}

impl TrackedElement {
    fn visible(&self) -> bool {
        match self.mode {
            ObservationMode::Once => self.state != VisibilityState::NotYetSeen,
            ObservationMode::Repeating => self.state == VisibilityState::Intersecting,
        }
    }
}

/// Emitted by `recompute` whenever an element's state changes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibilityChange {
    pub element: ElementId,
    pub previous: VisibilityState,
    pub state: VisibilityState,
    /// Visibility signal after the change (see `VisibilityController::is_visible`).
    pub visible: bool,
}

#[derive(Default)]
pub struct VisibilityController {
    ids: IdAllocator,
    elements: HashMap<ElementId, TrackedElement>,
    /// Registration order, for deterministic change reporting.
    order: Vec<ElementId>,
}

impl std::fmt::Debug for VisibilityController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityController")
            .field("tracked", &self.order)
            .finish()
    }
}

pub fn validate_threshold(threshold: f32) -> Result<f32> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ScrollFxError::InvalidThreshold { value: threshold })
    }
}

impl VisibilityController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching an element. `threshold` is the fraction of its area that
    /// must be inside the viewport to count as intersecting.
    pub fn register(
        &mut self,
        bounds: Box<dyn BoundsProvider>,
        mode: ObservationMode,
        threshold: f32,
    ) -> Result<ElementId> {
        let threshold = validate_threshold(threshold)?;
        let id = self.ids.alloc_element();
        self.elements.insert(
            id,
            TrackedElement {
                bounds,
                state: VisibilityState::NotYetSeen,
                mode,
                threshold,
                ratio: 0.0,
            },
        );
        self.order.push(id);
        log::debug!("observing element {} ({mode:?}, threshold {threshold})", id.0);
        Ok(id)
    }

    /// Stop watching and drop the bounds provider. Returns false for unknown ids.
    pub fn unregister(&mut self, id: ElementId) -> bool {
        if self.elements.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|e| *e != id);
        log::debug!("stopped observing element {}", id.0);
        true
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn state(&self, id: ElementId) -> Option<VisibilityState> {
        self.elements.get(&id).map(|e| e.state)
    }

    pub fn mode(&self, id: ElementId) -> Option<ObservationMode> {
        self.elements.get(&id).map(|e| e.mode)
    }

    /// Last measured visible fraction.
    pub fn ratio(&self, id: ElementId) -> Option<f32> {
        self.elements.get(&id).map(|e| e.ratio)
    }

    /// The reveal trigger: latched for `Once`, live for `Repeating`.
    /// Unknown ids are never visible.
    pub fn is_visible(&self, id: ElementId) -> bool {
        self.elements.get(&id).is_some_and(TrackedElement::visible)
    }

    /// Re-measure every element against `viewport`. `None` means the host has
    /// no viewport; every live element is then treated as not intersecting.
    pub fn recompute(&mut self, viewport: Option<Rect>) -> Vec<VisibilityChange> {
        let mut changes = Vec::new();
        for id in &self.order {
            let Some(el) = self.elements.get_mut(id) else {
                continue;
            };
            if el.mode == ObservationMode::Once && el.state == VisibilityState::HasBeenSeen {
                continue;
            }

            let ratio = match (viewport, el.bounds.bounds()) {
                (Some(vp), Some(rect)) if !rect.is_empty() => rect.visible_ratio(&vp),
                _ => {
                    log::trace!("element {} has no layout yet; deferring", id.0);
                    0.0
                }
            };
            el.ratio = ratio;
            let intersecting = ratio > 0.0 && ratio >= el.threshold;

            let previous = el.state;
            let next = match (el.mode, intersecting, previous) {
                (ObservationMode::Once, true, _) => VisibilityState::HasBeenSeen,
                (ObservationMode::Once, false, s) => s,
                (ObservationMode::Repeating, true, _) => VisibilityState::Intersecting,
                (ObservationMode::Repeating, false, VisibilityState::NotYetSeen) => {
                    VisibilityState::NotYetSeen
                }
                (ObservationMode::Repeating, false, _) => VisibilityState::HasBeenSeen,
            };
            if next != previous {
                el.state = next;
                changes.push(VisibilityChange {
                    element: *id,
                    previous,
                    state: next,
                    visible: el.visible(),
                });
            }
        }
        changes
    }
}
