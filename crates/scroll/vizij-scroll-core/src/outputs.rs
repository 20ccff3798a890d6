//! Output contracts for one coordinator frame.
//!
//! Outputs carry only what changed this frame. Hosts apply style changes to
//! their elements and forward events to whoever listens.

use serde::{Deserialize, Serialize};

use crate::ids::{BindingId, ElementId, GroupId, TypewriterId};
use crate::parallax::ParallaxTransform;
use crate::scroll::ScrollState;
use crate::style::Style;
use crate::visibility::VisibilityState;

/// New reveal style for one element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleChange {
    pub element: ElementId,
    pub style: Style,
}

/// New parallax transform for one binding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxChange {
    pub binding: BindingId,
    pub element: ElementId,
    pub transform: ParallaxTransform,
}

/// Discrete signals emitted during a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FxEvent {
    VisibilityChanged {
        element: ElementId,
        state: VisibilityState,
    },
    RevealStarted {
        group: GroupId,
        element: ElementId,
    },
    RevealCompleted {
        group: GroupId,
        element: ElementId,
    },
    /// A repeating reveal went back to its initial style.
    RevealReset {
        group: GroupId,
        element: ElementId,
    },
    ScrollIdle {
        offset: f32,
    },
    TypewriterAdvanced {
        id: TypewriterId,
        text: String,
    },
    TypewriterFinished {
        id: TypewriterId,
    },
    ReducedMotionChanged {
        reduced: bool,
    },
    FrameRateReport {
        fps: u32,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    /// Scroll state, present when it changed this frame.
    #[serde(default)]
    pub scroll: Option<ScrollState>,
    #[serde(default)]
    pub changes: Vec<StyleChange>,
    #[serde(default)]
    pub parallax: Vec<ParallaxChange>,
    #[serde(default)]
    pub events: Vec<FxEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.scroll = None;
        self.changes.clear();
        self.parallax.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, element: ElementId, style: Style) {
        self.changes.push(StyleChange { element, style });
    }

    #[inline]
    pub fn push_event(&mut self, event: FxEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scroll.is_none()
            && self.changes.is_empty()
            && self.parallax.is_empty()
            && self.events.is_empty()
    }
}
