//! Vizij Scroll Core (host-agnostic)
//!
//! Scroll-synchronized reveal animations, parallax, visibility tracking and
//! micro-interaction widgets. Hosts inject time, scroll metrics and element
//! geometry; the crate returns the styles and events to apply. Nothing here
//! touches a DOM, so the same logic runs in the browser (via
//! `vizij-scroll-wasm`) and in native tests.

pub mod clock;
pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod motion;
pub mod outputs;
pub mod parallax;
pub mod perf;
pub mod preset;
pub mod reveal;
pub mod scroll;
pub mod style;
pub mod timer;
pub mod typewriter;
pub mod visibility;
pub mod widgets;

// Re-exports for adapters
pub use clock::{Clock, ManualClock};
pub use config::Config;
pub use easing::Easing;
pub use engine::ScrollFx;
pub use error::{Result, ScrollFxError};
pub use geometry::{Point, Rect};
pub use ids::{BindingId, ElementId, GroupId, SubscriptionId, TypewriterId};
pub use motion::MotionGate;
pub use outputs::{FxEvent, Outputs, ParallaxChange, StyleChange};
pub use parallax::{OverlayConfig, ParallaxBinding, ParallaxEngine, ParallaxTransform};
pub use perf::PerformanceMonitor;
pub use preset::{AnimationDescriptor, DescriptorSource, Preset};
pub use reveal::{RevealScheduler, RevealSignal, RevealTrigger, Signals};
pub use scroll::{
    NoScroll, ScrollDirection, ScrollMetrics, ScrollPublisher, ScrollSource, ScrollState,
};
pub use style::Style;
pub use timer::{TimerId, TimerQueue};
pub use typewriter::Typewriter;
pub use visibility::{BoundsProvider, ObservationMode, VisibilityController, VisibilityState};
pub use widgets::{AnimatedCounter, ArcKind, MagneticButton, ProgressRing, Ripple, RippleButton};
