//! Self-contained interactive widgets driven by pointer input or an
//! external trigger rather than by the scroll publisher.
//!
//! Every widget takes the reduced-motion flag on the call that would start a
//! transition and snaps straight to its end state when it is set.

pub mod counter;
pub mod magnetic;
pub mod progress;
pub mod ripple;

pub use counter::AnimatedCounter;
pub use magnetic::MagneticButton;
pub use progress::{ArcKind, ProgressRing};
pub use ripple::{Ripple, RippleButton};
