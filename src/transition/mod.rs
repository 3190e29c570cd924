//! Time-driven transitions: bounds, opacity and series visibility.
//!
//! Every transition is a small state machine sampled with the engine clock;
//! none of them sleeps, polls or shares mutable state with another.

mod bounds;
mod clock;
mod easing;
mod opacity;
mod registry;
mod visibility;

pub use bounds::BoundsAnimator;
pub use clock::{AnimationClock, linear_progress};
pub use easing::Easing;
pub use opacity::{OPAQUE, OpacityTransition, TRANSPARENT};
pub use registry::TransitionSet;
pub use visibility::{SeriesVisibility, VisibilityStep, VisibilityTracker};

use std::time::Duration;

/// A transition advanced by the tick dispatcher.
pub trait Transition {
    /// Samples the transition at `now`; returns `true` when its value changed.
    fn advance(&mut self, now: Duration) -> bool;

    fn is_running(&self) -> bool;
}
