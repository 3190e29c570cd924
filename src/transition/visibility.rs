use std::time::Duration;

use smallvec::SmallVec;
use tracing::debug;

use crate::bounds::HiddenSeries;
use crate::core::SeriesId;

use super::{Easing, OPAQUE, OpacityTransition, TRANSPARENT, Transition, TransitionSet};

/// Show/hide state of one series.
///
/// A hidden series stays drawn while it fades and is only dropped from
/// drawing once its alpha reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesVisibility {
    visible: bool,
    drawn: bool,
    opacity: OpacityTransition,
}

impl SeriesVisibility {
    #[must_use]
    pub fn shown(duration: Duration, easing: Easing) -> Self {
        Self {
            visible: true,
            drawn: true,
            opacity: OpacityTransition::settled(OPAQUE, duration, easing),
        }
    }

    /// Requested visibility.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the series still takes part in drawing.
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    #[must_use]
    pub fn alpha(&self) -> u8 {
        if self.drawn { self.opacity.alpha() } else { TRANSPARENT }
    }

    /// Drawing weight in `0.0..=1.0`.
    #[must_use]
    pub fn weight(&self) -> f64 {
        if self.drawn { self.opacity.fraction() } else { 0.0 }
    }

    /// Starts a fade toward the requested state from the current alpha.
    ///
    /// Returns `false` when the request matches the current intent.
    pub fn set_visible(&mut self, visible: bool, now: Duration) -> bool {
        if visible == self.visible {
            return false;
        }
        self.visible = visible;
        if visible {
            self.drawn = true;
        }
        self.opacity
            .retarget(if visible { OPAQUE } else { TRANSPARENT }, now);
        true
    }
}

impl Transition for SeriesVisibility {
    fn advance(&mut self, now: Duration) -> bool {
        let mut changed = self.opacity.advance(now);
        let faded_out = !self.opacity.is_running() && self.opacity.alpha() == TRANSPARENT;
        if !self.visible && self.drawn && faded_out {
            self.drawn = false;
            changed = true;
        }
        changed
    }

    fn is_running(&self) -> bool {
        self.opacity.is_running()
    }
}

/// What one [`VisibilityTracker::advance`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityStep {
    /// Series whose alpha or drawn state moved.
    pub faded: SmallVec<[SeriesId; 4]>,
    /// Series that finished fading out and are no longer drawn.
    pub dropped: SmallVec<[SeriesId; 4]>,
}

impl VisibilityStep {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faded.is_empty()
    }
}

/// Visibility of every series of the attached data.
#[derive(Debug, Clone, Default)]
pub struct VisibilityTracker {
    series: TransitionSet<SeriesId, SeriesVisibility>,
    duration: Duration,
    easing: Easing,
}

impl VisibilityTracker {
    #[must_use]
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            series: TransitionSet::new(),
            duration,
            easing,
        }
    }

    /// Resets to all-visible for a new set of series.
    pub fn reset<'a>(&mut self, ids: impl IntoIterator<Item = &'a SeriesId>) {
        self.series.clear();
        for id in ids {
            self.series
                .insert(id.clone(), SeriesVisibility::shown(self.duration, self.easing));
        }
    }

    #[must_use]
    pub fn get(&self, id: &SeriesId) -> Option<&SeriesVisibility> {
        self.series.get(id)
    }

    /// Returns `None` for an unknown id, otherwise whether the intent changed.
    pub fn set_visible(&mut self, id: &SeriesId, visible: bool, now: Duration) -> Option<bool> {
        let entry = self.series.get_mut(id)?;
        let changed = entry.set_visible(visible, now);
        if changed {
            debug!(series = %id, visible, "series visibility fade started");
        }
        Some(changed)
    }

    /// Series whose requested visibility is off, fading or not.
    #[must_use]
    pub fn hidden(&self) -> HiddenSeries {
        self.series
            .iter()
            .filter(|(_, state)| !state.is_visible())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Series no longer drawn; these are left out of bounds aggregation.
    #[must_use]
    pub fn excluded(&self) -> HiddenSeries {
        self.series
            .iter()
            .filter(|(_, state)| !state.is_drawn())
            .map(|(id, _)| id.clone())
            .collect()
    }

    #[must_use]
    pub fn weight(&self, id: &SeriesId) -> f64 {
        self.series.get(id).map_or(0.0, SeriesVisibility::weight)
    }

    #[must_use]
    pub fn alpha(&self, id: &SeriesId) -> u8 {
        self.series.get(id).map_or(TRANSPARENT, SeriesVisibility::alpha)
    }

    #[must_use]
    pub fn is_drawn(&self, id: &SeriesId) -> bool {
        self.series.get(id).is_some_and(SeriesVisibility::is_drawn)
    }

    /// Advances every fade.
    ///
    /// Drawn state only ever flips off here, so any changed series that is no
    /// longer drawn has just completed its fade-out.
    pub fn advance(&mut self, now: Duration) -> VisibilityStep {
        let faded = self.series.advance_all(now);
        let dropped = faded
            .iter()
            .filter(|id| !self.is_drawn(id))
            .cloned()
            .collect();
        VisibilityStep { faded, dropped }
    }

    #[must_use]
    pub fn any_running(&self) -> bool {
        self.series.any_running()
    }
}
