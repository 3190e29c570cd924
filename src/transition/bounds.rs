use std::time::Duration;

use tracing::trace;

use crate::core::{Bounds, Coordinate};
use crate::pipeline::BoundsChange;

use super::{Easing, Transition, linear_progress};

/// Animates the Y range of a [`Bounds`] toward a target.
///
/// The X window is never interpolated: it snaps to the target so points and
/// labels stay aligned to whole indices. Retargeting mid-flight starts from
/// the currently displayed Y range, and a target whose Y range equals the
/// in-flight target leaves the running transition untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsAnimator<Y: Coordinate> {
    current: Bounds<Y>,
    start: (Y, Y),
    target: Bounds<Y>,
    started_at: Duration,
    duration: Duration,
    easing: Easing,
    running: bool,
    pending: BoundsChange,
}

impl<Y: Coordinate> BoundsAnimator<Y> {
    /// Animator at rest on `bounds`.
    #[must_use]
    pub fn settled(bounds: Bounds<Y>, duration: Duration, easing: Easing) -> Self {
        Self {
            current: bounds,
            start: (bounds.min_y, bounds.max_y),
            target: bounds,
            started_at: Duration::ZERO,
            duration,
            easing,
            running: false,
            pending: BoundsChange::none(),
        }
    }

    #[must_use]
    pub fn current(&self) -> &Bounds<Y> {
        &self.current
    }

    #[must_use]
    pub fn target(&self) -> &Bounds<Y> {
        &self.target
    }

    #[must_use]
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Y range interpolated at `progress` between the start and the target.
    #[must_use]
    pub fn interpolate(&self, progress: f64) -> (Y, Y) {
        let eased = self.easing.apply(progress);
        (
            self.start.0.lerp(self.target.min_y, eased),
            self.start.1.lerp(self.target.max_y, eased),
        )
    }

    /// Points the animator at `target`.
    ///
    /// Returns `true` when a new Y transition was started.
    pub fn set_target(&mut self, target: Bounds<Y>, now: Duration) -> bool {
        if !self.current.x_equals(&target) {
            self.current = self.current.with_x(target.min_x_index, target.max_x_index);
            self.pending = self.pending.with_x();
        }
        if self.target.y_equals(&target) {
            self.target = target;
            trace!("bounds target y unchanged; keeping in-flight transition");
            return false;
        }

        self.sample(now);
        self.target = target;
        self.start = (self.current.min_y, self.current.max_y);
        self.started_at = now;
        self.running = true;
        trace!(
            start = ?self.start,
            min_y = ?target.min_y,
            max_y = ?target.max_y,
            "bounds transition started"
        );
        true
    }

    /// Snaps everything to `target` without animating.
    pub fn jump_to(&mut self, target: Bounds<Y>) {
        if !self.current.x_equals(&target) {
            self.pending = self.pending.with_x();
        }
        if !self.current.y_equals(&target) {
            self.pending = self.pending.with_y();
        }
        self.current = target;
        self.target = target;
        self.start = (target.min_y, target.max_y);
        self.running = false;
    }

    /// Returns and clears the changes produced since the last call.
    pub fn take_change(&mut self) -> BoundsChange {
        std::mem::replace(&mut self.pending, BoundsChange::none())
    }

    fn sample(&mut self, now: Duration) {
        if !self.running {
            return;
        }
        let progress = linear_progress(self.started_at, self.duration, now);
        let (min_y, max_y) = if progress >= 1.0 {
            self.running = false;
            (self.target.min_y, self.target.max_y)
        } else {
            self.interpolate(progress)
        };
        let next = self.current.with_y(min_y, max_y);
        if !next.y_equals(&self.current) {
            self.pending = self.pending.with_y();
        }
        self.current = next;
    }
}

impl<Y: Coordinate> Transition for BoundsAnimator<Y> {
    fn advance(&mut self, now: Duration) -> bool {
        self.sample(now);
        !self.pending.is_none()
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::BoundsAnimator;
    use crate::core::{Bounds, Count};
    use crate::transition::{Easing, Transition};
    use std::time::Duration;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn x_snaps_while_y_animates() {
        let mut animator = BoundsAnimator::settled(
            Bounds::new(0, 10, Count(0), Count(10)),
            ms(250),
            Easing::Linear,
        );
        animator.set_target(Bounds::new(5, 20, Count(0), Count(100)), ms(0));
        assert_eq!(animator.current().min_x_index, 5);
        assert_eq!(animator.current().max_y, Count(10));

        animator.advance(ms(125));
        assert_eq!(animator.current().max_y, Count(55));
        assert!(animator.take_change().y_changed());

        animator.advance(ms(250));
        assert_eq!(animator.current().max_y, Count(100));
        assert!(!animator.is_running());
    }

    #[test]
    fn retarget_starts_from_displayed_value() {
        let mut animator = BoundsAnimator::settled(
            Bounds::new(0, 10, Count(0), Count(0)),
            ms(100),
            Easing::Linear,
        );
        animator.set_target(Bounds::new(0, 10, Count(0), Count(100)), ms(0));
        animator.advance(ms(50));
        assert!(animator.set_target(Bounds::new(0, 10, Count(0), Count(0)), ms(50)));
        animator.advance(ms(50));
        assert_eq!(animator.current().max_y, Count(50));
        animator.advance(ms(100));
        assert_eq!(animator.current().max_y, Count(25));
    }

    #[test]
    fn equal_target_keeps_timer() {
        let mut animator = BoundsAnimator::settled(
            Bounds::new(0, 10, Count(0), Count(10)),
            ms(100),
            Easing::Linear,
        );
        assert!(animator.set_target(Bounds::new(0, 10, Count(0), Count(90)), ms(0)));
        animator.advance(ms(40));
        assert!(!animator.set_target(Bounds::new(2, 12, Count(0), Count(90)), ms(40)));
        assert_eq!(animator.started_at(), ms(0));
        assert_eq!(animator.target().max_y, Count(90));
        assert_eq!(animator.current().min_x_index, 2);
    }
}
