use std::time::Duration;

use approx::assert_relative_eq;
use telechart::core::{Bounds, Count, Real, SeriesId};
use telechart::transition::{
    AnimationClock, BoundsAnimator, Easing, OPAQUE, OpacityTransition, TRANSPARENT, Transition,
    TransitionSet, VisibilityTracker,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn halfway_through_a_linear_bounds_transition() {
    let mut clock = AnimationClock::new();
    let mut animator =
        BoundsAnimator::settled(Bounds::new(0, 99, Count(0), Count(10)), ms(250), Easing::Linear);
    assert!(animator.set_target(Bounds::new(0, 99, Count(0), Count(100)), clock.now()));

    animator.advance(clock.tick(ms(125)));
    assert_eq!(animator.current().max_y, Count(55));
    assert_eq!(animator.current().min_y, Count(0));

    animator.advance(clock.tick(ms(125)));
    assert_eq!(animator.current().max_y, Count(100));
    assert!(!animator.is_running());
}

#[test]
fn real_bounds_interpolate_continuously() {
    let mut animator = BoundsAnimator::settled(
        Bounds::new(0, 9, Real::new(0.0), Real::new(10.0)),
        ms(250),
        Easing::Linear,
    );
    animator.set_target(Bounds::new(0, 9, Real::new(0.0), Real::new(100.0)), ms(0));
    animator.advance(ms(125));
    assert_relative_eq!(animator.current().max_y.0.0, 55.0, epsilon = 1e-9);
}

#[test]
fn repeated_identical_targets_do_not_restart() {
    let mut animator =
        BoundsAnimator::settled(Bounds::new(0, 9, Count(0), Count(10)), ms(200), Easing::Linear);
    assert!(animator.set_target(Bounds::new(0, 9, Count(0), Count(50)), ms(0)));
    for step in 1..5u64 {
        animator.advance(ms(step * 20));
        assert!(!animator.set_target(Bounds::new(0, 9, Count(0), Count(50)), ms(step * 20)));
    }
    assert_eq!(animator.started_at(), ms(0));
    animator.advance(ms(200));
    assert_eq!(animator.current().max_y, Count(50));
}

#[test]
fn eased_curves_keep_their_endpoints() {
    for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut, Easing::CubicOut] {
        assert_relative_eq!(easing.apply(0.0), 0.0);
        assert_relative_eq!(easing.apply(1.0), 1.0);
    }
}

#[test]
fn independent_transitions_advance_together() {
    let mut set = TransitionSet::new();
    let linear = Easing::Linear;
    set.insert("a", OpacityTransition::starting(OPAQUE, TRANSPARENT, ms(0), ms(100), linear));
    set.insert("b", OpacityTransition::starting(TRANSPARENT, OPAQUE, ms(0), ms(300), linear));

    let changed = set.advance_all(ms(100));
    assert_eq!(changed.len(), 2);
    assert_eq!(set.get(&"a").map(OpacityTransition::alpha), Some(TRANSPARENT));
    assert!(set.any_running());

    set.advance_all(ms(300));
    assert!(!set.any_running());
    assert_eq!(set.get(&"b").map(OpacityTransition::alpha), Some(OPAQUE));
}

#[test]
fn hidden_series_stays_drawn_until_its_fade_ends() {
    let id = SeriesId::new("y0");
    let mut tracker = VisibilityTracker::new(ms(250), Easing::Linear);
    tracker.reset([&id]);

    assert_eq!(tracker.set_visible(&id, false, ms(0)), Some(true));
    assert!(tracker.hidden().contains(&id));
    assert!(tracker.is_drawn(&id));

    tracker.advance(ms(125));
    assert!(tracker.is_drawn(&id));
    assert!(tracker.alpha(&id) > TRANSPARENT && tracker.alpha(&id) < OPAQUE);

    tracker.advance(ms(250));
    assert!(!tracker.is_drawn(&id));
    assert_eq!(tracker.weight(&id), 0.0);
    assert_eq!(tracker.set_visible(&SeriesId::new("missing"), true, ms(250)), None);
}

#[test]
fn showing_again_mid_fade_reverses_from_the_current_alpha() {
    let id = SeriesId::new("y0");
    let mut tracker = VisibilityTracker::new(ms(100), Easing::Linear);
    tracker.reset([&id]);
    tracker.set_visible(&id, false, ms(0));
    tracker.advance(ms(50));
    let halfway = tracker.alpha(&id);

    assert_eq!(tracker.set_visible(&id, true, ms(50)), Some(true));
    assert_eq!(tracker.alpha(&id), halfway);
    tracker.advance(ms(150));
    assert_eq!(tracker.alpha(&id), OPAQUE);
    assert!(tracker.hidden().is_empty());
}
