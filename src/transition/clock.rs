use std::time::Duration;

/// Engine time, advanced only by host ticks.
///
/// The engine never reads a wall clock; every transition samples this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AnimationClock {
    now: Duration,
}

impl AnimationClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Advances by one frame and returns the new time.
    pub fn tick(&mut self, delta: Duration) -> Duration {
        self.now = self.now.saturating_add(delta);
        self.now
    }
}

/// Linear progress of a timed transition, clamped to `0.0..=1.0`.
///
/// A zero duration completes immediately.
#[must_use]
pub fn linear_progress(started_at: Duration, duration: Duration, now: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(started_at);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}
