use std::time::Duration;

use super::{Easing, Transition, linear_progress};

pub const OPAQUE: u8 = 255;
pub const TRANSPARENT: u8 = 0;

/// Timed alpha ramp between `0` and `255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpacityTransition {
    from: u8,
    to: u8,
    current: u8,
    started_at: Duration,
    duration: Duration,
    easing: Easing,
    running: bool,
}

impl OpacityTransition {
    #[must_use]
    pub fn settled(alpha: u8, duration: Duration, easing: Easing) -> Self {
        Self {
            from: alpha,
            to: alpha,
            current: alpha,
            started_at: Duration::ZERO,
            duration,
            easing,
            running: false,
        }
    }

    /// Ramp from `from` to `to` starting at `now`.
    #[must_use]
    pub fn starting(from: u8, to: u8, now: Duration, duration: Duration, easing: Easing) -> Self {
        let mut transition = Self::settled(from, duration, easing);
        transition.retarget(to, now);
        transition
    }

    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.current
    }

    /// Alpha as a `0.0..=1.0` weight.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        f64::from(self.current) / f64::from(OPAQUE)
    }

    #[must_use]
    pub fn target(&self) -> u8 {
        self.to
    }

    #[must_use]
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    /// Cancels the running ramp and starts a new one from the current alpha.
    ///
    /// Returns `false` when `to` is already the target.
    pub fn retarget(&mut self, to: u8, now: Duration) -> bool {
        if to == self.to {
            return false;
        }
        self.sample(now);
        self.from = self.current;
        self.to = to;
        self.started_at = now;
        self.running = self.from != self.to;
        true
    }

    fn sample(&mut self, now: Duration) -> bool {
        if !self.running {
            return false;
        }
        let progress = linear_progress(self.started_at, self.duration, now);
        let next = if progress >= 1.0 {
            self.running = false;
            self.to
        } else {
            let eased = self.easing.apply(progress);
            let from = f64::from(self.from);
            let to = f64::from(self.to);
            (from + (to - from) * eased).round().clamp(0.0, 255.0) as u8
        };
        let changed = next != self.current;
        self.current = next;
        changed
    }
}

impl Transition for OpacityTransition {
    fn advance(&mut self, now: Duration) -> bool {
        self.sample(now)
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::{OPAQUE, OpacityTransition, TRANSPARENT};
    use crate::transition::{Easing, Transition};
    use std::time::Duration;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn fade_out() -> OpacityTransition {
        OpacityTransition::starting(OPAQUE, TRANSPARENT, ms(0), ms(100), Easing::Linear)
    }

    #[test]
    fn fades_to_target_and_stops() {
        let mut fade = fade_out();
        assert!(fade.is_running());
        fade.advance(ms(50));
        assert_eq!(fade.alpha(), 128);
        fade.advance(ms(100));
        assert_eq!(fade.alpha(), TRANSPARENT);
        assert!(!fade.is_running());
    }

    #[test]
    fn reversal_starts_from_current_alpha() {
        let mut fade = fade_out();
        fade.advance(ms(40));
        assert!(fade.retarget(OPAQUE, ms(40)));
        assert_eq!(fade.alpha(), 153);
        fade.advance(ms(90));
        assert_eq!(fade.alpha(), 204);
        fade.advance(ms(140));
        assert_eq!(fade.alpha(), OPAQUE);
    }

    #[test]
    fn same_target_is_ignored() {
        let mut fade = fade_out();
        assert!(!fade.retarget(TRANSPARENT, ms(30)));
        assert_eq!(fade.started_at(), ms(0));
    }
}
