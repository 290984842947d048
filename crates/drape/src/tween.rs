//! Time-based tweens as plain values.
//!
//! A [`Tween`] knows where it started, where it goes and when; sampling it
//! never mutates anything. [`Animated`] pairs a value with at most one running
//! tween so that a new request replaces the old one instead of stacking.
//! All times are seconds on the caller's frame clock.

use glam::Vec3;

/// Easing curves (gsap naming: power1 is quadratic, power2 cubic, power3 quartic,
/// strong quintic). `Power1Out` is what an unspecified ease means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    #[default]
    Linear,
    Power1Out,
    Power2Out,
    Power3In,
    Power3Out,
    StrongOut,
    StrongInOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t).powi(2),
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power3In => t.powi(4),
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
            Ease::StrongOut => 1.0 - (1.0 - t).powi(5),
            Ease::StrongInOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
        }
    }
}

pub trait Tweenable: Copy {
    fn lerp_to(self, to: Self, t: f32) -> Self;
}

impl Tweenable for f32 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Tweenable for Vec3 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenState<T> {
    /// Still inside its start delay.
    Pending,
    Running(T),
    Finished(T),
}

#[derive(Clone, Copy, Debug)]
pub struct Tween<T> {
    from: T,
    to: T,
    started_at: f32,
    delay: f32,
    duration: f32,
    ease: Ease,
}

impl<T: Tweenable> Tween<T> {
    pub fn start(from: T, to: T, now: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            started_at: now,
            delay: 0.0,
            duration: duration.max(0.0),
            ease,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn end_time(&self) -> f32 {
        self.started_at + self.delay + self.duration
    }

    /// Un-eased progress in `[0, 1]`.
    pub fn progress(&self, now: f32) -> f32 {
        let local = now - self.started_at - self.delay;
        if self.duration == 0.0 {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        (local / self.duration).clamp(0.0, 1.0)
    }

    pub fn update(&self, now: f32) -> TweenState<T> {
        if now < self.started_at + self.delay {
            return TweenState::Pending;
        }
        if now >= self.end_time() {
            return TweenState::Finished(self.to);
        }
        let t = self.ease.apply(self.progress(now));
        TweenState::Running(self.from.lerp_to(self.to, t))
    }

    pub fn value_at(&self, now: f32) -> T {
        match self.update(now) {
            TweenState::Pending => self.from,
            TweenState::Running(v) | TweenState::Finished(v) => v,
        }
    }
}

/// A value driven by at most one tween at a time.
#[derive(Clone, Copy, Debug)]
pub struct Animated<T> {
    value: T,
    tween: Option<Tween<T>>,
}

impl<T: Tweenable> Animated<T> {
    pub fn new(value: T) -> Self {
        Self { value, tween: None }
    }

    pub fn value(&self) -> T {
        self.value
    }

    /// Jumps to `value`, dropping any running tween.
    pub fn set(&mut self, value: T) {
        self.tween = None;
        self.value = value;
    }

    /// Replaces the running tween (if any) with one starting from the current value.
    /// A zero duration applies `to` immediately.
    pub fn animate_to(&mut self, to: T, now: f32, duration: f32, ease: Ease) {
        if duration <= 0.0 {
            self.set(to);
            return;
        }
        self.tween = Some(Tween::start(self.value, to, now, duration, ease));
    }

    pub fn cancel(&mut self) {
        self.tween = None;
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Advances to `now`. Returns `true` on the call that completes the tween.
    pub fn update(&mut self, now: f32) -> bool {
        let Some(tween) = self.tween else {
            return false;
        };
        match tween.update(now) {
            TweenState::Pending => false,
            TweenState::Running(v) => {
                self.value = v;
                false
            }
            TweenState::Finished(v) => {
                self.value = v;
                self.tween = None;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Ease::Linear)]
    #[case(Ease::Power1Out)]
    #[case(Ease::Power2Out)]
    #[case(Ease::Power3In)]
    #[case(Ease::Power3Out)]
    #[case(Ease::StrongOut)]
    #[case(Ease::StrongInOut)]
    fn test_ease_endpoints(#[case] ease: Ease) {
        assert!(ease.apply(0.0).abs() < 1e-6);
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_strong_in_out_is_symmetric() {
        let a = Ease::StrongInOut.apply(0.25);
        let b = Ease::StrongInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tween_respects_delay() {
        let tween = Tween::start(0.0_f32, 10.0, 1.0, 2.0, Ease::Linear).with_delay(0.5);
        assert_eq!(tween.update(1.2), TweenState::Pending);
        assert_eq!(tween.value_at(1.2), 0.0);
        assert_eq!(tween.update(2.5), TweenState::Running(5.0));
        assert_eq!(tween.update(3.5), TweenState::Finished(10.0));
        assert!((tween.end_time() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_animated_completes_once() {
        let mut force = Animated::new(0.0_f32);
        force.animate_to(40.0, 0.0, 2.0, Ease::Linear);
        assert!(!force.update(1.0));
        assert!((force.value() - 20.0).abs() < 1e-4);
        assert!(force.update(2.0));
        assert_eq!(force.value(), 40.0);
        assert!(!force.update(3.0));
        assert!(!force.is_animating());
    }

    #[test]
    fn test_animated_retarget_starts_from_current_value() {
        let mut value = Animated::new(0.0_f32);
        value.animate_to(10.0, 0.0, 1.0, Ease::Linear);
        value.update(0.5);
        value.animate_to(0.0, 0.5, 1.0, Ease::Linear);
        value.update(1.0);
        assert!((value.value() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_cancel_keeps_last_sample() {
        let mut value = Animated::new(Vec3::ZERO);
        value.animate_to(Vec3::X, 0.0, 1.0, Ease::Linear);
        value.update(0.5);
        value.cancel();
        value.update(5.0);
        assert!((value.value().x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let mut value = Animated::new(3.0_f32);
        value.animate_to(0.0, 10.0, 0.0, Ease::StrongOut);
        assert_eq!(value.value(), 0.0);
        assert!(!value.is_animating());
    }
}
