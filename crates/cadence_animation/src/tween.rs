//! Timed transitions
//!
//! A [`Tween`] moves an [`Interpolate`] value from one state to another over a
//! fixed duration, after an optional delay. Tweens are sampled with the host's
//! [`Timestamp`] rather than stepped, so a late frame never skews the curve.

use std::time::Duration;

use cadence_core::{Point, Timestamp};

use crate::easing::Easing;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for Point {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Point::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

/// Where a tween is in its lifetime at a given instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenPhase {
    /// Not started yet
    Idle,
    /// Started, still inside the delay
    Delayed,
    Running,
    Finished,
}

/// A one-shot transition between two values
#[derive(Clone, Debug)]
pub struct Tween<T: Interpolate> {
    from: T,
    to: T,
    duration: Duration,
    delay: Duration,
    easing: Easing,
    started_at: Option<Timestamp>,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            delay: Duration::ZERO,
            easing: Easing::default(),
            started_at: None,
        }
    }

    /// A tween that is already at rest on `value`
    pub fn settled(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
            duration: Duration::ZERO,
            delay: Duration::ZERO,
            easing: Easing::Linear,
            started_at: Some(Timestamp::ZERO),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn from_value(&self) -> &T {
        &self.from
    }

    pub fn to_value(&self) -> &T {
        &self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Start (or restart) the tween at `now`
    pub fn start(&mut self, now: Timestamp) {
        self.started_at = Some(now);
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Linear progress in `[0, 1]`, before easing
    pub fn progress(&self, now: Timestamp) -> f32 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        let elapsed = now.saturating_since(start);
        if elapsed < self.delay {
            return 0.0;
        }
        let running = elapsed - self.delay;
        if self.duration.is_zero() {
            return 1.0;
        }
        (running.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn phase(&self, now: Timestamp) -> TweenPhase {
        let Some(start) = self.started_at else {
            return TweenPhase::Idle;
        };
        let elapsed = now.saturating_since(start);
        if elapsed < self.delay {
            TweenPhase::Delayed
        } else if elapsed >= self.delay + self.duration {
            TweenPhase::Finished
        } else {
            TweenPhase::Running
        }
    }

    pub fn is_finished(&self, now: Timestamp) -> bool {
        self.phase(now) == TweenPhase::Finished
    }

    /// Sample the eased value at `now`
    pub fn value_at(&self, now: Timestamp) -> T {
        match self.phase(now) {
            TweenPhase::Idle | TweenPhase::Delayed => self.from.clone(),
            TweenPhase::Finished => self.to.clone(),
            TweenPhase::Running => {
                let t = self.easing.apply(self.progress(now));
                self.from.lerp(&self.to, t)
            }
        }
    }
}
