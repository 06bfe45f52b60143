//! Count-up numbers

use std::fmt;

use cadence_animation::{Spring, SpringConfig};
use cadence_core::{ElementId, PerformanceFlags};

use super::{Variant, MAX_SPRING_STEP};
use crate::element::{Behavior, FrameContext};
use crate::visibility::{VisibilityConfig, VisibilityTrigger};

/// Turns the animated value into display text
pub type ValueFormatter = Box<dyn Fn(f32) -> String>;

/// Default formatter: nearest integer
pub fn format_rounded(value: f32) -> String {
    format!("{}", value.round() as i64)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterConfig {
    /// Approximate time to reach the target, in seconds
    pub duration_secs: f32,
    pub visibility: VisibilityConfig,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_secs: 1.5,
            visibility: VisibilityConfig::counter(),
        }
    }
}

/// Springs from zero to its value the first time it scrolls into view
pub struct AnimatedCounter {
    value: f32,
    config: CounterConfig,
    trigger: VisibilityTrigger,
    spring: Spring,
    formatter: ValueFormatter,
    display: String,
}

impl AnimatedCounter {
    pub fn new(value: f32, config: CounterConfig) -> Self {
        let formatter: ValueFormatter = Box::new(format_rounded);
        Self {
            display: formatter(0.0),
            value,
            trigger: VisibilityTrigger::new(config.visibility),
            spring: Spring::new(SpringConfig::for_duration(config.duration_secs), 0.0),
            formatter,
            config,
        }
    }

    pub fn with_formatter(mut self, formatter: impl Fn(f32) -> String + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self.display = (self.formatter)(self.spring.value());
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Text to render
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_visible(&self) -> bool {
        self.trigger.is_visible()
    }

    pub fn is_settled(&self) -> bool {
        self.spring.is_settled() && self.spring.target() == self.value
    }

    /// Spring duration under the given flags
    pub fn effective_duration(&self, flags: &PerformanceFlags) -> f32 {
        if flags.use_minimal_animations {
            self.config.duration_secs * 0.5
        } else {
            self.config.duration_secs
        }
    }

    /// Change the target. Once visible, the spring retargets from where it is.
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        if self.trigger.is_visible() {
            self.spring.set_target(value);
        }
    }

    /// Mark the counter visible without a geometry sample
    pub fn reveal(&mut self, flags: &PerformanceFlags) {
        self.trigger.set_visible(true);
        self.retarget(flags);
    }

    fn retarget(&mut self, flags: &PerformanceFlags) {
        self.spring
            .set_config(SpringConfig::for_duration(self.effective_duration(flags)));
        self.spring.set_target(self.value);
    }

    /// Advance by `dt` seconds. Returns `true` if the display text changed.
    pub fn advance(&mut self, dt: f32, flags: &PerformanceFlags) -> bool {
        let next = if Variant::for_flags(flags).is_minimal() {
            self.spring.set_immediate(self.value);
            (self.formatter)(self.value)
        } else {
            self.spring.advance(dt, MAX_SPRING_STEP);
            (self.formatter)(self.spring.value())
        };

        if next == self.display {
            return false;
        }
        self.display = next;
        true
    }
}

impl fmt::Debug for AnimatedCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedCounter")
            .field("value", &self.value)
            .field("display", &self.display)
            .field("visible", &self.trigger.is_visible())
            .finish()
    }
}

impl Behavior for AnimatedCounter {
    fn on_frame(&mut self, element: ElementId, cx: &FrameContext<'_>) -> bool {
        if self.trigger.sample(cx.geometry, element) && self.trigger.is_visible() {
            self.retarget(cx.flags);
        }
        self.advance(cx.dt.as_secs_f32(), cx.flags)
    }

    fn has_pending(&self) -> bool {
        self.trigger.is_visible() && !self.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::PerformanceTier;

    #[test]
    fn test_holds_zero_until_visible() {
        let high = PerformanceFlags::for_tier(PerformanceTier::High);
        let mut counter = AnimatedCounter::new(250.0, CounterConfig::default());
        for _ in 0..30 {
            counter.advance(1.0 / 60.0, high);
        }
        assert_eq!(counter.display(), "0");
        assert!(!counter.has_pending());
    }

    #[test]
    fn test_counts_up_once_revealed() {
        let high = PerformanceFlags::for_tier(PerformanceTier::High);
        let mut counter = AnimatedCounter::new(250.0, CounterConfig::default());
        counter.reveal(high);

        counter.advance(0.25, high);
        let partial: i64 = counter.display().parse().unwrap();
        assert!(partial > 0 && partial < 250);
        assert!(counter.has_pending());

        counter.advance(3.0, high);
        assert_eq!(counter.display(), "250");
        assert!(counter.is_settled());
        assert!(!counter.has_pending());
    }

    #[test]
    fn test_minimal_snaps() {
        let low = PerformanceFlags::for_tier(PerformanceTier::Low);
        let mut counter = AnimatedCounter::new(42.4, CounterConfig::default())
            .with_formatter(|v| format!("{v:.1}+"));
        assert!(counter.advance(0.0, low));
        assert_eq!(counter.display(), "42.4+");
    }

    #[test]
    fn test_default_formatter_rounds() {
        assert_eq!(format_rounded(99.5), "100");
        assert_eq!(format_rounded(-0.2), "0");
        assert_eq!(format_rounded(12.49), "12");
    }
}
