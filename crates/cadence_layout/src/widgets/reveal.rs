//! Reveal-on-scroll

use std::time::Duration;

use cadence_animation::{Easing, Tween};
use cadence_core::{ElementId, PerformanceFlags, Timestamp};

use super::Variant;
use crate::element::{Behavior, FrameContext, Listeners};
use crate::visibility::{VisibilityConfig, VisibilityTrigger};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealConfig {
    /// Wait before the full variant starts; the minimal variant ignores it
    pub delay: Duration,
    /// Upward travel of the full variant, in px
    pub distance: f32,
    pub visibility: VisibilityConfig,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            distance: 20.0,
            visibility: VisibilityConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    /// Vertical offset in px, positive is down
    pub translate_y: f32,
}

impl RevealStyle {
    pub const VISIBLE: RevealStyle = RevealStyle {
        opacity: 1.0,
        translate_y: 0.0,
    };

    pub fn hidden(variant: Variant, distance: f32) -> Self {
        RevealStyle {
            opacity: 0.0,
            translate_y: if variant.is_minimal() { 0.0 } else { distance },
        }
    }
}

/// Fades (and for the full variant, slides up) content on first sight
#[derive(Clone, Debug)]
pub struct RevealText {
    config: RevealConfig,
    trigger: VisibilityTrigger,
    opacity: Tween<f32>,
    offset: Tween<f32>,
    current: RevealStyle,
}

impl Default for RevealText {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

impl RevealText {
    pub fn new(config: RevealConfig) -> Self {
        let hidden = RevealStyle::hidden(Variant::Full, config.distance);
        Self {
            trigger: VisibilityTrigger::new(config.visibility),
            opacity: Tween::settled(hidden.opacity),
            offset: Tween::settled(hidden.translate_y),
            current: hidden,
            config,
        }
    }

    pub fn style(&self) -> RevealStyle {
        self.current
    }

    pub fn is_visible(&self) -> bool {
        self.trigger.is_visible()
    }

    /// Start the transition toward shown or hidden
    pub fn show(&mut self, visible: bool, now: Timestamp, flags: &PerformanceFlags) {
        let variant = Variant::for_flags(flags);
        let target = if visible {
            RevealStyle::VISIBLE
        } else {
            RevealStyle::hidden(variant, self.config.distance)
        };
        let delay = if variant.is_minimal() {
            Duration::ZERO
        } else {
            self.config.delay
        };

        let duration = flags.duration();
        self.opacity = Tween::new(self.current.opacity, target.opacity, duration)
            .with_delay(delay)
            .with_easing(Easing::Ease);
        self.offset = Tween::new(self.current.translate_y, target.translate_y, duration)
            .with_delay(delay)
            .with_easing(Easing::Ease);
        self.opacity.start(now);
        self.offset.start(now);
    }

    /// Sample the running transition. Returns `true` if the style changed.
    pub fn advance(&mut self, now: Timestamp) -> bool {
        let next = RevealStyle {
            opacity: self.opacity.value_at(now),
            translate_y: self.offset.value_at(now),
        };
        let changed = next != self.current;
        self.current = next;
        changed
    }
}

impl Behavior for RevealText {
    fn mount(&mut self, _listeners: &mut Listeners, flags: &'static PerformanceFlags) {
        if !self.trigger.is_visible() {
            let hidden = RevealStyle::hidden(Variant::for_flags(flags), self.config.distance);
            self.opacity = Tween::settled(hidden.opacity);
            self.offset = Tween::settled(hidden.translate_y);
            self.current = hidden;
        }
    }

    fn on_frame(&mut self, element: ElementId, cx: &FrameContext<'_>) -> bool {
        if self.trigger.sample(cx.geometry, element) {
            self.show(self.trigger.is_visible(), cx.now, cx.flags);
        }
        self.advance(cx.now)
    }

    fn has_pending(&self) -> bool {
        self.current.opacity != *self.opacity.to_value()
            || self.current.translate_y != *self.offset.to_value()
    }
}
