//! Scroll-driven parallax
//!
//! Progress runs from 0 when the element's top reaches the bottom of the
//! viewport to 1 when its bottom passes the top of the viewport. The
//! translation is a percentage of the element's own size.

use cadence_core::{ElementId, PerformanceFlags, Rect, Size};
use tracing::trace;

use crate::element::{Behavior, FrameContext};

/// Speed multiplier applied on top of the configured speed
const SPEED_DAMPING: f32 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParallaxDirection {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

/// Render output: translation in percent of the element size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParallaxStyle {
    pub translate_x_percent: f32,
    pub translate_y_percent: f32,
}

/// Scroll progress of `rect` through a viewport of `viewport` size
pub fn scroll_progress(rect: Rect, viewport: Size) -> f32 {
    let travel = viewport.height + rect.height();
    if travel <= 0.0 {
        return 0.0;
    }
    ((viewport.height - rect.y()) / travel).clamp(0.0, 1.0)
}

#[derive(Clone, Debug)]
pub struct ParallaxEffect {
    speed: f32,
    direction: ParallaxDirection,
    progress: f32,
}

impl Default for ParallaxEffect {
    fn default() -> Self {
        Self::new(0.2, ParallaxDirection::Up)
    }
}

impl ParallaxEffect {
    pub fn new(speed: f32, direction: ParallaxDirection) -> Self {
        Self {
            speed,
            direction,
            progress: 0.0,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn direction(&self) -> ParallaxDirection {
        self.direction
    }

    /// Set progress directly. Returns `true` if it changed.
    pub fn set_progress(&mut self, progress: f32) -> bool {
        let progress = progress.clamp(0.0, 1.0);
        if progress == self.progress {
            return false;
        }
        self.progress = progress;
        true
    }

    /// Render output under the given flags
    pub fn style(&self, flags: &PerformanceFlags) -> ParallaxStyle {
        if flags.disable_parallax {
            return ParallaxStyle::default();
        }
        let offset = self.progress * self.speed * SPEED_DAMPING * 100.0;
        match self.direction {
            ParallaxDirection::Up => ParallaxStyle {
                translate_x_percent: 0.0,
                translate_y_percent: -offset,
            },
            ParallaxDirection::Down => ParallaxStyle {
                translate_x_percent: 0.0,
                translate_y_percent: offset,
            },
            ParallaxDirection::Left => ParallaxStyle {
                translate_x_percent: -offset,
                translate_y_percent: 0.0,
            },
            ParallaxDirection::Right => ParallaxStyle {
                translate_x_percent: offset,
                translate_y_percent: 0.0,
            },
        }
    }
}

impl Behavior for ParallaxEffect {
    fn on_frame(&mut self, element: ElementId, cx: &FrameContext<'_>) -> bool {
        if cx.flags.disable_parallax {
            return false;
        }
        match cx.geometry.client_rect(element) {
            Ok(rect) => self.set_progress(scroll_progress(rect, cx.geometry.viewport())),
            Err(err) => {
                trace!(?element, %err, "parallax sample skipped");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::PerformanceTier;

    const VIEWPORT: Size = Size {
        width: 1280.0,
        height: 800.0,
    };

    #[test]
    fn test_progress_bounds() {
        // Top edge at the bottom of the viewport
        assert_eq!(
            scroll_progress(Rect::new(0.0, 800.0, 100.0, 200.0), VIEWPORT),
            0.0
        );
        // Bottom edge at the top of the viewport
        assert_eq!(
            scroll_progress(Rect::new(0.0, -200.0, 100.0, 200.0), VIEWPORT),
            1.0
        );
        // Halfway
        assert_eq!(
            scroll_progress(Rect::new(0.0, 300.0, 100.0, 200.0), VIEWPORT),
            0.5
        );
    }

    #[test]
    fn test_direction_signs() {
        let high = PerformanceFlags::for_tier(PerformanceTier::High);
        let mut up = ParallaxEffect::new(0.2, ParallaxDirection::Up);
        up.set_progress(1.0);
        let style = up.style(high);
        assert!((style.translate_y_percent + 10.0).abs() < 1e-4);
        assert_eq!(style.translate_x_percent, 0.0);

        let mut right = ParallaxEffect::new(0.4, ParallaxDirection::Right);
        right.set_progress(0.5);
        assert!((right.style(high).translate_x_percent - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_is_static() {
        let low = PerformanceFlags::for_tier(PerformanceTier::Low);
        let mut effect = ParallaxEffect::default();
        effect.set_progress(0.8);
        assert_eq!(effect.style(low), ParallaxStyle::default());
    }
}
