//! Active-section underline for the navigation bar

use cadence_animation::{Spring, SpringConfig};
use cadence_core::{ElementId, PerformanceFlags};
use indexmap::IndexMap;
use tracing::trace;

use super::MAX_SPRING_STEP;
use crate::element::{Behavior, FrameContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorMode {
    /// Spring-animated between nav items
    Animated,
    /// Drawn directly under the active item
    Static,
}

impl IndicatorMode {
    pub fn for_flags(flags: &PerformanceFlags) -> Self {
        if flags.enabled && !flags.use_minimal_animations {
            IndicatorMode::Animated
        } else {
            IndicatorMode::Static
        }
    }
}

/// Where to draw the underline, in client x coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorStyle {
    pub section: String,
    pub left: f32,
    pub width: f32,
    pub mode: IndicatorMode,
}

/// Follows the scroll tracker's active section across nav items
#[derive(Debug)]
pub struct ActiveSectionIndicator {
    items: IndexMap<String, ElementId>,
    left: Spring,
    width: Spring,
    section: Option<String>,
    placed: bool,
    mode: IndicatorMode,
}

impl Default for ActiveSectionIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveSectionIndicator {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            left: Spring::new(SpringConfig::indicator(), 0.0),
            width: Spring::new(SpringConfig::indicator(), 0.0),
            section: None,
            placed: false,
            mode: IndicatorMode::Animated,
        }
    }

    /// Register the nav link element for a section id
    pub fn add_item(&mut self, section: impl Into<String>, link: ElementId) {
        self.items.insert(section.into(), link);
    }

    pub fn with_item(mut self, section: impl Into<String>, link: ElementId) -> Self {
        self.add_item(section, link);
        self
    }

    pub fn spring_config(flags: &PerformanceFlags) -> SpringConfig {
        if flags.use_simplified_effects {
            SpringConfig::indicator_simplified()
        } else {
            SpringConfig::indicator()
        }
    }

    /// Current render output, `None` until a section is active and placed
    pub fn style(&self) -> Option<IndicatorStyle> {
        let section = self.section.as_ref()?;
        if !self.placed {
            return None;
        }
        Some(IndicatorStyle {
            section: section.clone(),
            left: self.left.value(),
            width: self.width.value(),
            mode: self.mode,
        })
    }

    pub fn is_settled(&self) -> bool {
        self.left.is_settled() && self.width.is_settled()
    }

    /// Aim at `section`'s nav item at (`left`, `width`) and advance by `dt`
    /// seconds. Returns `true` if the output changed.
    pub fn update(
        &mut self,
        section: Option<&str>,
        target: Option<(f32, f32)>,
        dt: f32,
        flags: &PerformanceFlags,
    ) -> bool {
        let before = self.style();
        self.mode = IndicatorMode::for_flags(flags);
        self.section = section.map(str::to_owned);

        if let Some((left, width)) = target {
            if !self.placed || self.mode == IndicatorMode::Static {
                // First placement and the static mode never animate
                self.left.set_immediate(left);
                self.width.set_immediate(width);
                self.placed = true;
            } else {
                let config = Self::spring_config(flags);
                self.left.set_config(config);
                self.width.set_config(config);
                self.left.set_target(left);
                self.width.set_target(width);
            }
        }

        self.left.advance(dt, MAX_SPRING_STEP);
        self.width.advance(dt, MAX_SPRING_STEP);
        before != self.style()
    }
}

impl Behavior for ActiveSectionIndicator {
    fn on_frame(&mut self, _element: ElementId, cx: &FrameContext<'_>) -> bool {
        let section = cx.scroll.active_section();
        let target = section
            .and_then(|s| self.items.get(s).copied())
            .and_then(|link| match cx.geometry.client_rect(link) {
                Ok(rect) => Some((rect.x(), rect.width())),
                Err(err) => {
                    trace!(?link, %err, "nav item unavailable");
                    None
                }
            });
        self.update(section, target, cx.dt.as_secs_f32(), cx.flags)
    }

    fn has_pending(&self) -> bool {
        self.placed && !self.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::PerformanceTier;

    #[test]
    fn test_first_placement_snaps_then_springs() {
        let high = PerformanceFlags::for_tier(PerformanceTier::High);
        let mut indicator = ActiveSectionIndicator::new();
        assert!(indicator.style().is_none());

        indicator.update(Some("about"), Some((100.0, 60.0)), 1.0 / 60.0, high);
        let style = indicator.style().unwrap();
        assert_eq!((style.left, style.width), (100.0, 60.0));
        assert_eq!(style.mode, IndicatorMode::Animated);

        indicator.update(Some("work"), Some((300.0, 40.0)), 1.0 / 60.0, high);
        let moving = indicator.style().unwrap();
        assert!(moving.left > 100.0 && moving.left < 300.0);
        assert_eq!(moving.section, "work");
        assert!(indicator.has_pending());

        for _ in 0..120 {
            indicator.update(Some("work"), Some((300.0, 40.0)), 1.0 / 60.0, high);
        }
        assert!(indicator.is_settled());
        assert!(!indicator.has_pending());
        assert_eq!(indicator.style().unwrap().left, 300.0);
    }

    #[test]
    fn test_static_when_minimal() {
        let low = PerformanceFlags::for_tier(PerformanceTier::Low);
        let mut indicator = ActiveSectionIndicator::new();
        indicator.update(Some("about"), Some((100.0, 60.0)), 0.016, low);
        indicator.update(Some("work"), Some((300.0, 40.0)), 0.016, low);
        let style = indicator.style().unwrap();
        assert_eq!((style.left, style.width), (300.0, 40.0));
        assert_eq!(style.mode, IndicatorMode::Static);
    }

    #[test]
    fn test_simplified_uses_softer_spring() {
        let medium = PerformanceFlags::for_tier(PerformanceTier::Medium);
        assert_eq!(
            ActiveSectionIndicator::spring_config(medium),
            SpringConfig::indicator_simplified()
        );
    }
}
