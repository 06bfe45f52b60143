//! Viewport visibility triggers
//!
//! An element counts as visible when enough of it (by area) overlaps the
//! viewport grown by a margin. Negative margins shrink the viewport, so the
//! element has to travel further in before it triggers.

use cadence_core::{ElementId, Rect, Size};
use cadence_platform::GeometrySource;
use tracing::trace;

/// Fraction of the element that must be inside the test region
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.1;

/// Pixels added around the viewport before testing
pub const DEFAULT_VISIBILITY_MARGIN: f32 = 100.0;

/// Whether visibility latches or follows the element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisibilityMode {
    /// Becomes visible once and stays visible
    #[default]
    Once,
    /// Toggles every time the element enters or leaves
    Repeating,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityConfig {
    pub threshold: f32,
    pub margin: f32,
    pub mode: VisibilityMode,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VISIBILITY_THRESHOLD,
            margin: DEFAULT_VISIBILITY_MARGIN,
            mode: VisibilityMode::Once,
        }
    }
}

impl VisibilityConfig {
    /// Any overlap with a viewport shrunk by 100px, latching
    pub fn counter() -> Self {
        Self {
            threshold: 0.0,
            margin: -100.0,
            mode: VisibilityMode::Once,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_mode(mut self, mode: VisibilityMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn repeating(self) -> Self {
        self.with_mode(VisibilityMode::Repeating)
    }
}

/// Fraction of `element` inside `region`, or `None` if they do not touch.
///
/// A zero-area element that touches the region reports `1.0`.
pub fn intersection_ratio(element: Rect, region: Rect) -> Option<f32> {
    let overlap = element.intersection(&region)?;
    let area = element.area();
    if area <= 0.0 {
        return Some(1.0);
    }
    Some((overlap.area() / area).clamp(0.0, 1.0))
}

/// Per-element visibility state
#[derive(Clone, Debug, Default)]
pub struct VisibilityTrigger {
    config: VisibilityConfig,
    visible: bool,
}

impl VisibilityTrigger {
    pub fn new(config: VisibilityConfig) -> Self {
        Self {
            config,
            visible: false,
        }
    }

    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether further samples can still change the state
    pub fn is_latched(&self) -> bool {
        self.visible && self.config.mode == VisibilityMode::Once
    }

    /// Test a client-space rect. Returns `true` if visibility changed.
    pub fn update(&mut self, element: Rect, viewport: Size) -> bool {
        if self.is_latched() {
            return false;
        }

        let region = viewport.to_rect().expand(self.config.margin);
        let inside = match intersection_ratio(element, region) {
            Some(ratio) => ratio >= self.config.threshold,
            None => false,
        };

        if inside == self.visible {
            return false;
        }
        self.visible = inside;
        true
    }

    /// Sample an element through a geometry source. Unreadable geometry
    /// leaves the state unchanged.
    pub fn sample(&mut self, geometry: &dyn GeometrySource, element: ElementId) -> bool {
        if self.is_latched() {
            return false;
        }
        match geometry.client_rect(element) {
            Ok(rect) => self.update(rect, geometry.viewport()),
            Err(err) => {
                trace!(?element, %err, "visibility sample skipped");
                false
            }
        }
    }

    /// Force the state, as if a sample had decided it. A latched trigger
    /// ignores this. Returns `true` if visibility changed.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.is_latched() || self.visible == visible {
            return false;
        }
        self.visible = visible;
        true
    }

    /// Forget any latched state
    pub fn reset(&mut self) {
        self.visible = false;
    }
}
