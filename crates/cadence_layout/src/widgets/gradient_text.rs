//! Gradient-filled text

use cadence_core::{ElementId, PerformanceFlags};

use crate::element::{Behavior, FrameContext};

/// Background sizing and motion for gradient text
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStyle {
    /// Whether the background position animates
    pub animated: bool,
    /// Background size as a percentage of the text box, both axes
    pub background_size_percent: f32,
}

impl GradientStyle {
    pub const ANIMATED: GradientStyle = GradientStyle {
        animated: true,
        background_size_percent: 200.0,
    };

    pub const STATIC: GradientStyle = GradientStyle {
        animated: false,
        background_size_percent: 100.0,
    };
}

/// Text with a sliding gradient fill, static under simplified effects
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientText;

impl GradientText {
    pub fn new() -> Self {
        Self
    }

    pub fn style(&self, flags: &PerformanceFlags) -> GradientStyle {
        if flags.use_simplified_effects {
            GradientStyle::STATIC
        } else {
            GradientStyle::ANIMATED
        }
    }
}

impl Behavior for GradientText {
    fn on_frame(&mut self, _element: ElementId, _cx: &FrameContext<'_>) -> bool {
        // The host runs the animation; output only changes with the tier
        false
    }
}
