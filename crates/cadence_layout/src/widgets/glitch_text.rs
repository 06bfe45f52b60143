//! Hover glitch effect

use cadence_core::{ElementId, PerformanceFlags};
use cadence_platform::{PointerEvent, PointerEventKind};

use crate::element::{Behavior, FrameContext, Listeners};

/// What the host should draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlitchEffect {
    None,
    /// Cheap opacity pulse
    Pulse,
    /// Offset color layers plus skew
    Full,
}

#[derive(Clone, Debug)]
pub struct GlitchText {
    glitch_on_hover: bool,
    disable_effects: bool,
    glitching: bool,
}

impl Default for GlitchText {
    fn default() -> Self {
        Self {
            glitch_on_hover: true,
            disable_effects: false,
            glitching: false,
        }
    }
}

impl GlitchText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glitch_on_hover(mut self, enabled: bool) -> Self {
        self.glitch_on_hover = enabled;
        self
    }

    /// Per-instance opt-out
    pub fn disable_effects(mut self, disabled: bool) -> Self {
        self.disable_effects = disabled;
        self
    }

    fn reacts(&self) -> bool {
        self.glitch_on_hover && !self.disable_effects
    }

    pub fn is_glitching(&self) -> bool {
        self.glitching
    }

    pub fn set_hovered(&mut self, hovered: bool) -> bool {
        if !self.reacts() || self.glitching == hovered {
            return false;
        }
        self.glitching = hovered;
        true
    }

    pub fn effect(&self, flags: &PerformanceFlags) -> GlitchEffect {
        if !self.glitching || self.disable_effects {
            GlitchEffect::None
        } else if flags.use_simplified_effects {
            GlitchEffect::Pulse
        } else {
            GlitchEffect::Full
        }
    }
}

impl Behavior for GlitchText {
    fn mount(&mut self, listeners: &mut Listeners, _flags: &'static PerformanceFlags) {
        if self.reacts() {
            listeners.listen(PointerEventKind::Enter);
            listeners.listen(PointerEventKind::Leave);
        }
    }

    fn on_pointer(
        &mut self,
        _element: ElementId,
        event: &PointerEvent,
        _cx: &FrameContext<'_>,
    ) -> bool {
        match event {
            PointerEvent::Entered { .. } => self.set_hovered(true),
            PointerEvent::Left { .. } => self.set_hovered(false),
            PointerEvent::Moved { .. } => false,
        }
    }

    fn on_frame(&mut self, _element: ElementId, _cx: &FrameContext<'_>) -> bool {
        false
    }
}
