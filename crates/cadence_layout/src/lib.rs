//! Cadence Layout
//!
//! Per-element animated behavior for a scrolling page:
//!
//! - [`ElementContext`] - arena of live elements, pointer listeners, dirty set
//! - [`ScrollTracker`] - coalesced scroll spy with a sticky active section
//! - [`VisibilityTrigger`] - one-shot or repeating in-viewport signal
//! - [`TiltCard`] - throttled pointer tilt with glare
//! - [`ParallaxEffect`] - scroll-progress translation
//! - [`widgets`] - reveal, typed text, counters, gradient and glitch text,
//!   the nav indicator, and copy feedback
//!
//! Every behavior reads the current [`PerformanceFlags`](cadence_core::PerformanceFlags)
//! on each frame and falls back to a static or minimal rendition when the
//! tier asks for it.

pub mod element;
pub mod parallax;
pub mod scroll;
pub mod tilt;
pub mod visibility;
pub mod widgets;

pub use element::{AsAny, Behavior, DirtyTracker, ElementContext, FrameContext, Listeners};
pub use parallax::{scroll_progress, ParallaxDirection, ParallaxEffect, ParallaxStyle};
pub use scroll::{ScrollState, ScrollTracker, DEFAULT_SCROLL_LOOKAHEAD, HEADER_SCROLL_THRESHOLD};
pub use tilt::{
    glare_position, tilt_angles, GlareStyle, TiltCard, TiltConfig, TiltState, TiltStyle,
};
pub use visibility::{
    intersection_ratio, VisibilityConfig, VisibilityMode, VisibilityTrigger,
    DEFAULT_VISIBILITY_MARGIN, DEFAULT_VISIBILITY_THRESHOLD,
};
pub use widgets::Variant;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::element::{Behavior, ElementContext, FrameContext, Listeners};
    pub use crate::parallax::{ParallaxDirection, ParallaxEffect};
    pub use crate::scroll::{ScrollState, ScrollTracker};
    pub use crate::tilt::{TiltCard, TiltConfig};
    pub use crate::visibility::{VisibilityConfig, VisibilityMode, VisibilityTrigger};
    pub use crate::widgets::{
        ActiveSectionIndicator, AnimatedCounter, CopyFeedback, GlitchText, GradientText,
        RevealText, TypedText, Variant,
    };
}
