//! Adaptive presentational widgets
//!
//! Each widget reads the current [`PerformanceFlags`] and picks a full or
//! minimal rendition. Widgets compute what to show; painting is the host's
//! job.

mod copy_feedback;
mod counter;
mod glitch_text;
mod gradient_text;
mod indicator;
mod reveal;
mod typed_text;

pub use copy_feedback::{CopyFeedback, DEFAULT_COPY_RESET};
pub use counter::{format_rounded, AnimatedCounter, CounterConfig, ValueFormatter};
pub use glitch_text::{GlitchEffect, GlitchText};
pub use gradient_text::{GradientStyle, GradientText};
pub use indicator::{ActiveSectionIndicator, IndicatorMode, IndicatorStyle};
pub use reveal::{RevealConfig, RevealStyle, RevealText};
pub use typed_text::{TypedText, TypedTextConfig, TypingPhase};

use cadence_core::PerformanceFlags;

/// Which rendition a widget uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Full,
    Minimal,
}

impl Variant {
    pub fn for_flags(flags: &PerformanceFlags) -> Self {
        if flags.use_minimal_animations {
            Variant::Minimal
        } else {
            Variant::Full
        }
    }

    pub fn is_minimal(self) -> bool {
        self == Variant::Minimal
    }
}

/// Largest spring integration step; longer frame gaps are subdivided
pub(crate) const MAX_SPRING_STEP: f32 = 1.0 / 60.0;
