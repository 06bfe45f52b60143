//! Runtime tunables
//!
//! [`CadenceConfig`] gathers every knob the page runtime passes down to the
//! probe, the scroll spy, and the widgets. Each section and field has a
//! default, so a config file only needs the keys it changes:
//!
//! ```toml
//! [policy]
//! mobile_breakpoint = 640.0
//!
//! [tilt]
//! max_tilt = 6.0
//! throttle_ms = 32
//! ```

use std::path::Path;
use std::time::Duration;

use cadence_core::{DEFAULT_THROTTLE_WINDOW, MOBILE_BREAKPOINT};
use cadence_layout::widgets::{CounterConfig, TypedTextConfig};
use cadence_layout::{
    TiltConfig, VisibilityConfig, DEFAULT_SCROLL_LOOKAHEAD, DEFAULT_VISIBILITY_MARGIN,
    DEFAULT_VISIBILITY_THRESHOLD,
};
use cadence_platform::DEFAULT_RESIZE_DEBOUNCE;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Top-level runtime configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CadenceConfig {
    pub policy: PolicyConfig,
    pub scroll: ScrollConfig,
    pub tilt: TiltSettings,
    pub visibility: VisibilitySettings,
    pub typing: TypingSettings,
    pub counter: CounterSettings,
    pub copy: CopySettings,
}

/// Capability probe and tier classification
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Viewports narrower than this (in px) are classified `Low`
    pub mobile_breakpoint: f32,
    /// Quiet period before a resize is re-evaluated
    pub resize_debounce_ms: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: MOBILE_BREAKPOINT,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE.as_millis() as u64,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    /// Distance below the scroll offset used to pick the active section
    pub lookahead: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_SCROLL_LOOKAHEAD,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TiltSettings {
    pub max_tilt: f32,
    pub hover_scale: f32,
    pub perspective: f32,
    pub glare_opacity: f32,
    pub glare_size: f32,
    pub throttle_ms: u64,
}

impl Default for TiltSettings {
    fn default() -> Self {
        let base = TiltConfig::default();
        Self {
            max_tilt: base.max_tilt,
            hover_scale: base.hover_scale,
            perspective: base.perspective,
            glare_opacity: base.glare_opacity,
            glare_size: base.glare_size,
            throttle_ms: DEFAULT_THROTTLE_WINDOW.as_millis() as u64,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisibilitySettings {
    /// Fraction of the element that must be on screen
    pub threshold: f32,
    /// Pixels added around the viewport
    pub margin: f32,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VISIBILITY_THRESHOLD,
            margin: DEFAULT_VISIBILITY_MARGIN,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TypingSettings {
    pub speed_ms: u64,
    pub chars_per_tick: usize,
    pub show_cursor: bool,
}

impl Default for TypingSettings {
    fn default() -> Self {
        let base = TypedTextConfig::default();
        Self {
            speed_ms: base.typing_speed.as_millis() as u64,
            chars_per_tick: base.chars_per_tick,
            show_cursor: base.show_cursor,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CounterSettings {
    pub duration_secs: f32,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            duration_secs: CounterConfig::default().duration_secs,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CopySettings {
    /// How long the "copied" indicator stays up
    pub reset_ms: u64,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self { reset_ms: 2_000 }
    }
}

impl CadenceConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: CadenceConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        positive("policy.mobile_breakpoint", self.policy.mobile_breakpoint)?;
        finite("scroll.lookahead", self.scroll.lookahead)?;
        positive("tilt.perspective", self.tilt.perspective)?;
        positive("tilt.hover_scale", self.tilt.hover_scale)?;
        finite("tilt.max_tilt", self.tilt.max_tilt)?;
        unit("tilt.glare_opacity", self.tilt.glare_opacity)?;
        unit("visibility.threshold", self.visibility.threshold)?;
        finite("visibility.margin", self.visibility.margin)?;
        positive("counter.duration_secs", self.counter.duration_secs)?;
        if self.typing.speed_ms == 0 {
            return Err(invalid("typing.speed_ms", "must be at least 1"));
        }
        if self.typing.chars_per_tick == 0 {
            return Err(invalid("typing.chars_per_tick", "must be at least 1"));
        }
        Ok(())
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.policy.resize_debounce_ms)
    }

    pub fn copy_reset(&self) -> Duration {
        Duration::from_millis(self.copy.reset_ms)
    }

    pub fn tilt_config(&self) -> TiltConfig {
        TiltConfig {
            max_tilt: self.tilt.max_tilt,
            hover_scale: self.tilt.hover_scale,
            perspective: self.tilt.perspective,
            glare_opacity: self.tilt.glare_opacity,
            glare_size: self.tilt.glare_size,
            throttle: Duration::from_millis(self.tilt.throttle_ms),
            ..TiltConfig::default()
        }
    }

    /// Visibility for reveals and other once-only entrances
    pub fn visibility_config(&self) -> VisibilityConfig {
        VisibilityConfig::default()
            .with_threshold(self.visibility.threshold)
            .with_margin(self.visibility.margin)
    }

    pub fn typed_text_config(&self) -> TypedTextConfig {
        TypedTextConfig {
            typing_speed: Duration::from_millis(self.typing.speed_ms),
            chars_per_tick: self.typing.chars_per_tick,
            show_cursor: self.typing.show_cursor,
            ..TypedTextConfig::default()
        }
    }

    pub fn counter_config(&self) -> CounterConfig {
        CounterConfig {
            duration_secs: self.counter.duration_secs,
            ..CounterConfig::default()
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> AppError {
    AppError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be a finite number"))
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be greater than zero"))
    }
}

fn unit(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must be between 0 and 1"))
    }
}
