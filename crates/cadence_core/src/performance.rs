//! Performance tiers and animation flags
//!
//! Device signals are classified into a [`PerformanceTier`], and every tier
//! maps to exactly one static [`PerformanceFlags`] record. Animated
//! components read the flags; none of them decide durations or effect gates
//! on their own.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::performance::{DeviceSignals, PerformanceFlags, PerformanceTier};
//!
//! let signals = DeviceSignals {
//!     device_memory_gb: Some(2.0),
//!     hardware_concurrency: Some(8),
//!     viewport_width: 1280.0,
//!     prefers_reduced_motion: false,
//! };
//!
//! let tier = PerformanceTier::classify(&signals);
//! assert_eq!(tier, PerformanceTier::Low);
//! assert!(PerformanceFlags::for_tier(tier).disable_tilt);
//! ```

use std::fmt;
use std::time::Duration;

/// Device memory assumed when the host does not report one (GiB)
pub const DEFAULT_DEVICE_MEMORY_GB: f32 = 4.0;

/// Logical processor count assumed when the host does not report one
pub const DEFAULT_HARDWARE_CONCURRENCY: u32 = 4;

/// Viewports narrower than this are treated as mobile (CSS px)
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Raw capability signals read from the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceSignals {
    /// Approximate device memory in GiB (`navigator.deviceMemory`)
    pub device_memory_gb: Option<f32>,
    /// Logical processor count (`navigator.hardwareConcurrency`)
    pub hardware_concurrency: Option<u32>,
    /// Layout viewport width in CSS px
    pub viewport_width: f32,
    /// `prefers-reduced-motion: reduce`
    pub prefers_reduced_motion: bool,
}

impl Default for DeviceSignals {
    fn default() -> Self {
        Self {
            device_memory_gb: None,
            hardware_concurrency: None,
            viewport_width: 1024.0,
            prefers_reduced_motion: false,
        }
    }
}

impl DeviceSignals {
    /// Memory hint with the documented fallback applied
    pub fn memory_gb(&self) -> f32 {
        match self.device_memory_gb {
            Some(gb) if gb.is_finite() && gb > 0.0 => gb,
            _ => DEFAULT_DEVICE_MEMORY_GB,
        }
    }

    /// Processor count with the documented fallback applied
    pub fn processors(&self) -> u32 {
        match self.hardware_concurrency {
            Some(n) if n > 0 => n,
            _ => DEFAULT_HARDWARE_CONCURRENCY,
        }
    }

    /// Narrow-viewport check against the default breakpoint
    pub fn is_narrow(&self) -> bool {
        self.is_narrow_at(MOBILE_BREAKPOINT)
    }

    pub fn is_narrow_at(&self, breakpoint: f32) -> bool {
        self.viewport_width < breakpoint
    }
}

/// Discrete animation-capability classification
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PerformanceTier {
    Low,
    Medium,
    #[default]
    High,
}

impl PerformanceTier {
    /// Classify signals using the default mobile breakpoint
    pub fn classify(signals: &DeviceSignals) -> Self {
        Self::classify_with_breakpoint(signals, MOBILE_BREAKPOINT)
    }

    /// Classify signals. Rules are evaluated top to bottom, first match wins:
    ///
    /// 1. reduced motion requested → `Low`
    /// 2. memory ≤ 2, processors ≤ 2, or narrow viewport → `Low`
    /// 3. memory ≤ 4 or processors ≤ 4 → `Medium`
    /// 4. otherwise → `High`
    pub fn classify_with_breakpoint(signals: &DeviceSignals, breakpoint: f32) -> Self {
        if signals.prefers_reduced_motion {
            return PerformanceTier::Low;
        }

        let memory = signals.memory_gb();
        let processors = signals.processors();

        if memory <= 2.0 || processors <= 2 || signals.is_narrow_at(breakpoint) {
            PerformanceTier::Low
        } else if memory <= 4.0 || processors <= 4 {
            PerformanceTier::Medium
        } else {
            PerformanceTier::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceTier::High => "high",
            PerformanceTier::Medium => "medium",
            PerformanceTier::Low => "low",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Animation gates and timing derived from a tier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceFlags {
    pub tier: PerformanceTier,
    /// Animations play at all
    pub enabled: bool,
    /// Use the instant / fade-only variant of every widget
    pub use_minimal_animations: bool,
    /// Use cheaper variants of decorative effects
    pub use_simplified_effects: bool,
    /// Standard transition duration in seconds
    pub duration_secs: f32,
    pub disable_parallax: bool,
    pub disable_tilt: bool,
    pub disable_glare: bool,
}

static HIGH: PerformanceFlags = PerformanceFlags {
    tier: PerformanceTier::High,
    enabled: true,
    use_minimal_animations: false,
    use_simplified_effects: false,
    duration_secs: 0.5,
    disable_parallax: false,
    disable_tilt: false,
    disable_glare: false,
};

static MEDIUM: PerformanceFlags = PerformanceFlags {
    tier: PerformanceTier::Medium,
    enabled: true,
    use_minimal_animations: false,
    use_simplified_effects: true,
    duration_secs: 0.3,
    disable_parallax: false,
    disable_tilt: false,
    disable_glare: true,
};

static LOW: PerformanceFlags = PerformanceFlags {
    tier: PerformanceTier::Low,
    enabled: false,
    use_minimal_animations: true,
    use_simplified_effects: true,
    duration_secs: 0.1,
    disable_parallax: true,
    disable_tilt: true,
    disable_glare: true,
};

impl PerformanceFlags {
    /// The flag record for a tier. Always returns the same static instance.
    pub fn for_tier(tier: PerformanceTier) -> &'static PerformanceFlags {
        match tier {
            PerformanceTier::High => &HIGH,
            PerformanceTier::Medium => &MEDIUM,
            PerformanceTier::Low => &LOW,
        }
    }

    /// Transition duration, rounded to whole milliseconds
    pub fn duration(&self) -> Duration {
        Duration::from_millis((self.duration_secs.max(0.0) * 1000.0).round() as u64)
    }
}
