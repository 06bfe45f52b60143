//! Capability probe
//!
//! Owns an [`Environment`] and decides when its signals are worth
//! re-reading. Resizes are debounced and only matter when they move the
//! viewport across the mobile breakpoint; reduced-motion changes apply
//! immediately.

use std::time::Duration;

use cadence_core::{Debounce, DeviceSignals, Timestamp, MOBILE_BREAKPOINT};
use tracing::{debug, trace};

use crate::environment::Environment;

/// Quiet period after the last resize before the viewport is re-checked
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Reads device signals and reports when they change in a way that can
/// affect the performance tier
pub struct CapabilityProbe {
    environment: Box<dyn Environment>,
    signals: DeviceSignals,
    breakpoint: f32,
    resize: Debounce,
    pending_width: Option<f32>,
}

impl CapabilityProbe {
    /// Create a probe and take the initial reading
    pub fn new(environment: impl Environment + 'static) -> Self {
        let environment: Box<dyn Environment> = Box::new(environment);
        let signals = environment.read_signals();
        debug!(
            memory_gb = signals.memory_gb(),
            processors = signals.processors(),
            viewport_width = signals.viewport_width,
            reduced_motion = signals.prefers_reduced_motion,
            "capability probe initialized"
        );
        Self {
            environment,
            signals,
            breakpoint: MOBILE_BREAKPOINT,
            resize: Debounce::new(DEFAULT_RESIZE_DEBOUNCE),
            pending_width: None,
        }
    }

    pub fn with_breakpoint(mut self, breakpoint: f32) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    pub fn with_resize_debounce(mut self, delay: Duration) -> Self {
        self.resize = Debounce::new(delay);
        self
    }

    /// Latest accepted signals
    pub fn signals(&self) -> &DeviceSignals {
        &self.signals
    }

    pub fn breakpoint(&self) -> f32 {
        self.breakpoint
    }

    pub fn is_narrow(&self) -> bool {
        self.signals.is_narrow_at(self.breakpoint)
    }

    /// Record a resize. Evaluation happens in [`poll`](Self::poll) once the
    /// debounce window has passed with no further resizes.
    pub fn on_resize(&mut self, width: f32, now: Timestamp) {
        self.pending_width = Some(width);
        self.resize.trigger(now);
    }

    /// Whether a resize is waiting out its debounce
    pub fn has_pending_resize(&self) -> bool {
        self.resize.is_pending()
    }

    /// Apply a live reduced-motion change. Returns the new signals if the
    /// preference actually changed.
    pub fn on_reduced_motion_changed(&mut self, reduce: bool) -> Option<DeviceSignals> {
        if self.signals.prefers_reduced_motion == reduce {
            return None;
        }
        debug!(reduce, "reduced motion preference changed");
        let mut signals = self.environment.read_signals();
        signals.prefers_reduced_motion = reduce;
        signals.viewport_width = self.signals.viewport_width;
        self.signals = signals;
        Some(signals)
    }

    /// Flush a debounced resize. Returns the new signals only when the
    /// viewport crossed the breakpoint.
    pub fn poll(&mut self, now: Timestamp) -> Option<DeviceSignals> {
        if !self.resize.poll(now) {
            return None;
        }
        let width = self.pending_width.take()?;
        let was_narrow = self.is_narrow();
        let narrow = width < self.breakpoint;
        if narrow == was_narrow {
            trace!(width, "resize stayed on the same side of the breakpoint");
            self.signals.viewport_width = width;
            return None;
        }

        debug!(width, narrow, "viewport crossed the mobile breakpoint");
        let mut signals = self.environment.read_signals();
        signals.viewport_width = width;
        signals.prefers_reduced_motion = self.signals.prefers_reduced_motion;
        self.signals = signals;
        Some(signals)
    }

    /// Re-read everything from the environment unconditionally
    pub fn refresh(&mut self) -> DeviceSignals {
        self.resize.cancel();
        self.pending_width = None;
        self.signals = self.environment.read_signals();
        self.signals
    }
}

impl std::fmt::Debug for CapabilityProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityProbe")
            .field("signals", &self.signals)
            .field("breakpoint", &self.breakpoint)
            .field("pending_width", &self.pending_width)
            .finish()
    }
}
