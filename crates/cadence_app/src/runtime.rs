//! Page runtime
//!
//! [`PageRuntime`] is the one place host events enter Cadence. It owns the
//! capability probe and the policy controller (the only writer of the
//! performance flags), the element arena, and the scroll spy, and routes
//! each [`Event`] to whichever of them cares:
//!
//! | event | effect |
//! |---|---|
//! | `Scroll` | coalesced into the next frame |
//! | `Pointer` | routed to the target element's listeners |
//! | `Resize` | debounced, re-probed on a later frame |
//! | `ReducedMotionChanged` | re-probed immediately |
//! | `Frame` | flush resize, commit scroll, advance every behavior |
//!
//! When the tier changes, every behavior is re-mounted with the new flags so
//! listeners that no longer apply (tilt on a low-tier device) are dropped.

use std::time::Duration;

use cadence_core::{
    CadenceError, DeviceSignals, ElementId, PerformanceFlags, PerformanceTier, PolicyController,
    PolicyHandle, Timestamp,
};
use cadence_layout::widgets::{
    ActiveSectionIndicator, AnimatedCounter, CopyFeedback, RevealConfig, RevealText, TypedText,
};
use cadence_layout::{
    Behavior, ElementContext, FrameContext, ParallaxDirection, ParallaxEffect, ScrollState,
    ScrollTracker, TiltCard,
};
use cadence_platform::{CapabilityProbe, Clipboard, Environment, Event, GeometrySource, TimedEvent};
use tracing::{debug, info};

use crate::config::CadenceConfig;
use crate::error::Result;

/// What a single frame did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Time since the previous frame
    pub dt: Duration,
    /// A tier change was applied this frame
    pub tier_changed: bool,
    /// The scroll spy committed a new offset
    pub scroll_committed: bool,
    /// Behaviors whose render output changed
    pub changed: usize,
    /// Deadlines, held samples, or unsettled motion remain after this frame
    pub pending: bool,
}

impl FrameReport {
    /// Whether anything on the page needs repainting
    pub fn needs_paint(&self) -> bool {
        self.tier_changed || self.scroll_committed || self.changed > 0
    }

    /// Whether the host should schedule another frame
    pub fn needs_another(&self) -> bool {
        self.pending || self.changed > 0 || self.tier_changed
    }
}

/// Event router and owner of per-page animation state
pub struct PageRuntime {
    config: CadenceConfig,
    probe: CapabilityProbe,
    policy: PolicyController,
    geometry: Box<dyn GeometrySource>,
    elements: ElementContext,
    scroll: ScrollTracker,
    last_frame: Option<Timestamp>,
    frames: u64,
}

impl PageRuntime {
    /// Create a runtime with the default configuration
    pub fn new(
        environment: impl Environment + 'static,
        geometry: impl GeometrySource + 'static,
    ) -> Self {
        Self::build(CadenceConfig::default(), environment, geometry)
    }

    /// Create a runtime from a validated configuration
    pub fn with_config(
        config: CadenceConfig,
        environment: impl Environment + 'static,
        geometry: impl GeometrySource + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, environment, geometry))
    }

    fn build(
        config: CadenceConfig,
        environment: impl Environment + 'static,
        geometry: impl GeometrySource + 'static,
    ) -> Self {
        let breakpoint = config.policy.mobile_breakpoint;
        let probe = CapabilityProbe::new(environment)
            .with_breakpoint(breakpoint)
            .with_resize_debounce(config.resize_debounce());
        let tier = PerformanceTier::classify_with_breakpoint(probe.signals(), breakpoint);
        let policy = PolicyController::new(tier).with_breakpoint(breakpoint);

        let mut scroll = ScrollTracker::new().with_lookahead(config.scroll.lookahead);
        scroll.mount();

        info!(%tier, "page runtime started");

        Self {
            config,
            probe,
            policy,
            geometry: Box::new(geometry),
            elements: ElementContext::new(),
            scroll,
            last_frame: None,
            frames: 0,
        }
    }

    pub fn config(&self) -> &CadenceConfig {
        &self.config
    }

    pub fn flags(&self) -> &'static PerformanceFlags {
        self.policy.flags()
    }

    pub fn tier(&self) -> PerformanceTier {
        self.policy.flags().tier
    }

    /// Read-only policy handle for consumers outside the runtime
    pub fn handle(&self) -> PolicyHandle {
        self.policy.handle()
    }

    pub fn signals(&self) -> &DeviceSignals {
        self.probe.signals()
    }

    pub fn scroll_state(&self) -> &ScrollState {
        self.scroll.state()
    }

    pub fn scroll_tracker(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn elements(&self) -> &ElementContext {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut ElementContext {
        &mut self.elements
    }

    /// Frames processed so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Create an element carrying `behavior`, mounted under the current flags
    pub fn add<B: Behavior>(&mut self, label: impl Into<String>, behavior: B) -> ElementId {
        let id = self.elements.create_labeled(label);
        self.elements.attach(id, behavior, self.policy.flags());
        id
    }

    /// Create a page section the scroll spy can report as active
    pub fn add_section(&mut self, section: impl Into<String>) -> ElementId {
        let section = section.into();
        let id = self.elements.create_labeled(section.clone());
        self.scroll.register_section(section, id);
        id
    }

    /// Create a plain element with no behavior (a nav link, say)
    pub fn add_element(&mut self, label: impl Into<String>) -> ElementId {
        self.elements.create_labeled(label)
    }

    pub fn add_tilt_card(&mut self, label: impl Into<String>) -> ElementId {
        let card = TiltCard::new(self.config.tilt_config());
        self.add(label, card)
    }

    /// Add typed text and start typing at `now`
    pub fn add_typed_text(
        &mut self,
        label: impl Into<String>,
        text: impl Into<String>,
        now: Timestamp,
    ) -> ElementId {
        let mut typed = TypedText::new(text, self.config.typed_text_config());
        typed.start(now, self.policy.flags());
        self.add(label, typed)
    }

    pub fn add_counter(&mut self, label: impl Into<String>, value: f32) -> ElementId {
        let counter = AnimatedCounter::new(value, self.config.counter_config());
        self.add(label, counter)
    }

    pub fn add_reveal(&mut self, label: impl Into<String>, delay: Duration) -> ElementId {
        let reveal = RevealText::new(RevealConfig {
            delay,
            visibility: self.config.visibility_config(),
            ..RevealConfig::default()
        });
        self.add(label, reveal)
    }

    pub fn add_parallax(
        &mut self,
        label: impl Into<String>,
        speed: f32,
        direction: ParallaxDirection,
    ) -> ElementId {
        self.add(label, ParallaxEffect::new(speed, direction))
    }

    pub fn add_copy_button(
        &mut self,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> ElementId {
        let copy = CopyFeedback::new(text).with_reset_after(self.config.copy_reset());
        self.add(label, copy)
    }

    /// Add the nav underline, following `(section, link)` pairs
    pub fn add_indicator<'a>(
        &mut self,
        label: impl Into<String>,
        items: impl IntoIterator<Item = (&'a str, ElementId)>,
    ) -> ElementId {
        let mut indicator = ActiveSectionIndicator::new();
        for (section, link) in items {
            indicator.add_item(section, link);
        }
        self.add(label, indicator)
    }

    /// Unmount an element, dropping its behavior and any pending deadlines
    pub fn remove(&mut self, id: ElementId) -> bool {
        if let Some(label) = self.elements.label(id).map(str::to_owned) {
            if self.scroll.sections().any(|(_, el)| el == id) {
                self.scroll.unregister_section(&label);
            }
        }
        self.elements.remove(id)
    }

    /// Typed access to an element's behavior
    pub fn behavior<B: Behavior>(&self, id: ElementId) -> Option<&B> {
        self.elements.behavior(id)
    }

    /// Copy a copy button's text. On failure the indicator stays down.
    pub fn copy(&mut self, id: ElementId, clipboard: &dyn Clipboard, now: Timestamp) -> Result<()> {
        let button = self
            .elements
            .behavior_mut::<CopyFeedback>(id)
            .ok_or_else(|| CadenceError::UnknownElement(format!("{id:?} is not a copy button")))?;
        button.copy(clipboard, now)?;
        self.elements.mark_dirty(id);
        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub fn handle_event(&mut self, event: TimedEvent) -> bool {
        self.dispatch(event.event, event.at)
    }

    /// Route one host event. Returns `true` if the host should schedule a
    /// frame. A host that only schedules frames on `true` still sees every
    /// deadline through.
    pub fn dispatch(&mut self, event: Event, now: Timestamp) -> bool {
        match event {
            Event::Scroll { offset_y } => self.scroll.on_scroll(offset_y),
            Event::Pointer(pointer) => {
                let cx = FrameContext {
                    now,
                    dt: Duration::ZERO,
                    flags: self.policy.flags(),
                    geometry: &*self.geometry,
                    scroll: self.scroll.state(),
                };
                let changed = self.elements.dispatch_pointer(&pointer, &cx);
                // A throttled move leaves its sample for a later frame
                changed || self.elements.is_pending(pointer.target())
            }
            Event::Resize { width, height } => {
                debug!(width, height, "viewport resized");
                self.probe.on_resize(width, now);
                true
            }
            Event::ReducedMotionChanged(reduce) => {
                match self.probe.on_reduced_motion_changed(reduce) {
                    Some(signals) => self.apply_signals(&signals),
                    None => false,
                }
            }
            Event::Frame => self.frame(now).needs_another(),
        }
    }

    /// Run one animation frame
    pub fn frame(&mut self, now: Timestamp) -> FrameReport {
        let dt = self
            .last_frame
            .map(|last| now.saturating_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);
        self.frames += 1;

        let tier_changed = match self.probe.poll(now) {
            Some(signals) => self.apply_signals(&signals),
            None => false,
        };

        let scroll_committed = self.scroll.on_frame(&*self.geometry).is_some();

        let cx = FrameContext {
            now,
            dt,
            flags: self.policy.flags(),
            geometry: &*self.geometry,
            scroll: self.scroll.state(),
        };
        let changed = self.elements.frame(&cx);

        FrameReport {
            dt,
            tier_changed,
            scroll_committed,
            changed,
            pending: self.has_pending_work(),
        }
    }

    /// Whether deferred work is waiting on a frame: a scroll to commit, a
    /// debounced resize, or an element deadline
    pub fn has_pending_work(&self) -> bool {
        self.scroll.has_pending_frame()
            || self.probe.has_pending_resize()
            || self.elements.has_pending()
    }

    /// Stop tracking scroll. Elements keep their last state.
    pub fn teardown(&mut self) {
        self.scroll.teardown();
    }

    fn apply_signals(&mut self, signals: &DeviceSignals) -> bool {
        match self.policy.update(signals) {
            Some(tier) => {
                info!(%tier, "performance tier changed, remounting elements");
                self.elements.remount(self.policy.flags());
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for PageRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRuntime")
            .field("tier", &self.tier())
            .field("elements", &self.elements.len())
            .field("scroll", self.scroll.state())
            .field("frames", &self.frames)
            .finish()
    }
}
