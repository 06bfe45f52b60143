//! Scroll spy
//!
//! [`ScrollTracker`] follows the document scroll offset and decides which
//! registered page section is active. Scroll events are coalesced through a
//! single-slot [`Coalescer`]: the first event of a frame requests the frame,
//! later ones only replace the pending offset, and the frame commits at most
//! one [`ScrollState`].
//!
//! The tracker is passive. It observes offsets and never blocks or cancels
//! native scrolling.

use cadence_core::{Coalescer, ElementId};
use cadence_platform::GeometrySource;
use indexmap::IndexMap;
use tracing::{debug, trace};

/// How far below the scroll offset a section boundary is probed
pub const DEFAULT_SCROLL_LOOKAHEAD: f32 = 100.0;

/// Offset after which the header switches to its condensed style
pub const HEADER_SCROLL_THRESHOLD: f32 = 50.0;

/// Last committed scroll state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Vertical scroll offset in CSS pixels
    pub scroll_y: f32,
    /// Id of the active section, sticky until another section matches
    pub active_section: Option<String>,
}

impl ScrollState {
    pub fn active_section(&self) -> Option<&str> {
        self.active_section.as_deref()
    }

    pub fn is_active(&self, section: &str) -> bool {
        self.active_section() == Some(section)
    }

    /// Whether the page has scrolled strictly past `threshold`
    pub fn is_scrolled_past(&self, threshold: f32) -> bool {
        self.scroll_y > threshold
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Unmounted,
    Mounted,
    TornDown,
}

/// Coalescing scroll-spy over an ordered list of sections
#[derive(Debug)]
pub struct ScrollTracker {
    sections: IndexMap<String, ElementId>,
    lookahead: f32,
    pending: Coalescer<f32>,
    state: ScrollState,
    phase: Phase,
    commits: u64,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self {
            sections: IndexMap::new(),
            lookahead: DEFAULT_SCROLL_LOOKAHEAD,
            pending: Coalescer::new(),
            state: ScrollState::default(),
            phase: Phase::Unmounted,
            commits: 0,
        }
    }

    pub fn with_lookahead(mut self, lookahead: f32) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn lookahead(&self) -> f32 {
        self.lookahead
    }

    /// Register a section. Registration order is hit-test order; registering
    /// an existing id rebinds its element and keeps its position.
    pub fn register_section(&mut self, id: impl Into<String>, element: ElementId) {
        self.sections.insert(id.into(), element);
    }

    pub fn unregister_section(&mut self, id: &str) -> Option<ElementId> {
        self.sections.shift_remove(id)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, ElementId)> + '_ {
        self.sections.iter().map(|(id, el)| (id.as_str(), *el))
    }

    /// Start listening. A second mount is a no-op.
    pub fn mount(&mut self) -> bool {
        if self.phase == Phase::Mounted {
            debug!("scroll tracker already mounted");
            return false;
        }
        self.phase = Phase::Mounted;
        true
    }

    /// Stop listening and drop any pending frame
    pub fn teardown(&mut self) {
        self.phase = Phase::TornDown;
        self.pending.clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.phase == Phase::Mounted
    }

    /// Record a scroll event. Returns `true` if this event requested a new
    /// frame (the slot was empty).
    pub fn on_scroll(&mut self, offset_y: f32) -> bool {
        if self.phase != Phase::Mounted {
            trace!(offset_y, "scroll ignored, tracker not mounted");
            return false;
        }
        if !offset_y.is_finite() {
            trace!(offset_y, "non-finite scroll offset dropped");
            return false;
        }
        self.pending.offer(offset_y)
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_pending()
    }

    /// Frame callback: commit the latest offset, if any arrived
    pub fn on_frame(&mut self, geometry: &dyn GeometrySource) -> Option<&ScrollState> {
        let offset = self.pending.take()?;
        self.commit(offset, geometry);
        Some(&self.state)
    }

    fn commit(&mut self, offset_y: f32, geometry: &dyn GeometrySource) {
        self.state.scroll_y = offset_y;
        self.commits += 1;

        let probe = offset_y + self.lookahead;
        for (section, &element) in &self.sections {
            match geometry.document_rect(element) {
                Ok(rect) if rect.contains_y(probe) => {
                    if !self.state.is_active(section) {
                        debug!(section = section.as_str(), "active section changed");
                        self.state.active_section = Some(section.clone());
                    }
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    trace!(section = section.as_str(), %err, "section skipped this frame");
                }
            }
        }

        trace!(offset_y, active = ?self.state.active_section, "scroll committed");
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn scroll_y(&self) -> f32 {
        self.state.scroll_y
    }

    /// Frames that committed a state since creation
    pub fn commit_count(&self) -> u64 {
        self.commits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{Rect, Size};
    use cadence_platform::MemoryGeometry;
    use slotmap::SlotMap;

    struct Page {
        geometry: MemoryGeometry,
        tracker: ScrollTracker,
        ids: Vec<ElementId>,
    }

    /// Sections "hero" [0, 800), "about" [800, 1600), "work" [1600, 2600)
    fn page() -> Page {
        let mut arena: SlotMap<ElementId, ()> = SlotMap::with_key();
        let geometry = MemoryGeometry::new(Size::new(1280.0, 800.0));
        let mut tracker = ScrollTracker::new();
        let mut ids = Vec::new();
        for (name, top, height) in [
            ("hero", 0.0, 800.0),
            ("about", 800.0, 800.0),
            ("work", 1600.0, 1000.0),
        ] {
            let id = arena.insert(());
            geometry.set_rect(id, Rect::new(0.0, top, 1280.0, height));
            tracker.register_section(name, id);
            ids.push(id);
        }
        tracker.mount();
        Page {
            geometry,
            tracker,
            ids,
        }
    }

    #[test]
    fn test_one_commit_per_frame_with_latest_offset() {
        let mut p = page();
        assert!(p.tracker.on_scroll(0.0));
        assert!(!p.tracker.on_scroll(50.0));
        assert!(!p.tracker.on_scroll(100.0));

        let state = p.tracker.on_frame(&p.geometry).cloned().unwrap();
        assert_eq!(state.scroll_y, 100.0);
        assert_eq!(p.tracker.commit_count(), 1);

        // No events, no commit
        assert!(p.tracker.on_frame(&p.geometry).is_none());
        assert_eq!(p.tracker.commit_count(), 1);
    }

    #[test]
    fn test_lookahead_selects_section() {
        let mut p = page();
        // 700 + 100 = 800 is the first pixel of "about"
        p.tracker.on_scroll(700.0);
        p.tracker.on_frame(&p.geometry);
        assert_eq!(p.tracker.state().active_section(), Some("about"));

        p.tracker.on_scroll(699.0);
        p.tracker.on_frame(&p.geometry);
        assert_eq!(p.tracker.state().active_section(), Some("hero"));
    }

    #[test]
    fn test_active_section_is_sticky() {
        let mut p = page();
        p.tracker.on_scroll(1700.0);
        p.tracker.on_frame(&p.geometry);
        assert!(p.tracker.state().is_active("work"));

        // Past the last section: nothing matches, previous id stays
        p.tracker.on_scroll(5000.0);
        p.tracker.on_frame(&p.geometry);
        assert!(p.tracker.state().is_active("work"));
        assert_eq!(p.tracker.scroll_y(), 5000.0);
    }

    #[test]
    fn test_unavailable_section_is_skipped() {
        let mut p = page();
        p.geometry.detach(p.ids[1]);
        p.tracker.on_scroll(900.0);
        p.tracker.on_frame(&p.geometry);
        assert_eq!(p.tracker.state().active_section(), None);

        p.tracker.on_scroll(1600.0);
        p.tracker.on_frame(&p.geometry);
        assert_eq!(p.tracker.state().active_section(), Some("work"));
    }

    #[test]
    fn test_teardown_ignores_events_and_drops_pending() {
        let mut p = page();
        assert!(!p.tracker.mount());

        p.tracker.on_scroll(300.0);
        p.tracker.teardown();
        assert!(!p.tracker.has_pending_frame());
        assert!(p.tracker.on_frame(&p.geometry).is_none());

        assert!(!p.tracker.on_scroll(400.0));
        assert!(p.tracker.on_frame(&p.geometry).is_none());
        assert_eq!(p.tracker.commit_count(), 0);
    }

    #[test]
    fn test_header_threshold() {
        let mut state = ScrollState::default();
        state.scroll_y = HEADER_SCROLL_THRESHOLD;
        assert!(!state.is_scrolled_past(HEADER_SCROLL_THRESHOLD));
        state.scroll_y = 51.0;
        assert!(state.is_scrolled_past(HEADER_SCROLL_THRESHOLD));
    }
}
