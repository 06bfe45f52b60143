//! Host events

use cadence_core::Timestamp;

use crate::input::PointerEvent;

/// Events delivered by the host.
///
/// The host stamps each event with its frame clock when dispatching; the
/// event itself carries only the payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Document scrolled (passive; never cancellable)
    Scroll {
        /// Vertical scroll offset in CSS pixels
        offset_y: f32,
    },
    /// Pointer input over a tracked element
    Pointer(PointerEvent),
    /// Viewport was resized
    Resize {
        /// New width in CSS pixels
        width: f32,
        /// New height in CSS pixels
        height: f32,
    },
    /// The reduced-motion media query changed
    ReducedMotionChanged(bool),
    /// Animation frame callback
    ///
    /// Sent once per `requestAnimationFrame` (or the host's vsync).
    Frame,
}

impl Event {
    /// Whether this event can schedule deferred work that only a later
    /// [`Event::Frame`] will flush
    pub fn defers_to_frame(&self) -> bool {
        matches!(
            self,
            Event::Scroll { .. } | Event::Pointer(PointerEvent::Moved { .. })
        )
    }
}

/// An event stamped with the host's frame clock
#[derive(Clone, Debug, PartialEq)]
pub struct TimedEvent {
    pub event: Event,
    pub at: Timestamp,
}

impl TimedEvent {
    pub fn new(event: Event, at: Timestamp) -> Self {
        Self { event, at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::ElementId;

    #[test]
    fn test_deferred_events() {
        assert!(Event::Scroll { offset_y: 10.0 }.defers_to_frame());
        assert!(Event::Pointer(PointerEvent::Moved {
            target: ElementId::default(),
            x: 0.0,
            y: 0.0
        })
        .defers_to_frame());
        assert!(!Event::Frame.defers_to_frame());
        assert!(!Event::ReducedMotionChanged(true).defers_to_frame());
    }
}
