//! Pointer input

use cadence_core::{ElementId, Point};

/// Pointer events targeted at a tracked element.
///
/// Coordinates are client (viewport) coordinates, matching what the host's
/// bounding-rect queries return.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer entered the element
    Entered {
        target: ElementId,
        x: f32,
        y: f32,
    },
    /// Pointer moved over the element
    Moved {
        target: ElementId,
        x: f32,
        y: f32,
    },
    /// Pointer left the element
    Left { target: ElementId },
}

impl PointerEvent {
    /// The element this event is addressed to
    pub fn target(&self) -> ElementId {
        match *self {
            PointerEvent::Entered { target, .. }
            | PointerEvent::Moved { target, .. }
            | PointerEvent::Left { target } => target,
        }
    }

    /// Client position, if the event carries one
    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Entered { x, y, .. } | PointerEvent::Moved { x, y, .. } => {
                Some(Point::new(x, y))
            }
            PointerEvent::Left { .. } => None,
        }
    }

    pub fn kind(&self) -> PointerEventKind {
        match self {
            PointerEvent::Entered { .. } => PointerEventKind::Enter,
            PointerEvent::Moved { .. } => PointerEventKind::Move,
            PointerEvent::Left { .. } => PointerEventKind::Leave,
        }
    }
}

/// Pointer event kinds, used as handler-registration keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Enter,
    Move,
    Leave,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_has_no_position() {
        let target = ElementId::default();
        let moved = PointerEvent::Moved {
            target,
            x: 3.0,
            y: 4.0,
        };
        assert_eq!(moved.position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(moved.kind(), PointerEventKind::Move);

        let left = PointerEvent::Left { target };
        assert_eq!(left.position(), None);
        assert_eq!(left.target(), target);
    }
}
