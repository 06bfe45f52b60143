//! Element geometry sources
//!
//! Layout is the host's job; Cadence only asks where things ended up.
//! Two coordinate spaces are used:
//!
//! - **document** rects (`offsetTop`/`offsetHeight` style), stable under
//!   scrolling, used for scroll-spy section tests
//! - **client** rects (`getBoundingClientRect` style), relative to the
//!   viewport, used for visibility, tilt, and parallax

use std::cell::{Cell, RefCell};

use cadence_core::{CadenceError, ElementId, Point, Rect, Result, Size};
use rustc_hash::{FxHashMap, FxHashSet};

/// Read access to element boxes and the viewport
pub trait GeometrySource {
    /// Element box in document coordinates
    fn document_rect(&self, element: ElementId) -> Result<Rect>;

    /// Element box in viewport coordinates
    fn client_rect(&self, element: ElementId) -> Result<Rect>;

    /// Current viewport size
    fn viewport(&self) -> Size;
}

impl<G: GeometrySource + ?Sized> GeometrySource for std::rc::Rc<G> {
    fn document_rect(&self, element: ElementId) -> Result<Rect> {
        (**self).document_rect(element)
    }

    fn client_rect(&self, element: ElementId) -> Result<Rect> {
        (**self).client_rect(element)
    }

    fn viewport(&self) -> Size {
        (**self).viewport()
    }
}

/// In-memory layout for tests and headless simulation.
///
/// Stores document rects; client rects are derived by subtracting the
/// current scroll offset. Elements can be marked detached to exercise
/// geometry failures.
#[derive(Debug, Default)]
pub struct MemoryGeometry {
    rects: RefCell<FxHashMap<ElementId, Rect>>,
    detached: RefCell<FxHashSet<ElementId>>,
    scroll: Cell<Point>,
    viewport: Cell<Size>,
}

impl MemoryGeometry {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Cell::new(viewport),
            ..Default::default()
        }
    }

    /// Place (or move) an element in document coordinates
    pub fn set_rect(&self, element: ElementId, rect: Rect) {
        self.rects.borrow_mut().insert(element, rect);
        self.detached.borrow_mut().remove(&element);
    }

    pub fn remove(&self, element: ElementId) {
        self.rects.borrow_mut().remove(&element);
        self.detached.borrow_mut().remove(&element);
    }

    /// Keep the element's box but report it as detached
    pub fn detach(&self, element: ElementId) {
        self.detached.borrow_mut().insert(element);
    }

    pub fn set_scroll(&self, offset: Point) {
        self.scroll.set(offset);
    }

    pub fn set_scroll_y(&self, y: f32) {
        let current = self.scroll.get();
        self.scroll.set(Point::new(current.x, y));
    }

    pub fn scroll(&self) -> Point {
        self.scroll.get()
    }

    pub fn set_viewport(&self, size: Size) {
        self.viewport.set(size);
    }
}

impl GeometrySource for MemoryGeometry {
    fn document_rect(&self, element: ElementId) -> Result<Rect> {
        if self.detached.borrow().contains(&element) {
            return Err(CadenceError::Detached);
        }
        self.rects
            .borrow()
            .get(&element)
            .copied()
            .ok_or_else(|| CadenceError::UnknownElement(format!("{element:?}")))
    }

    fn client_rect(&self, element: ElementId) -> Result<Rect> {
        let rect = self.document_rect(element)?;
        let scroll = self.scroll.get();
        Ok(Rect::new(
            rect.x() - scroll.x,
            rect.y() - scroll.y,
            rect.width(),
            rect.height(),
        ))
    }

    fn viewport(&self) -> Size {
        self.viewport.get()
    }
}
