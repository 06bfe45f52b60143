//! Cadence Application Runtime
//!
//! Wires the capability probe, the performance policy, and the element
//! runtime into a single [`PageRuntime`] that a host feeds with events.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use cadence_app::prelude::*;
//!
//! let geometry = Rc::new(MemoryGeometry::new(Size::new(1440.0, 900.0)));
//! let mut page = PageRuntime::new(StaticEnvironment::desktop(), Rc::clone(&geometry));
//!
//! let hero = page.add_section("hero");
//! geometry.set_rect(hero, Rect::new(0.0, 0.0, 1440.0, 900.0));
//!
//! page.dispatch(Event::Scroll { offset_y: 0.0 }, Timestamp::ZERO);
//! page.dispatch(Event::Frame, Timestamp::from_millis(16));
//!
//! assert_eq!(page.tier(), PerformanceTier::High);
//! assert_eq!(page.scroll_state().active_section(), Some("hero"));
//! ```

pub mod config;
mod error;
pub mod logging;
mod runtime;

#[cfg(test)]
mod tests;

pub use config::CadenceConfig;
pub use error::{AppError, Result};
pub use runtime::{FrameReport, PageRuntime};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::CadenceConfig;
    pub use crate::error::{AppError, Result};
    pub use crate::runtime::{FrameReport, PageRuntime};

    // Core types
    pub use cadence_core::{
        ElementId, PerformanceFlags, PerformanceTier, Point, PolicyHandle, Rect, Size, Timestamp,
    };

    // Animation primitives
    pub use cadence_animation::{Easing, Spring, SpringConfig, Tween};

    // Platform types
    pub use cadence_platform::{
        Clipboard, Environment, Event, GeometrySource, MemoryClipboard, MemoryGeometry,
        PointerEvent, StaticEnvironment, TimedEvent,
    };

    // Element runtime
    pub use cadence_layout::prelude::*;
}
