//! Cadence Platform Abstraction Layer
//!
//! Everything Cadence needs from its host, behind traits:
//!
//! - [`Environment`] - device memory, processors, viewport, reduced motion
//! - [`GeometrySource`] - element boxes in document and client space
//! - [`Clipboard`] - text writes for copy buttons
//! - [`Event`] - scroll, pointer, resize, preference, and frame events
//!
//! [`CapabilityProbe`] sits on top of an [`Environment`] and reports only the
//! changes that can move the performance tier.
//!
//! # Implementations
//!
//! - [`StaticEnvironment`], [`MemoryGeometry`], [`MemoryClipboard`] - headless
//! - [`NativeEnvironment`] - processor count from the OS
//! - `web` feature - `WebEnvironment`, `WebGeometry`, `WebClipboard`
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{PerformanceTier, Timestamp};
//! use cadence_platform::{CapabilityProbe, StaticEnvironment};
//!
//! let mut probe = CapabilityProbe::new(StaticEnvironment::desktop());
//! assert_eq!(PerformanceTier::classify(probe.signals()), PerformanceTier::High);
//!
//! probe.on_resize(500.0, Timestamp::from_millis(0));
//! let signals = probe.poll(Timestamp::from_millis(100)).unwrap();
//! assert_eq!(PerformanceTier::classify(&signals), PerformanceTier::Low);
//! ```

mod clipboard;
mod environment;
mod error;
mod event;
mod geometry;
mod input;
mod probe;

#[cfg(feature = "web")]
pub mod web;

// Re-export all public types
pub use clipboard::{Clipboard, MemoryClipboard};
pub use environment::{Environment, NativeEnvironment, StaticEnvironment};
pub use error::{PlatformError, Result};
pub use event::{Event, TimedEvent};
pub use geometry::{GeometrySource, MemoryGeometry};
pub use input::{PointerEvent, PointerEventKind};
pub use probe::{CapabilityProbe, DEFAULT_RESIZE_DEBOUNCE};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clipboard::Clipboard;
    pub use crate::environment::Environment;
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{Event, TimedEvent};
    pub use crate::geometry::GeometrySource;
    pub use crate::input::{PointerEvent, PointerEventKind};
    pub use crate::probe::CapabilityProbe;
}
