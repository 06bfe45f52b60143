//! Cadence Core
//!
//! Foundational primitives for adaptive, performance-aware animation:
//!
//! - **Performance tiers**: device signals classified into high / medium / low
//! - **Performance flags**: an explicit tier → flags table every widget reads
//! - **Policy store**: single writer, read-only handles, change subscriptions
//! - **Frame timing**: timestamps, throttles, single-slot coalescing, deadlines
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{DeviceSignals, PolicyController};
//!
//! let controller = PolicyController::from_signals(&DeviceSignals {
//!     device_memory_gb: Some(8.0),
//!     hardware_concurrency: Some(8),
//!     viewport_width: 1280.0,
//!     prefers_reduced_motion: false,
//! });
//!
//! let flags = controller.handle().flags();
//! assert!(flags.enabled);
//! assert_eq!(flags.duration_secs, 0.5);
//! ```

pub mod coalesce;
pub mod error;
pub mod geometry;
pub mod id;
pub mod performance;
pub mod policy;
pub mod throttle;
pub mod time;
pub mod timer;

pub use coalesce::Coalescer;
pub use error::{CadenceError, Result};
pub use geometry::{Point, Rect, Size};
pub use id::ElementId;
pub use performance::{
    DeviceSignals, PerformanceFlags, PerformanceTier, DEFAULT_DEVICE_MEMORY_GB,
    DEFAULT_HARDWARE_CONCURRENCY, MOBILE_BREAKPOINT,
};
pub use policy::{PolicyController, PolicyHandle, PolicySubscription};
pub use throttle::{Throttle, DEFAULT_THROTTLE_WINDOW};
pub use time::Timestamp;
pub use timer::{Debounce, Timeout};
