//! Host environment signals
//!
//! An [`Environment`] answers the four questions the capability probe asks.
//! Implementations return an error when a value cannot be read; the probe
//! substitutes the documented default and logs at `debug`.

use std::cell::Cell;

use cadence_core::DeviceSignals;
use tracing::debug;

use crate::error::{PlatformError, Result};

/// Source of device capability signals
pub trait Environment {
    /// Approximate device memory in GB
    fn device_memory_gb(&self) -> Result<f32>;

    /// Logical processor count
    fn hardware_concurrency(&self) -> Result<u32>;

    /// Viewport width in CSS pixels
    fn viewport_width(&self) -> Result<f32>;

    /// Whether the user prefers reduced motion
    fn prefers_reduced_motion(&self) -> Result<bool>;

    /// Read every signal, falling back to defaults for anything unreadable
    fn read_signals(&self) -> DeviceSignals {
        let defaults = DeviceSignals::default();
        DeviceSignals {
            device_memory_gb: fallback("device memory", self.device_memory_gb()),
            hardware_concurrency: fallback("hardware concurrency", self.hardware_concurrency()),
            viewport_width: fallback("viewport width", self.viewport_width())
                .unwrap_or(defaults.viewport_width),
            prefers_reduced_motion: fallback(
                "reduced motion preference",
                self.prefers_reduced_motion(),
            )
            .unwrap_or(defaults.prefers_reduced_motion),
        }
    }
}

fn fallback<T>(signal: &str, value: Result<T>) -> Option<T> {
    match value {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(signal, %err, "environment read failed, using default");
            None
        }
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn device_memory_gb(&self) -> Result<f32> {
        (**self).device_memory_gb()
    }

    fn hardware_concurrency(&self) -> Result<u32> {
        (**self).hardware_concurrency()
    }

    fn viewport_width(&self) -> Result<f32> {
        (**self).viewport_width()
    }

    fn prefers_reduced_motion(&self) -> Result<bool> {
        (**self).prefers_reduced_motion()
    }
}

/// Fixed, settable signals for tests and headless simulation.
///
/// `None` for memory or processors models a host that does not expose the
/// hint. Setters take `&self` so a shared environment can be changed while a
/// probe holds it.
#[derive(Debug, Default)]
pub struct StaticEnvironment {
    device_memory_gb: Cell<Option<f32>>,
    hardware_concurrency: Cell<Option<u32>>,
    viewport_width: Cell<f32>,
    prefers_reduced_motion: Cell<bool>,
}

impl StaticEnvironment {
    pub fn new(signals: DeviceSignals) -> Self {
        Self {
            device_memory_gb: Cell::new(signals.device_memory_gb),
            hardware_concurrency: Cell::new(signals.hardware_concurrency),
            viewport_width: Cell::new(signals.viewport_width),
            prefers_reduced_motion: Cell::new(signals.prefers_reduced_motion),
        }
    }

    /// A capable desktop: 8 GB, 8 processors, 1440 px wide
    pub fn desktop() -> Self {
        Self::new(DeviceSignals {
            device_memory_gb: Some(8.0),
            hardware_concurrency: Some(8),
            viewport_width: 1440.0,
            prefers_reduced_motion: false,
        })
    }

    /// A phone: 4 GB, 8 processors, 390 px wide
    pub fn phone() -> Self {
        Self::new(DeviceSignals {
            device_memory_gb: Some(4.0),
            hardware_concurrency: Some(8),
            viewport_width: 390.0,
            prefers_reduced_motion: false,
        })
    }

    pub fn set_device_memory_gb(&self, gb: Option<f32>) {
        self.device_memory_gb.set(gb);
    }

    pub fn set_hardware_concurrency(&self, count: Option<u32>) {
        self.hardware_concurrency.set(count);
    }

    pub fn set_viewport_width(&self, width: f32) {
        self.viewport_width.set(width);
    }

    pub fn set_prefers_reduced_motion(&self, reduce: bool) {
        self.prefers_reduced_motion.set(reduce);
    }
}

impl Environment for StaticEnvironment {
    fn device_memory_gb(&self) -> Result<f32> {
        self.device_memory_gb
            .get()
            .ok_or_else(|| PlatformError::Unavailable("deviceMemory".into()))
    }

    fn hardware_concurrency(&self) -> Result<u32> {
        self.hardware_concurrency
            .get()
            .ok_or_else(|| PlatformError::Unavailable("hardwareConcurrency".into()))
    }

    fn viewport_width(&self) -> Result<f32> {
        Ok(self.viewport_width.get())
    }

    fn prefers_reduced_motion(&self) -> Result<bool> {
        Ok(self.prefers_reduced_motion.get())
    }
}

impl<E: Environment + ?Sized> Environment for std::rc::Rc<E> {
    fn device_memory_gb(&self) -> Result<f32> {
        (**self).device_memory_gb()
    }

    fn hardware_concurrency(&self) -> Result<u32> {
        (**self).hardware_concurrency()
    }

    fn viewport_width(&self) -> Result<f32> {
        (**self).viewport_width()
    }

    fn prefers_reduced_motion(&self) -> Result<bool> {
        (**self).prefers_reduced_motion()
    }
}

/// Native host: processor count from the OS, no memory hint.
///
/// Viewport and reduced-motion state are pushed in by the embedding
/// application since there is no window to query here.
#[derive(Debug)]
pub struct NativeEnvironment {
    viewport_width: Cell<f32>,
    prefers_reduced_motion: Cell<bool>,
}

impl NativeEnvironment {
    pub fn new(viewport_width: f32) -> Self {
        Self {
            viewport_width: Cell::new(viewport_width),
            prefers_reduced_motion: Cell::new(false),
        }
    }

    pub fn set_viewport_width(&self, width: f32) {
        self.viewport_width.set(width);
    }

    pub fn set_prefers_reduced_motion(&self, reduce: bool) {
        self.prefers_reduced_motion.set(reduce);
    }
}

impl Environment for NativeEnvironment {
    fn device_memory_gb(&self) -> Result<f32> {
        Err(PlatformError::Unsupported("device memory hint".into()))
    }

    fn hardware_concurrency(&self) -> Result<u32> {
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .map_err(|err| PlatformError::Unavailable(err.to_string()))
    }

    fn viewport_width(&self) -> Result<f32> {
        Ok(self.viewport_width.get())
    }

    fn prefers_reduced_motion(&self) -> Result<bool> {
        Ok(self.prefers_reduced_motion.get())
    }
}
