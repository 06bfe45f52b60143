//! Fixed-window throttling
//!
//! [`Throttle`] admits at most one event per window. Events arriving inside
//! an open window are rejected; pairing it with a
//! [`Coalescer`](crate::coalesce::Coalescer) keeps the latest rejected sample
//! around so it can be applied once the window closes, without ever building
//! a queue.

use std::time::Duration;

use crate::time::Timestamp;

/// Default pointer sampling window (~60 Hz)
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(16);

/// Leading-edge fixed-window throttle
#[derive(Clone, Debug)]
pub struct Throttle {
    window: Duration,
    last: Option<Timestamp>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_WINDOW)
    }
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether an event at `now` would be admitted
    pub fn is_ready(&self, now: Timestamp) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_since(last) >= self.window,
        }
    }

    /// Admit an event at `now` if the window has elapsed.
    ///
    /// Returns `true` and opens a new window when admitted.
    pub fn try_acquire(&mut self, now: Timestamp) -> bool {
        if self.is_ready(now) {
            self.last = Some(now);
            true
        } else {
            false
        }
    }

    /// Forget the current window so the next event is admitted immediately
    pub fn reset(&mut self) {
        self.last = None;
    }
}
