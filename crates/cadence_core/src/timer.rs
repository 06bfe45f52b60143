//! Owned deadlines
//!
//! Browser code tends to scatter `setTimeout` handles that must be cleared on
//! teardown. Here a pending timer is a field on the component that owns it:
//! the host polls with the current [`Timestamp`], and dropping or re-arming
//! the component cancels the old deadline with no chance of a stale callback.

use std::time::Duration;

use crate::time::Timestamp;

/// A one-shot deadline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Timestamp>,
}

impl Timeout {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) to fire `delay` after `now`
    pub fn arm(&mut self, now: Timestamp, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    /// Fire if the deadline has passed. A fired timeout disarms itself.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Trailing-edge debounce: fires once `delay` after the last trigger
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    delay: Duration,
    timeout: Timeout,
}

impl Debounce {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            timeout: Timeout::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the quiet period
    pub fn trigger(&mut self, now: Timestamp) {
        self.timeout.arm(now, self.delay);
    }

    pub fn cancel(&mut self) {
        self.timeout.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.timeout.is_armed()
    }

    /// Returns `true` once the quiet period has elapsed since the last trigger
    pub fn poll(&mut self, now: Timestamp) -> bool {
        self.timeout.poll(now)
    }
}
