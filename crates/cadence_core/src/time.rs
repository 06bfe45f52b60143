//! Host time
//!
//! All deferred work in Cadence is expressed as deadlines on the host's frame
//! clock rather than wall-clock timers. The host passes the current
//! [`Timestamp`] into every event, so components own their deadlines and
//! dropping a component cancels whatever it was waiting for.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Monotonic time since page origin.
///
/// In a browser this is `performance.now()` / the `requestAnimationFrame`
/// timestamp; headless hosts can use any monotonic clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    pub const fn new(since_origin: Duration) -> Self {
        Self(since_origin)
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Convert a `DOMHighResTimeStamp` (fractional milliseconds).
    ///
    /// Negative or non-finite inputs clamp to zero.
    pub fn from_millis_f64(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Self(Duration::from_secs_f64(ms / 1000.0))
        } else {
            Self::ZERO
        }
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn as_millis_f64(&self) -> f64 {
        self.0.as_secs_f64() * 1000.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(&self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

impl Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Timestamp) -> Duration {
        self.saturating_since(rhs)
    }
}
