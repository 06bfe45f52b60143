//! Single-slot work coalescing
//!
//! A [`Coalescer`] holds at most one pending unit of work. Offering new work
//! while a unit is pending replaces it, so the consumer only ever sees the
//! most recent value. The first offer into an empty slot reports that the
//! producer should schedule a flush (e.g. request an animation frame);
//! subsequent offers do not, which is what keeps scroll handling to one
//! commit per frame.

/// Replace-on-arrival single-slot queue
#[derive(Clone, Debug, Default)]
pub struct Coalescer<T> {
    pending: Option<T>,
    replaced: u64,
}

impl<T> Coalescer<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            replaced: 0,
        }
    }

    /// Offer a value.
    ///
    /// Returns `true` if the slot was empty, meaning the caller should
    /// schedule a flush. Returns `false` if an earlier value was replaced and
    /// a flush is already owed.
    pub fn offer(&mut self, value: T) -> bool {
        let was_empty = self.pending.is_none();
        if !was_empty {
            self.replaced += 1;
        }
        self.pending = Some(value);
        was_empty
    }

    /// Take the pending value, leaving the slot empty
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Discard any pending value
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Number of values overwritten before being taken
    pub fn replaced_count(&self) -> u64 {
        self.replaced
    }
}
