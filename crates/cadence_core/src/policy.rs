//! Performance policy store
//!
//! A single-writer, many-reader holder for the current [`PerformanceFlags`].
//! The page runtime owns the [`PolicyController`]; every widget and effect
//! receives a [`PolicyHandle`], which can read and subscribe but never write.
//!
//! Subscribers are only notified when the tier actually changes, so
//! re-probing the environment with unchanged results costs nothing
//! downstream.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::performance::{DeviceSignals, PerformanceTier};
//! use cadence_core::policy::PolicyController;
//!
//! let controller = PolicyController::new(PerformanceTier::High);
//! let handle = controller.handle();
//!
//! let _sub = handle.subscribe(|flags| {
//!     println!("tier is now {}", flags.tier);
//! });
//!
//! controller.update(&DeviceSignals {
//!     prefers_reduced_motion: true,
//!     ..Default::default()
//! });
//! assert_eq!(handle.tier(), PerformanceTier::Low);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::performance::{DeviceSignals, PerformanceFlags, PerformanceTier, MOBILE_BREAKPOINT};

type FlagsCallback = Rc<dyn Fn(&'static PerformanceFlags)>;

struct PolicyInner {
    flags: Cell<&'static PerformanceFlags>,
    breakpoint: Cell<f32>,
    subscribers: RefCell<SmallVec<[(u64, FlagsCallback); 4]>>,
    next_id: Cell<u64>,
}

impl PolicyInner {
    fn notify(&self, flags: &'static PerformanceFlags) {
        // Snapshot so callbacks may subscribe or drop subscriptions
        let callbacks: SmallVec<[FlagsCallback; 4]> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();

        for cb in callbacks {
            cb(flags);
        }
    }
}

/// Write side of the policy store
pub struct PolicyController {
    inner: Rc<PolicyInner>,
}

impl PolicyController {
    /// Create a controller starting at `tier`
    pub fn new(tier: PerformanceTier) -> Self {
        Self {
            inner: Rc::new(PolicyInner {
                flags: Cell::new(PerformanceFlags::for_tier(tier)),
                breakpoint: Cell::new(MOBILE_BREAKPOINT),
                subscribers: RefCell::new(SmallVec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Create a controller from an initial probe
    pub fn from_signals(signals: &DeviceSignals) -> Self {
        Self::new(PerformanceTier::classify(signals))
    }

    /// Override the mobile breakpoint used by [`update`](Self::update)
    pub fn with_breakpoint(self, breakpoint: f32) -> Self {
        self.inner.breakpoint.set(breakpoint);
        self
    }

    /// Get a read-only handle for consumers
    pub fn handle(&self) -> PolicyHandle {
        PolicyHandle {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Reclassify from fresh signals.
    ///
    /// Returns the new tier if it changed.
    pub fn update(&self, signals: &DeviceSignals) -> Option<PerformanceTier> {
        let tier = PerformanceTier::classify_with_breakpoint(signals, self.inner.breakpoint.get());
        self.set_tier(tier)
    }

    /// Force a tier. Returns the new tier if it changed.
    pub fn set_tier(&self, tier: PerformanceTier) -> Option<PerformanceTier> {
        let previous = self.inner.flags.get().tier;
        if previous == tier {
            return None;
        }

        let flags = PerformanceFlags::for_tier(tier);
        self.inner.flags.set(flags);
        tracing::debug!(from = %previous, to = %tier, "performance tier changed");
        self.inner.notify(flags);
        Some(tier)
    }

    pub fn flags(&self) -> &'static PerformanceFlags {
        self.inner.flags.get()
    }
}

impl std::fmt::Debug for PolicyController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyController")
            .field("tier", &self.inner.flags.get().tier)
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

/// Read side of the policy store (cheap to clone)
#[derive(Clone)]
pub struct PolicyHandle {
    inner: Rc<PolicyInner>,
}

impl PolicyHandle {
    /// A handle pinned to a tier, not connected to any controller.
    ///
    /// Useful for widgets rendered outside a page runtime and for tests.
    pub fn fixed(tier: PerformanceTier) -> Self {
        PolicyController::new(tier).handle()
    }

    /// Current flags. Same tier always yields the same static record.
    pub fn flags(&self) -> &'static PerformanceFlags {
        self.inner.flags.get()
    }

    pub fn tier(&self) -> PerformanceTier {
        self.flags().tier
    }

    /// Subscribe to tier changes. Dropping the returned guard unsubscribes.
    #[must_use = "dropping the subscription immediately unsubscribes"]
    pub fn subscribe<F>(&self, callback: F) -> PolicySubscription
    where
        F: Fn(&'static PerformanceFlags) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));

        PolicySubscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

impl std::fmt::Debug for PolicyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyHandle")
            .field("tier", &self.tier())
            .finish()
    }
}

/// Subscription guard returned by [`PolicyHandle::subscribe`]
#[derive(Debug)]
pub struct PolicySubscription {
    inner: Weak<PolicyInner>,
    id: u64,
}

impl Drop for PolicySubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .subscribers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}
