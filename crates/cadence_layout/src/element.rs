//! Element arena and per-element behaviors
//!
//! Every tracked element owns a slot in an [`ElementContext`]. A slot holds
//! the element's pointer listeners and an optional [`Behavior`] (tilt card,
//! counter, reveal, ...). Removing the slot drops the behavior, and with it
//! every deadline the behavior owned.
//!
//! Behaviors are type-erased so one arena can hold them all; typed access
//! goes through [`ElementContext::behavior`] and a downcast.

use std::any::Any;
use std::time::Duration;

use cadence_core::{ElementId, PerformanceFlags, Timestamp};
use cadence_platform::{GeometrySource, PointerEvent, PointerEventKind};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::scroll::ScrollState;

/// Downcasting support for behaviors
pub trait AsAny: 'static {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Everything a behavior may read while handling an event or frame
pub struct FrameContext<'a> {
    pub now: Timestamp,
    /// Time since the previous frame
    pub dt: Duration,
    pub flags: &'static PerformanceFlags,
    pub geometry: &'a dyn GeometrySource,
    pub scroll: &'a ScrollState,
}

/// Pointer event kinds an element listens for
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listeners {
    kinds: SmallVec<[PointerEventKind; 3]>,
}

impl Listeners {
    pub fn listen(&mut self, kind: PointerEventKind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    /// Listen for enter, move, and leave
    pub fn listen_hover(&mut self) {
        self.listen(PointerEventKind::Enter);
        self.listen(PointerEventKind::Move);
        self.listen(PointerEventKind::Leave);
    }

    pub fn contains(&self, kind: PointerEventKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn clear(&mut self) {
        self.kinds.clear();
    }
}

/// Per-element animated behavior
pub trait Behavior: AsAny {
    /// Register pointer listeners for the current flags.
    ///
    /// Called when the behavior is attached and again after every tier
    /// change, each time with a cleared listener set.
    fn mount(&mut self, _listeners: &mut Listeners, _flags: &'static PerformanceFlags) {}

    /// Handle a pointer event addressed to this element. Returns `true` if
    /// the render output changed.
    fn on_pointer(
        &mut self,
        _element: ElementId,
        _event: &PointerEvent,
        _cx: &FrameContext<'_>,
    ) -> bool {
        false
    }

    /// Advance one frame. Returns `true` if the render output changed.
    fn on_frame(&mut self, element: ElementId, cx: &FrameContext<'_>) -> bool;

    /// Whether a later frame has work to do even with no new input: an armed
    /// deadline, a held pointer sample, or motion that has not settled.
    fn has_pending(&self) -> bool {
        false
    }
}

/// Dirty tracking for incremental repaints
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty: FxHashSet<ElementId>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, id: ElementId) {
        self.dirty.insert(id);
    }

    pub fn is_dirty(&self, id: ElementId) -> bool {
        self.dirty.contains(&id)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Take all dirty element ids (clears the set)
    pub fn take_dirty(&mut self) -> Vec<ElementId> {
        self.dirty.drain().collect()
    }

    pub fn clear(&mut self) {
        self.dirty.clear();
    }

    fn forget(&mut self, id: ElementId) {
        self.dirty.remove(&id);
    }
}

/// Data stored for each element
#[derive(Default)]
struct ElementData {
    label: Option<String>,
    listeners: Listeners,
    behavior: Option<Box<dyn Behavior>>,
}

/// Arena of live elements
#[derive(Default)]
pub struct ElementContext {
    elements: SlotMap<ElementId, ElementData>,
    dirty: DirtyTracker,
}

impl ElementContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a slot for a new element
    pub fn create(&mut self) -> ElementId {
        self.elements.insert(ElementData::default())
    }

    /// Allocate a slot with a label (section id, debug name)
    pub fn create_labeled(&mut self, label: impl Into<String>) -> ElementId {
        self.elements.insert(ElementData {
            label: Some(label.into()),
            ..Default::default()
        })
    }

    /// Remove an element and drop its behavior
    pub fn remove(&mut self, id: ElementId) -> bool {
        self.dirty.forget(id);
        self.elements.remove(id).is_some()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn label(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).and_then(|d| d.label.as_deref())
    }

    /// Find the first element with this label
    pub fn find(&self, label: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|(_, d)| d.label.as_deref() == Some(label))
            .map(|(id, _)| id)
    }

    /// Attach a behavior, replacing any existing one, and mount it.
    ///
    /// Returns `false` if the element does not exist.
    pub fn attach<B: Behavior>(
        &mut self,
        id: ElementId,
        behavior: B,
        flags: &'static PerformanceFlags,
    ) -> bool {
        let Some(data) = self.elements.get_mut(id) else {
            return false;
        };
        let mut behavior: Box<dyn Behavior> = Box::new(behavior);
        data.listeners.clear();
        behavior.mount(&mut data.listeners, flags);
        data.behavior = Some(behavior);
        self.dirty.mark(id);
        true
    }

    /// Get an element's behavior (immutable)
    pub fn behavior<B: Behavior>(&self, id: ElementId) -> Option<&B> {
        self.elements
            .get(id)
            .and_then(|d| d.behavior.as_ref())
            // Deref through the Box so the downcast sees the concrete type
            .and_then(|b| (**b).as_any().downcast_ref())
    }

    /// Get an element's behavior (mutable)
    pub fn behavior_mut<B: Behavior>(&mut self, id: ElementId) -> Option<&mut B> {
        self.elements
            .get_mut(id)
            .and_then(|d| d.behavior.as_mut())
            .and_then(|b| (**b).as_any_mut().downcast_mut())
    }

    pub fn listens(&self, id: ElementId, kind: PointerEventKind) -> bool {
        self.elements
            .get(id)
            .is_some_and(|d| d.listeners.contains(kind))
    }

    /// Whether any pointer handler is registered for the element
    pub fn has_pointer_handlers(&self, id: ElementId) -> bool {
        self.elements
            .get(id)
            .is_some_and(|d| !d.listeners.is_empty())
    }

    /// Re-run every behavior's `mount` after a tier change
    pub fn remount(&mut self, flags: &'static PerformanceFlags) {
        for (id, data) in self.elements.iter_mut() {
            data.listeners.clear();
            if let Some(behavior) = data.behavior.as_mut() {
                behavior.mount(&mut data.listeners, flags);
                self.dirty.mark(id);
            }
        }
    }

    /// Route a pointer event to its target, if the target listens for it
    pub fn dispatch_pointer(&mut self, event: &PointerEvent, cx: &FrameContext<'_>) -> bool {
        let id = event.target();
        let Some(data) = self.elements.get_mut(id) else {
            trace!(?id, "pointer event for unknown element");
            return false;
        };
        if !data.listeners.contains(event.kind()) {
            return false;
        }
        let Some(behavior) = data.behavior.as_mut() else {
            return false;
        };
        let changed = behavior.on_pointer(id, event, cx);
        if changed {
            self.dirty.mark(id);
        }
        changed
    }

    /// Advance every behavior one frame. Returns how many changed.
    pub fn frame(&mut self, cx: &FrameContext<'_>) -> usize {
        let mut changed = 0;
        for (id, data) in self.elements.iter_mut() {
            if let Some(behavior) = data.behavior.as_mut() {
                if behavior.on_frame(id, cx) {
                    self.dirty.mark(id);
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Whether any behavior still needs frames
    pub fn has_pending(&self) -> bool {
        self.elements
            .values()
            .any(|d| d.behavior.as_ref().is_some_and(|b| b.has_pending()))
    }

    /// Whether this element's behavior still needs frames
    pub fn is_pending(&self, id: ElementId) -> bool {
        self.elements
            .get(id)
            .and_then(|d| d.behavior.as_ref())
            .is_some_and(|b| b.has_pending())
    }

    pub fn mark_dirty(&mut self, id: ElementId) {
        self.dirty.mark(id);
    }

    pub fn is_dirty(&self, id: ElementId) -> bool {
        self.dirty.is_dirty(id)
    }

    pub fn has_dirty(&self) -> bool {
        self.dirty.has_dirty()
    }

    /// Take all dirty element ids (clears the set)
    pub fn take_dirty(&mut self) -> Vec<ElementId> {
        self.dirty.take_dirty()
    }

    pub fn dirty_tracker(&self) -> &DirtyTracker {
        &self.dirty
    }
}
