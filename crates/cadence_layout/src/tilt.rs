//! Pointer-driven 3D tilt
//!
//! A [`TiltCard`] rotates toward the pointer while hovered and places a
//! glare highlight under it. Moves are throttled to one computation per
//! window; moves that arrive inside a window overwrite a single pending
//! sample, which is applied on the first frame after the window elapses.
//!
//! When tilt is disabled, by policy or per card, the card is static and
//! registers no pointer listeners at all.

use std::time::Duration;

use cadence_core::{
    CadenceError, Coalescer, ElementId, PerformanceFlags, Point, Rect, Throttle, Timestamp,
    DEFAULT_THROTTLE_WINDOW,
};
use cadence_platform::{GeometrySource, PointerEvent};
use tracing::warn;

use crate::element::{Behavior, FrameContext, Listeners};

/// Tilt card parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltConfig {
    /// Rotation at the card edge, in degrees
    pub max_tilt: f32,
    /// Scale while hovered
    pub hover_scale: f32,
    /// CSS perspective distance in px
    pub perspective: f32,
    pub glare_opacity: f32,
    /// Glare gradient radius as a percentage of the card
    pub glare_size: f32,
    pub border_radius: f32,
    /// Transform transition applied by the host
    pub transition: Duration,
    /// Minimum spacing between tilt computations
    pub throttle: Duration,
    /// Per-card opt-out
    pub disabled: bool,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_tilt: 10.0,
            hover_scale: 1.02,
            perspective: 1000.0,
            glare_opacity: 0.2,
            glare_size: 100.0,
            border_radius: 8.0,
            transition: Duration::from_millis(200),
            throttle: DEFAULT_THROTTLE_WINDOW,
            disabled: false,
        }
    }
}

/// Live tilt state, only mutated while hovered
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltState {
    pub rotation_x: f32,
    pub rotation_y: f32,
    /// Glare center as a percentage of card width
    pub glare_x: f32,
    /// Glare center as a percentage of card height
    pub glare_y: f32,
    pub hovered: bool,
}

impl Default for TiltState {
    fn default() -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            glare_x: 50.0,
            glare_y: 50.0,
            hovered: false,
        }
    }
}

/// Glare overlay, present only while hovered with glare enabled
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlareStyle {
    pub x_percent: f32,
    pub y_percent: f32,
    pub opacity: f32,
    pub size_percent: f32,
}

/// Render-ready output for the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltStyle {
    pub rotate_x_deg: f32,
    pub rotate_y_deg: f32,
    pub scale: f32,
    /// `None` renders as `perspective: none`
    pub perspective: Option<f32>,
    pub glare: Option<GlareStyle>,
}

impl TiltStyle {
    pub const STATIC: TiltStyle = TiltStyle {
        rotate_x_deg: 0.0,
        rotate_y_deg: 0.0,
        scale: 1.0,
        perspective: None,
        glare: None,
    };

    /// CSS `transform` value
    pub fn transform(&self) -> String {
        format!(
            "rotateX({}deg) rotateY({}deg) scale({})",
            self.rotate_x_deg, self.rotate_y_deg, self.scale
        )
    }
}

/// Rotation for a pointer at `pointer` over a card at `rect` (client space).
///
/// Returns `(rotation_x, rotation_y)` in degrees.
pub fn tilt_angles(pointer: Point, rect: Rect, max_tilt: f32) -> Result<(f32, f32), CadenceError> {
    if rect.is_empty() {
        return Err(CadenceError::Geometry("card has no area".into()));
    }
    let center = rect.center();
    let rotation_y = ((pointer.x - center.x) / (rect.width() / 2.0)) * max_tilt;
    let rotation_x = ((center.y - pointer.y) / (rect.height() / 2.0)) * max_tilt;
    Ok((rotation_x, rotation_y))
}

/// Glare center as percentages of the card's size
pub fn glare_position(pointer: Point, rect: Rect) -> Result<(f32, f32), CadenceError> {
    if rect.is_empty() {
        return Err(CadenceError::Geometry("card has no area".into()));
    }
    Ok((
        (pointer.x - rect.x()) / rect.width() * 100.0,
        (pointer.y - rect.y()) / rect.height() * 100.0,
    ))
}

/// A pointer-tilted card
#[derive(Debug)]
pub struct TiltCard {
    config: TiltConfig,
    state: TiltState,
    throttle: Throttle,
    pending: Coalescer<Point>,
    samples_applied: u64,
}

impl Default for TiltCard {
    fn default() -> Self {
        Self::new(TiltConfig::default())
    }
}

impl TiltCard {
    pub fn new(config: TiltConfig) -> Self {
        Self {
            throttle: Throttle::new(config.throttle),
            config,
            state: TiltState::default(),
            pending: Coalescer::new(),
            samples_applied: 0,
        }
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    pub fn state(&self) -> &TiltState {
        &self.state
    }

    /// Whether the card reacts to the pointer under these flags
    pub fn is_active(&self, flags: &PerformanceFlags) -> bool {
        !self.config.disabled && !flags.disable_tilt
    }

    /// Tilt computations performed so far
    pub fn samples_applied(&self) -> u64 {
        self.samples_applied
    }

    pub fn has_pending_sample(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn on_enter(&mut self, flags: &PerformanceFlags) -> bool {
        if !self.is_active(flags) || self.state.hovered {
            return false;
        }
        self.state.hovered = true;
        true
    }

    /// Handle a pointer move. Applies immediately if the throttle window is
    /// open. Otherwise the sample overwrites the single pending slot: moves
    /// inside a window never queue up, only the last one survives and is
    /// applied by [`flush`](Self::flush) once the window elapses.
    pub fn on_move(
        &mut self,
        pointer: Point,
        now: Timestamp,
        flags: &PerformanceFlags,
        geometry: &dyn GeometrySource,
        element: ElementId,
    ) -> bool {
        if !self.is_active(flags) {
            return false;
        }
        if self.throttle.try_acquire(now) {
            self.pending.clear();
            self.apply(pointer, flags, geometry, element)
        } else {
            self.pending.offer(pointer);
            false
        }
    }

    /// Apply the pending sample once its window has elapsed
    pub fn flush(
        &mut self,
        now: Timestamp,
        flags: &PerformanceFlags,
        geometry: &dyn GeometrySource,
        element: ElementId,
    ) -> bool {
        if !self.pending.is_pending() || !self.throttle.is_ready(now) {
            return false;
        }
        if !self.is_active(flags) {
            self.pending.clear();
            return false;
        }
        match self.pending.take() {
            Some(pointer) => {
                self.throttle.try_acquire(now);
                self.apply(pointer, flags, geometry, element)
            }
            None => false,
        }
    }

    /// Pointer left: back to exactly flat, pending sample dropped
    pub fn on_leave(&mut self) -> bool {
        self.pending.clear();
        self.throttle.reset();
        let changed =
            self.state.hovered || self.state.rotation_x != 0.0 || self.state.rotation_y != 0.0;
        self.state.hovered = false;
        self.state.rotation_x = 0.0;
        self.state.rotation_y = 0.0;
        changed
    }

    fn apply(
        &mut self,
        pointer: Point,
        flags: &PerformanceFlags,
        geometry: &dyn GeometrySource,
        element: ElementId,
    ) -> bool {
        let sample = geometry.client_rect(element).and_then(|rect| {
            let angles = tilt_angles(pointer, rect, self.config.max_tilt)?;
            let glare = glare_position(pointer, rect)?;
            Ok((angles, glare))
        });

        let ((rotation_x, rotation_y), (glare_x, glare_y)) = match sample {
            Ok(sample) => sample,
            Err(err) => {
                warn!(?element, %err, "tilt sample dropped");
                return false;
            }
        };

        self.samples_applied += 1;
        self.state.rotation_x = rotation_x;
        self.state.rotation_y = rotation_y;
        if !flags.disable_glare {
            self.state.glare_x = glare_x;
            self.state.glare_y = glare_y;
        }
        true
    }

    /// Render output under the given flags
    pub fn style(&self, flags: &PerformanceFlags) -> TiltStyle {
        if !self.is_active(flags) {
            return TiltStyle::STATIC;
        }
        let perspective = Some(self.config.perspective);
        if !self.state.hovered {
            return TiltStyle {
                perspective,
                ..TiltStyle::STATIC
            };
        }

        let glare = (!flags.disable_glare).then_some(GlareStyle {
            x_percent: self.state.glare_x,
            y_percent: self.state.glare_y,
            opacity: self.config.glare_opacity,
            size_percent: self.config.glare_size,
        });

        TiltStyle {
            rotate_x_deg: self.state.rotation_x,
            rotate_y_deg: self.state.rotation_y,
            scale: self.config.hover_scale,
            perspective,
            glare,
        }
    }
}

impl Behavior for TiltCard {
    fn mount(&mut self, listeners: &mut Listeners, flags: &'static PerformanceFlags) {
        if self.is_active(flags) {
            listeners.listen_hover();
        } else {
            // Policy turned tilt off while hovered
            self.on_leave();
        }
    }

    fn on_pointer(
        &mut self,
        element: ElementId,
        event: &PointerEvent,
        cx: &FrameContext<'_>,
    ) -> bool {
        match *event {
            PointerEvent::Entered { x, y, .. } => {
                let entered = self.on_enter(cx.flags);
                let moved = self.on_move(Point::new(x, y), cx.now, cx.flags, cx.geometry, element);
                entered || moved
            }
            PointerEvent::Moved { x, y, .. } => {
                self.on_move(Point::new(x, y), cx.now, cx.flags, cx.geometry, element)
            }
            PointerEvent::Left { .. } => self.on_leave(),
        }
    }

    fn on_frame(&mut self, element: ElementId, cx: &FrameContext<'_>) -> bool {
        self.flush(cx.now, cx.flags, cx.geometry, element)
    }

    fn has_pending(&self) -> bool {
        self.has_pending_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{PerformanceTier, Size};
    use cadence_platform::MemoryGeometry;
    use slotmap::SlotMap;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn high() -> &'static PerformanceFlags {
        PerformanceFlags::for_tier(PerformanceTier::High)
    }

    /// A 200x100 card at (100, 100) in client space
    fn card() -> (MemoryGeometry, ElementId) {
        let mut arena: SlotMap<ElementId, ()> = SlotMap::with_key();
        let id = arena.insert(());
        let geometry = MemoryGeometry::new(Size::new(1280.0, 800.0));
        geometry.set_rect(id, Rect::new(100.0, 100.0, 200.0, 100.0));
        (geometry, id)
    }

    #[test]
    fn test_angles_at_corners() {
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
        let (rx, ry) = tilt_angles(Point::new(300.0, 100.0), rect, 10.0).unwrap();
        assert_eq!((rx, ry), (10.0, 10.0));

        let (rx, ry) = tilt_angles(rect.center(), rect, 10.0).unwrap();
        assert_eq!((rx, ry), (0.0, 0.0));

        let (gx, gy) = glare_position(Point::new(150.0, 175.0), rect).unwrap();
        assert_eq!((gx, gy), (25.0, 75.0));
    }

    #[test]
    fn test_throttled_moves_keep_last_sample() {
        let (geometry, id) = card();
        let mut tilt = TiltCard::default();
        tilt.on_enter(high());

        assert!(tilt.on_move(Point::new(300.0, 150.0), ms(0), high(), &geometry, id));
        assert!(!tilt.on_move(Point::new(250.0, 150.0), ms(5), high(), &geometry, id));
        assert!(!tilt.on_move(Point::new(100.0, 150.0), ms(10), high(), &geometry, id));
        assert_eq!(tilt.samples_applied(), 1);

        // Window still closed
        assert!(!tilt.flush(ms(12), high(), &geometry, id));
        // Last sample wins
        assert!(tilt.flush(ms(16), high(), &geometry, id));
        assert_eq!(tilt.state().rotation_y, -10.0);
        assert_eq!(tilt.samples_applied(), 2);
        assert!(!tilt.has_pending_sample());
    }

    #[test]
    fn test_leave_resets_exactly() {
        let (geometry, id) = card();
        let mut tilt = TiltCard::default();
        tilt.on_enter(high());
        tilt.on_move(Point::new(120.0, 110.0), ms(0), high(), &geometry, id);
        tilt.on_move(Point::new(130.0, 110.0), ms(4), high(), &geometry, id);

        assert!(tilt.on_leave());
        assert_eq!(tilt.state().rotation_x, 0.0);
        assert_eq!(tilt.state().rotation_y, 0.0);
        assert!(!tilt.state().hovered);
        assert!(!tilt.flush(ms(100), high(), &geometry, id));
        assert_eq!(tilt.style(high()).glare, None);
    }

    #[test]
    fn test_geometry_error_drops_sample() {
        let (geometry, id) = card();
        geometry.detach(id);
        let mut tilt = TiltCard::default();
        tilt.on_enter(high());
        assert!(!tilt.on_move(Point::new(300.0, 150.0), ms(0), high(), &geometry, id));
        assert_eq!(tilt.state().rotation_y, 0.0);
        assert_eq!(tilt.samples_applied(), 0);
    }

    #[test]
    fn test_medium_tier_has_no_glare() {
        let medium = PerformanceFlags::for_tier(PerformanceTier::Medium);
        let (geometry, id) = card();
        let mut tilt = TiltCard::default();
        tilt.on_enter(medium);
        tilt.on_move(Point::new(300.0, 100.0), ms(0), medium, &geometry, id);

        let style = tilt.style(medium);
        assert_eq!(style.rotate_y_deg, 10.0);
        assert_eq!(style.scale, 1.02);
        assert!(style.glare.is_none());
        assert_eq!(tilt.state().glare_x, 50.0);
    }

    #[test]
    fn test_disabled_registers_no_listeners() {
        let low = PerformanceFlags::for_tier(PerformanceTier::Low);
        let mut listeners = Listeners::default();
        TiltCard::default().mount(&mut listeners, low);
        assert!(listeners.is_empty());

        let mut per_card = TiltCard::new(TiltConfig {
            disabled: true,
            ..Default::default()
        });
        per_card.mount(&mut listeners, high());
        assert!(listeners.is_empty());
        assert_eq!(per_card.style(high()), TiltStyle::STATIC);

        TiltCard::default().mount(&mut listeners, high());
        assert_eq!(listeners.len(), 3);
    }

    #[test]
    fn test_held_sample_is_pending_work() {
        let (geometry, id) = card();
        let mut tilt = TiltCard::default();
        tilt.on_enter(high());
        tilt.on_move(Point::new(300.0, 150.0), ms(0), high(), &geometry, id);
        assert!(!tilt.has_pending());

        tilt.on_move(Point::new(250.0, 150.0), ms(5), high(), &geometry, id);
        assert!(tilt.has_pending());

        tilt.flush(ms(16), high(), &geometry, id);
        assert!(!tilt.has_pending());
    }
}
