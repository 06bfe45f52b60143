//! End-to-end tests for the page runtime
//!
//! Each test drives a simulated page through `StaticEnvironment` and
//! `MemoryGeometry`, stamping every event with an explicit timestamp.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use cadence_core::DeviceSignals;
use cadence_layout::widgets::{
    ActiveSectionIndicator, AnimatedCounter, CopyFeedback, IndicatorMode, TypedText,
};
use cadence_layout::{ParallaxDirection, ParallaxEffect, TiltCard, TiltStyle};
use cadence_platform::PointerEventKind;

use crate::prelude::*;

const VIEWPORT: Size = Size {
    width: 1440.0,
    height: 900.0,
};

fn ms(v: u64) -> Timestamp {
    Timestamp::from_millis(v)
}

fn desktop_page() -> (PageRuntime, Rc<MemoryGeometry>, Rc<StaticEnvironment>) {
    page_with(StaticEnvironment::desktop())
}

fn page_with(
    environment: StaticEnvironment,
) -> (PageRuntime, Rc<MemoryGeometry>, Rc<StaticEnvironment>) {
    let geometry = Rc::new(MemoryGeometry::new(VIEWPORT));
    let environment = Rc::new(environment);
    let page = PageRuntime::new(Rc::clone(&environment), Rc::clone(&geometry));
    (page, geometry, environment)
}

/// Run frames every 16ms from `from` up to and including `to`
fn run_frames(page: &mut PageRuntime, from: u64, to: u64) {
    let mut t = from;
    while t <= to {
        page.frame(ms(t));
        t += 16;
    }
}

// ============================================================================
// Policy
// ============================================================================

#[test]
fn test_initial_tier_from_environment() {
    let (page, _, _) = desktop_page();
    assert_eq!(page.tier(), PerformanceTier::High);
    assert!(std::ptr::eq(
        page.flags(),
        PerformanceFlags::for_tier(PerformanceTier::High)
    ));

    let (phone, _, _) = page_with(StaticEnvironment::phone());
    assert_eq!(phone.tier(), PerformanceTier::Low);

    let (weak, _, _) = page_with(StaticEnvironment::new(DeviceSignals {
        device_memory_gb: Some(2.0),
        hardware_concurrency: Some(8),
        viewport_width: 1440.0,
        prefers_reduced_motion: false,
    }));
    assert_eq!(weak.tier(), PerformanceTier::Low);
}

#[test]
fn test_reduced_motion_forces_low_and_notifies_once() {
    let (mut page, _, _) = desktop_page();
    let notified = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notified);
    let _sub = page
        .handle()
        .subscribe(move |_| counter.set(counter.get() + 1));

    assert!(page.dispatch(Event::ReducedMotionChanged(true), ms(0)));
    assert_eq!(page.tier(), PerformanceTier::Low);
    assert_eq!(notified.get(), 1);

    // Same preference again: nothing changes downstream
    assert!(!page.dispatch(Event::ReducedMotionChanged(true), ms(10)));
    assert_eq!(notified.get(), 1);

    assert!(page.dispatch(Event::ReducedMotionChanged(false), ms(20)));
    assert_eq!(page.tier(), PerformanceTier::High);
    assert_eq!(notified.get(), 2);
}

#[test]
fn test_resize_within_breakpoint_keeps_tier() {
    let (mut page, _, _) = desktop_page();

    page.dispatch(
        Event::Resize {
            width: 1000.0,
            height: 800.0,
        },
        ms(0),
    );
    let report = page.frame(ms(200));
    assert!(!report.tier_changed);
    assert_eq!(page.tier(), PerformanceTier::High);
    assert_eq!(page.signals().viewport_width, 1000.0);
}

#[test]
fn test_resize_across_breakpoint_is_debounced() {
    let (mut page, _, _) = desktop_page();

    page.dispatch(
        Event::Resize {
            width: 700.0,
            height: 800.0,
        },
        ms(0),
    );
    page.dispatch(
        Event::Resize {
            width: 600.0,
            height: 800.0,
        },
        ms(60),
    );
    assert!(page.has_pending_work());

    // Still inside the quiet period of the last resize
    assert!(!page.frame(ms(100)).tier_changed);
    assert_eq!(page.tier(), PerformanceTier::High);

    assert!(page.frame(ms(176)).tier_changed);
    assert_eq!(page.tier(), PerformanceTier::Low);
    assert!(!page.has_pending_work());
}

#[test]
fn test_config_breakpoint_applies() {
    let config = CadenceConfig::from_toml_str("[policy]\nmobile_breakpoint = 640.0").unwrap();
    let environment = StaticEnvironment::new(DeviceSignals {
        device_memory_gb: Some(8.0),
        hardware_concurrency: Some(8),
        viewport_width: 700.0,
        prefers_reduced_motion: false,
    });
    let geometry = MemoryGeometry::new(VIEWPORT);

    let page = PageRuntime::with_config(config, environment, geometry).unwrap();
    assert_eq!(page.tier(), PerformanceTier::High);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = CadenceConfig::default();
    config.policy.mobile_breakpoint = -1.0;
    let result = PageRuntime::with_config(
        config,
        StaticEnvironment::desktop(),
        MemoryGeometry::new(VIEWPORT),
    );
    assert!(matches!(result, Err(AppError::InvalidConfig { .. })));
}

// ============================================================================
// Scroll
// ============================================================================

fn add_sections(page: &mut PageRuntime, geometry: &MemoryGeometry) -> [ElementId; 3] {
    let hero = page.add_section("hero");
    let about = page.add_section("about");
    let projects = page.add_section("projects");
    geometry.set_rect(hero, Rect::new(0.0, 0.0, 1440.0, 800.0));
    geometry.set_rect(about, Rect::new(0.0, 800.0, 1440.0, 800.0));
    geometry.set_rect(projects, Rect::new(0.0, 1600.0, 1440.0, 1000.0));
    [hero, about, projects]
}

#[test]
fn test_scroll_burst_commits_once_per_frame() {
    let (mut page, geometry, _) = desktop_page();
    add_sections(&mut page, &geometry);

    assert!(page.dispatch(Event::Scroll { offset_y: 0.0 }, ms(0)));
    assert!(!page.dispatch(Event::Scroll { offset_y: 50.0 }, ms(2)));
    assert!(!page.dispatch(Event::Scroll { offset_y: 100.0 }, ms(4)));

    let report = page.frame(ms(16));
    assert!(report.scroll_committed);
    assert_eq!(page.scroll_tracker().commit_count(), 1);
    assert_eq!(page.scroll_state().scroll_y, 100.0);
    assert_eq!(page.scroll_state().active_section(), Some("hero"));

    // No new scroll, no new commit
    assert!(!page.frame(ms(32)).scroll_committed);
    assert_eq!(page.scroll_tracker().commit_count(), 1);
}

#[test]
fn test_active_section_follows_lookahead_and_sticks() {
    let (mut page, geometry, _) = desktop_page();
    let [_, _, projects] = add_sections(&mut page, &geometry);

    // 750 + 100 lookahead lands in "about"
    page.dispatch(Event::Scroll { offset_y: 750.0 }, ms(0));
    page.frame(ms(16));
    assert_eq!(page.scroll_state().active_section(), Some("about"));
    assert!(page.scroll_state().is_scrolled_past(50.0));

    // Past the end of every section: the last active one sticks
    page.dispatch(Event::Scroll { offset_y: 5_000.0 }, ms(20));
    page.frame(ms(32));
    assert_eq!(page.scroll_state().active_section(), Some("about"));

    // A detached section is skipped without disturbing the rest
    geometry.detach(projects);
    page.dispatch(Event::Scroll { offset_y: 1_600.0 }, ms(40));
    page.frame(ms(48));
    assert_eq!(page.scroll_state().active_section(), Some("about"));
}

#[test]
fn test_removed_section_is_no_longer_tracked() {
    let (mut page, geometry, _) = desktop_page();
    let [_, about, _] = add_sections(&mut page, &geometry);

    assert!(page.remove(about));
    assert_eq!(page.scroll_tracker().sections().count(), 2);

    page.dispatch(Event::Scroll { offset_y: 750.0 }, ms(0));
    page.frame(ms(16));
    assert_eq!(page.scroll_state().active_section(), None);
}

#[test]
fn test_teardown_stops_scroll_tracking() {
    let (mut page, geometry, _) = desktop_page();
    add_sections(&mut page, &geometry);

    page.teardown();
    assert!(!page.dispatch(Event::Scroll { offset_y: 100.0 }, ms(0)));
    assert!(!page.frame(ms(16)).scroll_committed);
}

// ============================================================================
// Tilt
// ============================================================================

fn tilt_page() -> (PageRuntime, Rc<MemoryGeometry>, ElementId) {
    let (mut page, geometry, _) = desktop_page();
    let card = page.add_tilt_card("project-card");
    geometry.set_rect(card, Rect::new(100.0, 100.0, 200.0, 200.0));
    (page, geometry, card)
}

fn tilt(page: &PageRuntime, card: ElementId) -> &TiltCard {
    page.behavior::<TiltCard>(card).unwrap()
}

#[test]
fn test_tilt_throttles_and_flushes_trailing_sample() {
    let (mut page, _, card) = tilt_page();
    assert!(page.elements().listens(card, PointerEventKind::Move));

    page.dispatch(
        Event::Pointer(PointerEvent::Entered {
            target: card,
            x: 200.0,
            y: 200.0,
        }),
        ms(0),
    );
    assert!(tilt(&page, card).state().hovered);
    assert_eq!(tilt(&page, card).samples_applied(), 1);

    // Inside the 16ms window: parked, not applied
    page.dispatch(
        Event::Pointer(PointerEvent::Moved {
            target: card,
            x: 250.0,
            y: 200.0,
        }),
        ms(4),
    );
    page.dispatch(
        Event::Pointer(PointerEvent::Moved {
            target: card,
            x: 300.0,
            y: 200.0,
        }),
        ms(8),
    );
    assert_eq!(tilt(&page, card).samples_applied(), 1);
    assert!(tilt(&page, card).has_pending_sample());

    // Window still open at 10ms
    page.frame(ms(10));
    assert_eq!(tilt(&page, card).samples_applied(), 1);

    // Only the last parked sample is applied
    page.frame(ms(20));
    let card_state = tilt(&page, card);
    assert_eq!(card_state.samples_applied(), 2);
    assert!(!card_state.has_pending_sample());
    assert_eq!(card_state.state().rotation_y, 10.0);
    assert_eq!(card_state.state().rotation_x, 0.0);
}

#[test]
fn test_tilt_leave_returns_to_flat() {
    let (mut page, _, card) = tilt_page();

    page.dispatch(
        Event::Pointer(PointerEvent::Entered {
            target: card,
            x: 120.0,
            y: 120.0,
        }),
        ms(0),
    );
    page.dispatch(
        Event::Pointer(PointerEvent::Moved {
            target: card,
            x: 130.0,
            y: 290.0,
        }),
        ms(5),
    );
    page.dispatch(Event::Pointer(PointerEvent::Left { target: card }), ms(6));

    let state = tilt(&page, card).state();
    assert!(!state.hovered);
    assert_eq!((state.rotation_x, state.rotation_y), (0.0, 0.0));

    // The parked move must not resurrect the tilt after leave
    page.frame(ms(40));
    let state = tilt(&page, card).state();
    assert_eq!((state.rotation_x, state.rotation_y), (0.0, 0.0));
}

#[test]
fn test_tier_drop_unregisters_tilt_handlers() {
    let (mut page, _, card) = tilt_page();
    page.dispatch(
        Event::Pointer(PointerEvent::Entered {
            target: card,
            x: 300.0,
            y: 100.0,
        }),
        ms(0),
    );
    assert!(tilt(&page, card).state().hovered);

    page.dispatch(Event::ReducedMotionChanged(true), ms(10));
    assert!(!page.elements().has_pointer_handlers(card));
    assert!(!tilt(&page, card).state().hovered);
    assert_eq!(tilt(&page, card).style(page.flags()), TiltStyle::STATIC);

    // Events no longer reach the card
    assert!(!page.dispatch(
        Event::Pointer(PointerEvent::Entered {
            target: card,
            x: 300.0,
            y: 100.0,
        }),
        ms(20),
    ));
    assert!(!tilt(&page, card).state().hovered);
}

#[test]
fn test_disabled_tilt_on_low_tier_has_no_handlers() {
    let (mut page, geometry, _) = page_with(StaticEnvironment::phone());
    let card = page.add_tilt_card("card");
    geometry.set_rect(card, Rect::new(0.0, 0.0, 100.0, 100.0));
    assert!(!page.elements().has_pointer_handlers(card));
}

#[test]
fn test_detached_card_drops_sample() {
    let (mut page, geometry, card) = tilt_page();
    geometry.detach(card);

    page.dispatch(
        Event::Pointer(PointerEvent::Entered {
            target: card,
            x: 150.0,
            y: 150.0,
        }),
        ms(0),
    );
    assert_eq!(tilt(&page, card).samples_applied(), 0);
    assert_eq!(tilt(&page, card).state().rotation_y, 0.0);
}

// ============================================================================
// Widgets
// ============================================================================

#[test]
fn test_typed_text_types_on_high_tier() {
    let (mut page, _, _) = desktop_page();
    let id = page.add_typed_text("tagline", "Hi there", ms(0));
    let typed = |page: &PageRuntime| {
        page.behavior::<TypedText>(id)
            .unwrap()
            .visible_text()
            .to_owned()
    };

    assert_eq!(typed(&page), "");
    page.frame(ms(120));
    assert_eq!(typed(&page), "Hi");

    page.frame(ms(400));
    assert_eq!(typed(&page), "Hi there");
    assert!(!page.behavior::<TypedText>(id).unwrap().is_complete());

    page.frame(ms(900));
    assert!(page.behavior::<TypedText>(id).unwrap().is_complete());
}

#[test]
fn test_typed_text_complete_synchronously_on_low_tier() {
    let (mut page, _, _) = page_with(StaticEnvironment::phone());
    let id = page.add_typed_text("tagline", "Systems engineer", ms(0));

    let typed = page.behavior::<TypedText>(id).unwrap();
    assert_eq!(typed.visible_text(), "Systems engineer");
    assert!(!typed.cursor_visible(page.flags()));
}

#[test]
fn test_counter_springs_in_when_scrolled_into_view() {
    let (mut page, geometry, _) = desktop_page();
    let id = page.add_counter("years", 42.0);
    geometry.set_rect(id, Rect::new(0.0, 2_000.0, 200.0, 100.0));

    run_frames(&mut page, 0, 500);
    assert_eq!(
        page.behavior::<AnimatedCounter>(id).unwrap().display(),
        "0"
    );

    geometry.set_scroll_y(1_500.0);
    run_frames(&mut page, 516, 3_600);

    let counter = page.behavior::<AnimatedCounter>(id).unwrap();
    assert!(counter.is_visible());
    assert_eq!(counter.display(), "42");

    // Latched: scrolling away keeps the value
    geometry.set_scroll_y(0.0);
    run_frames(&mut page, 3_616, 3_700);
    assert_eq!(
        page.behavior::<AnimatedCounter>(id).unwrap().display(),
        "42"
    );
}

#[test]
fn test_counter_snaps_on_low_tier() {
    let (mut page, geometry, _) = page_with(StaticEnvironment::phone());
    let id = page.add_counter("projects", 12.0);
    geometry.set_rect(id, Rect::new(0.0, 200.0, 200.0, 100.0));

    page.frame(ms(0));
    assert_eq!(
        page.behavior::<AnimatedCounter>(id).unwrap().display(),
        "12"
    );
}

#[test]
fn test_parallax_static_on_low_tier() {
    let (mut page, geometry, environment) = desktop_page();
    let id = page.add_parallax("backdrop", 0.4, ParallaxDirection::Up);
    geometry.set_rect(id, Rect::new(0.0, 450.0, 1440.0, 100.0));

    page.frame(ms(0));
    let style = page
        .behavior::<ParallaxEffect>(id)
        .unwrap()
        .style(page.flags());
    assert!(style.translate_y_percent < 0.0);
    assert_eq!(style.translate_x_percent, 0.0);

    environment.set_prefers_reduced_motion(true);
    page.dispatch(Event::ReducedMotionChanged(true), ms(16));
    let style = page
        .behavior::<ParallaxEffect>(id)
        .unwrap()
        .style(page.flags());
    assert_eq!(style.translate_y_percent, 0.0);
}

#[test]
fn test_indicator_follows_active_section() {
    let (mut page, geometry, _) = desktop_page();
    add_sections(&mut page, &geometry);

    let about_link = page.add_element("nav-about");
    let projects_link = page.add_element("nav-projects");
    geometry.set_rect(about_link, Rect::new(400.0, 20.0, 60.0, 24.0));
    geometry.set_rect(projects_link, Rect::new(480.0, 20.0, 80.0, 24.0));
    let indicator = page.add_indicator(
        "nav-underline",
        [("about", about_link), ("projects", projects_link)],
    );

    // First placement snaps
    page.dispatch(Event::Scroll { offset_y: 750.0 }, ms(0));
    page.frame(ms(16));
    let style = page
        .behavior::<ActiveSectionIndicator>(indicator)
        .and_then(ActiveSectionIndicator::style)
        .unwrap();
    assert_eq!(style.section, "about");
    assert_eq!((style.left, style.width), (400.0, 60.0));
    assert_eq!(style.mode, IndicatorMode::Animated);

    // Moving to the next item springs over several frames
    page.dispatch(Event::Scroll { offset_y: 1_600.0 }, ms(20));
    page.frame(ms(32));
    let moving = page
        .behavior::<ActiveSectionIndicator>(indicator)
        .and_then(ActiveSectionIndicator::style)
        .unwrap();
    assert_eq!(moving.section, "projects");
    assert!(moving.left > 400.0 && moving.left < 480.0);

    run_frames(&mut page, 48, 2_000);
    let settled = page
        .behavior::<ActiveSectionIndicator>(indicator)
        .and_then(ActiveSectionIndicator::style)
        .unwrap();
    assert_eq!((settled.left, settled.width), (480.0, 80.0));
}

#[test]
fn test_copy_indicator_resets_after_delay() {
    let (mut page, _, _) = desktop_page();
    let clipboard = MemoryClipboard::new();
    let id = page.add_copy_button("email", "me@example.com");

    page.copy(id, &clipboard, ms(1_000)).unwrap();
    assert_eq!(clipboard.contents().as_deref(), Some("me@example.com"));
    assert!(page.behavior::<CopyFeedback>(id).unwrap().is_copied());

    page.frame(ms(2_999));
    assert!(page.behavior::<CopyFeedback>(id).unwrap().is_copied());
    page.frame(ms(3_000));
    assert!(!page.behavior::<CopyFeedback>(id).unwrap().is_copied());
}

#[test]
fn test_copy_failure_never_sets_indicator() {
    let (mut page, _, _) = desktop_page();
    let clipboard = MemoryClipboard::new();
    clipboard.set_failing(true);
    let id = page.add_copy_button("email", "me@example.com");

    let err = page.copy(id, &clipboard, ms(0)).unwrap_err();
    assert!(matches!(err, AppError::Platform(_)));
    assert!(!page.behavior::<CopyFeedback>(id).unwrap().is_copied());
}

#[test]
fn test_copy_on_wrong_element_is_an_error() {
    let (mut page, _, _) = desktop_page();
    let card = page.add_tilt_card("card");
    let clipboard = MemoryClipboard::new();

    let err = page.copy(card, &clipboard, ms(0)).unwrap_err();
    assert!(matches!(err, AppError::Core(_)));
    assert_eq!(clipboard.contents(), None);
}

// ============================================================================
// Frame scheduling
// ============================================================================

/// Host that runs a frame every 16ms only while the runtime asks for one.
/// Returns the time of the frame that answered `false`.
fn drive_on_demand(page: &mut PageRuntime, start: u64, limit: u64) -> u64 {
    let mut t = start;
    while t <= limit {
        if !page.dispatch(Event::Frame, ms(t)) {
            break;
        }
        t += 16;
    }
    t
}

#[test]
fn test_idle_page_needs_no_frames() {
    let (mut page, _, _) = desktop_page();
    let link = page.add_element("nav-about");

    assert!(!page.dispatch(Event::Frame, ms(0)));
    let moved = PointerEvent::Moved {
        target: link,
        x: 10.0,
        y: 10.0,
    };
    assert!(!page.dispatch(Event::Pointer(moved), ms(5)));
    assert!(!page.has_pending_work());
}

#[test]
fn test_typing_runs_to_completion_on_demand() {
    let (mut page, _, _) = desktop_page();
    let id = page.add_typed_text("tagline", "Hi there", ms(0));

    // No character is due at 16ms, yet the next tick is armed
    assert!(page.dispatch(Event::Frame, ms(16)));
    assert_eq!(page.behavior::<TypedText>(id).unwrap().visible_text(), "");

    let stopped = drive_on_demand(&mut page, 32, 10_000);
    let typed = page.behavior::<TypedText>(id).unwrap();
    assert_eq!(typed.visible_text(), "Hi there");
    assert!(typed.is_complete());
    // Last character at 400ms, completion 500ms later
    assert!(stopped >= 900 && stopped < 1_000);
    assert!(!page.has_pending_work());
}

#[test]
fn test_resize_debounce_completes_on_demand() {
    let (mut page, _, _) = desktop_page();
    let resize = Event::Resize {
        width: 600.0,
        height: 800.0,
    };

    assert!(page.dispatch(resize, ms(0)));
    drive_on_demand(&mut page, 16, 1_000);
    assert_eq!(page.tier(), PerformanceTier::Low);
    assert!(!page.has_pending_work());
}

#[test]
fn test_throttled_move_schedules_its_flush() {
    let (mut page, _, card) = tilt_page();
    let entered = PointerEvent::Entered {
        target: card,
        x: 200.0,
        y: 200.0,
    };
    let moved = PointerEvent::Moved {
        target: card,
        x: 300.0,
        y: 200.0,
    };

    assert!(page.dispatch(Event::Pointer(entered), ms(0)));
    // Parked inside the window: nothing changed, but a frame is needed
    assert!(page.dispatch(Event::Pointer(moved), ms(4)));

    drive_on_demand(&mut page, 8, 1_000);
    assert_eq!(tilt(&page, card).samples_applied(), 2);
    assert_eq!(tilt(&page, card).state().rotation_y, 10.0);
    assert!(!page.has_pending_work());
}

#[test]
fn test_copy_reset_completes_on_demand() {
    let (mut page, _, _) = desktop_page();
    let clipboard = MemoryClipboard::new();
    let id = page.add_copy_button("email", "me@example.com");

    page.copy(id, &clipboard, ms(0)).unwrap();
    assert!(page.has_pending_work());

    let stopped = drive_on_demand(&mut page, 16, 10_000);
    assert!(!page.behavior::<CopyFeedback>(id).unwrap().is_copied());
    assert!(stopped >= 2_000 && stopped < 2_100);
}

// ============================================================================
// Routing
// ============================================================================

#[test]
fn test_frame_event_reports_ongoing_work() {
    let (mut page, _, _) = desktop_page();
    page.add_typed_text("tagline", "abc", ms(0));

    // A character appeared, so another frame is wanted
    assert!(page.dispatch(Event::Frame, ms(60)));
    assert_eq!(page.frame_count(), 1);

    let report = page.frame(ms(76));
    assert_eq!(report.dt, Duration::from_millis(16));
}

#[test]
fn test_timed_events_and_dirty_tracking() {
    let (mut page, geometry, _) = desktop_page();
    let card = page.add_tilt_card("card");
    geometry.set_rect(card, Rect::new(0.0, 0.0, 100.0, 100.0));
    page.elements_mut().take_dirty();

    page.handle_event(TimedEvent::new(
        Event::Pointer(PointerEvent::Entered {
            target: card,
            x: 10.0,
            y: 10.0,
        }),
        ms(0),
    ));
    assert!(page.elements().is_dirty(card));
    assert_eq!(page.elements_mut().take_dirty(), vec![card]);
}

#[test]
fn test_removed_element_drops_pending_work() {
    let (mut page, _, _) = desktop_page();
    let clipboard = MemoryClipboard::new();
    let id = page.add_copy_button("email", "x");
    page.copy(id, &clipboard, ms(0)).unwrap();

    assert!(page.remove(id));
    assert!(page.behavior::<CopyFeedback>(id).is_none());
    assert!(!page.dispatch(Event::Pointer(PointerEvent::Left { target: id }), ms(10)));
    page.frame(ms(3_000));
}
