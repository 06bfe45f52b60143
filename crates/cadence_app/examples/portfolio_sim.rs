//! Portfolio page simulation
//!
//! Drives a headless page through a short scripted session (typing, scrolling,
//! hovering a project card, a window resize, and a reduced-motion toggle) and
//! logs what every component decides along the way.
//!
//! Run with:
//! ```sh
//! RUST_LOG=cadence=debug cargo run -p cadence_app --example portfolio_sim
//! RUST_LOG=cadence=debug cargo run -p cadence_app --example portfolio_sim -- cadence.toml
//! ```

use std::rc::Rc;

use anyhow::{Context, Result};
use cadence_app::logging;
use cadence_app::prelude::*;
use cadence_layout::widgets::{AnimatedCounter, CopyFeedback, TypedText};
use tracing::info;

/// Host frame interval (~60 Hz)
const FRAME_MS: u64 = 16;

struct Session {
    page: PageRuntime,
    geometry: Rc<MemoryGeometry>,
    environment: Rc<StaticEnvironment>,
    now: u64,
    /// The runtime asked for another frame
    frame_requested: bool,
}

impl Session {
    fn at(&self) -> Timestamp {
        Timestamp::from_millis(self.now)
    }

    fn send(&mut self, event: Event) {
        let at = self.at();
        if self.page.handle_event(TimedEvent::new(event, at)) {
            self.frame_requested = true;
        }
    }

    /// Advance the clock, running a frame every `FRAME_MS` for as long as
    /// the runtime keeps asking for one
    fn run_for(&mut self, ms: u64) {
        // Work queued outside an event (new widgets, a copy)
        self.frame_requested |= self.page.has_pending_work();

        let end = self.now + ms;
        while self.now < end {
            self.now += FRAME_MS;
            if self.frame_requested {
                let at = self.at();
                self.frame_requested = self.page.dispatch(Event::Frame, at);
            }
        }
    }

    fn scroll_to(&mut self, offset_y: f32) {
        self.geometry.set_scroll_y(offset_y);
        self.send(Event::Scroll { offset_y });
        self.run_for(FRAME_MS);
        info!(
            offset_y,
            active = ?self.page.scroll_state().active_section(),
            "scrolled"
        );
    }
}

fn main() -> Result<()> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => CadenceConfig::load(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => CadenceConfig::default(),
    };

    let geometry = Rc::new(MemoryGeometry::new(Size::new(1440.0, 900.0)));
    let environment = Rc::new(StaticEnvironment::desktop());
    let page = PageRuntime::with_config(config, Rc::clone(&environment), Rc::clone(&geometry))
        .context("building page runtime")?;
    info!(tier = %page.tier(), "page loaded");

    let mut session = Session {
        page,
        geometry,
        environment,
        now: 0,
        frame_requested: false,
    };

    // Layout: three sections, a counter, a project card, nav links, a copy button
    let sections = [
        ("hero", 0.0, 900.0),
        ("projects", 900.0, 1_200.0),
        ("contact", 2_100.0, 800.0),
    ];
    let mut links = Vec::new();
    for (i, (name, top, height)) in sections.iter().enumerate() {
        let section = session.page.add_section(*name);
        session
            .geometry
            .set_rect(section, Rect::new(0.0, *top, 1440.0, *height));

        let link = session.page.add_element(format!("nav-{name}"));
        session
            .geometry
            .set_rect(link, Rect::new(600.0 + i as f32 * 120.0, 24.0, 100.0, 24.0));
        links.push((*name, link));
    }
    session.page.add_indicator("nav-underline", links);

    let tagline = session
        .page
        .add_typed_text("tagline", "Building fast, calm interfaces.", session.at());
    let counter = session.page.add_counter("shipped-projects", 27.0);
    session
        .geometry
        .set_rect(counter, Rect::new(200.0, 1_300.0, 240.0, 80.0));
    let card = session.page.add_tilt_card("project-card");
    session
        .geometry
        .set_rect(card, Rect::new(400.0, 1_000.0, 320.0, 240.0));
    let email = session.page.add_copy_button("email", "hello@example.com");

    // Typing runs in the hero
    session.run_for(2_500);
    if let Some(typed) = session.page.behavior::<TypedText>(tagline) {
        info!(
            text = typed.visible_text(),
            complete = typed.is_complete(),
            "tagline"
        );
    }

    // Scroll the projects section into view; the counter springs in
    session.scroll_to(600.0);
    session.run_for(2_000);
    if let Some(counter) = session.page.behavior::<AnimatedCounter>(counter) {
        info!(display = counter.display(), "counter");
    }

    // Hover the card (client coordinates, after the 600px scroll)
    session.send(Event::Pointer(PointerEvent::Entered {
        target: card,
        x: 420.0,
        y: 500.0,
    }));
    for x in [500.0_f32, 560.0, 640.0, 700.0] {
        // Two moves per frame: the second one waits for the next window
        session.send(Event::Pointer(PointerEvent::Moved {
            target: card,
            x,
            y: 500.0,
        }));
        session.send(Event::Pointer(PointerEvent::Moved {
            target: card,
            x: x + 10.0,
            y: 500.0,
        }));
        session.run_for(FRAME_MS);
    }
    if let Some(tilt) = session.page.behavior::<TiltCard>(card) {
        info!(transform = %tilt.style(session.page.flags()).transform(), "card hovered");
    }
    session.send(Event::Pointer(PointerEvent::Left { target: card }));

    // Copy the email address
    let clipboard = MemoryClipboard::new();
    session
        .page
        .copy(email, &clipboard, session.at())
        .context("copying email")?;
    session.run_for(2_100);
    if let Some(button) = session.page.behavior::<CopyFeedback>(email) {
        info!(
            copied = button.is_copied(),
            "copy indicator after reset delay"
        );
    }

    // Narrow the window below the mobile breakpoint
    session.send(Event::Resize {
        width: 600.0,
        height: 900.0,
    });
    session.run_for(200);
    info!(tier = %session.page.tier(), "after resize");

    // Back to desktop width, then ask for reduced motion
    session.send(Event::Resize {
        width: 1440.0,
        height: 900.0,
    });
    session.run_for(200);
    session.environment.set_prefers_reduced_motion(true);
    session.send(Event::ReducedMotionChanged(true));
    info!(
        tier = %session.page.tier(),
        tilt_handlers = session.page.elements().has_pointer_handlers(card),
        "after reduced motion"
    );

    session.scroll_to(2_100.0);
    info!(frames = session.page.frame_count(), "session finished");
    Ok(())
}
