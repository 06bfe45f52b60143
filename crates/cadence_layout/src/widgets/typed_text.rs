//! Terminal-style typing effect
//!
//! Characters appear in ticks. Under simplified effects ticks come twice as
//! fast and carry three characters. With animations disabled the whole
//! string is shown at once and the completion callback follows shortly.

use std::fmt;
use std::time::Duration;

use cadence_core::{ElementId, PerformanceFlags, Timeout, Timestamp};
use tracing::trace;

use crate::element::{Behavior, FrameContext};

/// Delay between the last character and the completion callback
const COMPLETE_DELAY: Duration = Duration::from_millis(500);

/// Completion delay when the text was shown without typing
const INSTANT_COMPLETE_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypedTextConfig {
    /// Time between ticks
    pub typing_speed: Duration,
    /// Characters revealed per tick
    pub chars_per_tick: usize,
    pub start_delay: Duration,
    pub show_cursor: bool,
}

impl Default for TypedTextConfig {
    fn default() -> Self {
        Self {
            typing_speed: Duration::from_millis(50),
            chars_per_tick: 1,
            start_delay: Duration::ZERO,
            show_cursor: true,
        }
    }
}

impl TypedTextConfig {
    /// Tick interval under the given flags
    pub fn interval(&self, flags: &PerformanceFlags) -> Duration {
        if flags.use_simplified_effects {
            self.typing_speed / 2
        } else {
            self.typing_speed
        }
    }

    /// Characters per tick under the given flags
    pub fn step(&self, flags: &PerformanceFlags) -> usize {
        if flags.use_simplified_effects {
            3
        } else {
            self.chars_per_tick.max(1)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingPhase {
    /// Not started
    Idle,
    /// Waiting out the start delay
    Delayed,
    Typing,
    /// All text shown, completion callback pending
    Finishing,
    Complete,
}

type CompleteCallback = Box<dyn FnMut()>;

pub struct TypedText {
    text: String,
    len: usize,
    shown: usize,
    config: TypedTextConfig,
    phase: TypingPhase,
    tick: Timeout,
    finish: Timeout,
    on_complete: Option<CompleteCallback>,
}

impl TypedText {
    pub fn new(text: impl Into<String>, config: TypedTextConfig) -> Self {
        let text = text.into();
        Self {
            len: text.chars().count(),
            text,
            shown: 0,
            config,
            phase: TypingPhase::Idle,
            tick: Timeout::new(),
            finish: Timeout::new(),
            on_complete: None,
        }
    }

    pub fn with_on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    /// The prefix revealed so far
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.shown) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.phase == TypingPhase::Typing && self.shown < self.len
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TypingPhase::Complete
    }

    pub fn cursor_visible(&self, flags: &PerformanceFlags) -> bool {
        self.config.show_cursor && flags.enabled && self.is_typing()
    }

    /// Begin typing at `now`
    pub fn start(&mut self, now: Timestamp, flags: &PerformanceFlags) {
        self.tick.cancel();
        self.finish.cancel();
        self.shown = 0;

        if !flags.enabled {
            self.show_all(now);
        } else if !self.config.start_delay.is_zero() {
            self.phase = TypingPhase::Delayed;
            self.tick.arm(now, self.config.start_delay);
        } else {
            self.begin_typing(now, flags);
        }
    }

    /// Replace the text. Progress restarts and pending timers are dropped.
    pub fn set_text(&mut self, text: impl Into<String>, now: Timestamp, flags: &PerformanceFlags) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.len = text.chars().count();
        self.text = text;
        self.start(now, flags);
    }

    /// Process due deadlines. Returns `true` if the visible output changed.
    pub fn poll(&mut self, now: Timestamp, flags: &PerformanceFlags) -> bool {
        let before = (self.shown, self.phase);

        // Animations switched off mid-way: finish instantly
        if !flags.enabled && matches!(self.phase, TypingPhase::Delayed | TypingPhase::Typing) {
            self.show_all(now);
        }

        loop {
            match self.phase {
                TypingPhase::Idle | TypingPhase::Complete => break,
                TypingPhase::Delayed => {
                    let Some(due) = self.tick.deadline() else { break };
                    if !self.tick.poll(now) {
                        break;
                    }
                    self.begin_typing(due, flags);
                }
                TypingPhase::Typing => {
                    let Some(due) = self.tick.deadline() else { break };
                    if !self.tick.poll(now) {
                        break;
                    }
                    self.shown = (self.shown + self.config.step(flags)).min(self.len);
                    if self.shown >= self.len {
                        self.phase = TypingPhase::Finishing;
                        self.finish.arm(due, COMPLETE_DELAY);
                    } else {
                        self.tick.arm(due, self.config.interval(flags));
                    }
                }
                TypingPhase::Finishing => {
                    if !self.finish.poll(now) {
                        break;
                    }
                    self.phase = TypingPhase::Complete;
                    trace!(len = self.len, "typing complete");
                    if let Some(callback) = self.on_complete.as_mut() {
                        callback();
                    }
                }
            }
        }

        before != (self.shown, self.phase)
    }

    fn begin_typing(&mut self, now: Timestamp, flags: &PerformanceFlags) {
        if self.len == 0 {
            self.phase = TypingPhase::Finishing;
            self.finish.arm(now, COMPLETE_DELAY);
        } else {
            self.phase = TypingPhase::Typing;
            self.tick.arm(now, self.config.interval(flags));
        }
    }

    fn show_all(&mut self, now: Timestamp) {
        self.tick.cancel();
        self.shown = self.len;
        self.phase = TypingPhase::Finishing;
        self.finish.arm(now, INSTANT_COMPLETE_DELAY);
    }
}

impl fmt::Debug for TypedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedText")
            .field("text", &self.text)
            .field("shown", &self.shown)
            .field("phase", &self.phase)
            .field("config", &self.config)
            .finish()
    }
}

impl Behavior for TypedText {
    fn on_frame(&mut self, _element: ElementId, cx: &FrameContext<'_>) -> bool {
        if self.phase == TypingPhase::Idle {
            self.start(cx.now, cx.flags);
            self.poll(cx.now, cx.flags);
            return true;
        }
        self.poll(cx.now, cx.flags)
    }

    fn has_pending(&self) -> bool {
        // Idle text starts on its first frame
        self.phase != TypingPhase::Complete
    }
}
