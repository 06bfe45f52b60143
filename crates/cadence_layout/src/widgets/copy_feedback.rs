//! Copy-to-clipboard with a transient "copied" indicator

use std::time::Duration;

use cadence_core::{ElementId, Timeout, Timestamp};
use cadence_platform::{Clipboard, PlatformError};
use tracing::error;

use crate::element::{Behavior, FrameContext};

/// How long the indicator stays up
pub const DEFAULT_COPY_RESET: Duration = Duration::from_millis(2000);

#[derive(Clone, Debug)]
pub struct CopyFeedback {
    text: String,
    reset_after: Duration,
    copied: bool,
    reset: Timeout,
}

impl CopyFeedback {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reset_after: DEFAULT_COPY_RESET,
            copied: false,
            reset: Timeout::new(),
        }
    }

    pub fn with_reset_after(mut self, reset_after: Duration) -> Self {
        self.reset_after = reset_after;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    /// Write the text. Success raises the indicator; failure is logged and
    /// leaves it untouched.
    pub fn copy(&mut self, clipboard: &dyn Clipboard, now: Timestamp) -> Result<(), PlatformError> {
        if let Err(err) = clipboard.write_text(&self.text) {
            error!(%err, "failed to copy to clipboard");
            return Err(err);
        }
        self.copied = true;
        self.reset.arm(now, self.reset_after);
        Ok(())
    }

    /// Drop the indicator once its time is up. Returns `true` on change.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if self.reset.poll(now) {
            self.copied = false;
            return true;
        }
        false
    }
}

impl Behavior for CopyFeedback {
    fn on_frame(&mut self, _element: ElementId, cx: &FrameContext<'_>) -> bool {
        self.poll(cx.now)
    }

    fn has_pending(&self) -> bool {
        self.reset.is_armed()
    }
}
