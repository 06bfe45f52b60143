//! Clipboard access

use std::cell::{Cell, RefCell};

use crate::error::{PlatformError, Result};

/// Write-only clipboard
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

impl<C: Clipboard + ?Sized> Clipboard for std::rc::Rc<C> {
    fn write_text(&self, text: &str) -> Result<()> {
        (**self).write_text(text)
    }
}

/// In-process clipboard, optionally rigged to fail
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: RefCell<Option<String>>,
    fail: Cell<bool>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (models a denied permission)
    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.fail.get() {
            return Err(PlatformError::Clipboard("write permission denied".into()));
        }
        *self.contents.borrow_mut() = Some(text.to_owned());
        Ok(())
    }
}
