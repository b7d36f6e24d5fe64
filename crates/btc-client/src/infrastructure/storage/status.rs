//! User-facing status lines emitted by a verbose [`super::ConfigStore::load`].
//!
//! Diagnostics (errors with their full cause) always go through `tracing`.
//! Status lines are the short progress messages the client shows on start
//! ("Settings loaded."), and are routed through a [`StatusSink`] so the
//! embedding application decides where they end up.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

/// Receives status lines from the settings store.
pub trait StatusSink {
    fn status(&self, message: &str);
}

/// Forwards status lines to `tracing` at `INFO`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn status(&self, message: &str) {
        info!(target: "btc_client::status", "{message}");
    }
}

/// Keeps every status line in memory.  Clones share the same buffer, so a
/// test can hand one clone to the store and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingStatus {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl StatusSink for RecordingStatus {
    fn status(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_owned());
    }
}
