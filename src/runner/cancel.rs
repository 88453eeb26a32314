//! Cooperative cancellation
//!
//! A `CancellationToken` is a one-shot flag shared between the engine and
//! an outside observer (typically a signal handler). The engine polls it
//! between actions and declines to start further work once it has fired; a
//! child process that is already running is left to finish on its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared one-shot cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    fired: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation; idempotent
    pub fn fire(&self) {
        self.fired.store(true, Ordering::SeqCst);
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}
