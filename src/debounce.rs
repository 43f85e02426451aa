//! Trailing-edge call debouncing
//!
//! A [`Debouncer`] coalesces bursts of calls into one: each [`Debouncer::call`]
//! cancels the previously scheduled invocation and starts the delay over, so
//! only the last call of a burst runs, `delay` after the burst went quiet.
//! Typical use is search-as-you-type or autosave triggers.
//!
//! The timer source is the tokio runtime: every `call` aborts the pending
//! timer task and spawns a new one, so a runtime context is required. The
//! debouncer itself is the only stateful piece of this crate; its state is
//! scoped to one instance and never shared.

use std::time::Duration;
use tokio::task::JoinHandle;

/// Coalesces calls so only the last one of a burst runs.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedules `action` to run after the configured delay, cancelling any
    /// previously scheduled action that has not fired yet.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime context.
    pub fn call<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            tracing::debug!("debounce: superseded pending call");
        }
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Drops the pending invocation, if any, without running it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a scheduled action has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
