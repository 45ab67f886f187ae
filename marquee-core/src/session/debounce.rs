//! Trailing-edge debounce timer.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Owned, cancellable debounce timer.
///
/// At most one action is pending. Scheduling a new action aborts the pending
/// one, so a burst of calls runs only the last action, `delay` after the
/// last call. There is no leading-edge fire and no maximum wait.
///
/// Only the wait is cancellable: once the delay elapses the action runs to
/// completion, so actions that start long work should spawn it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `action` after the quiet period, replacing any pending action.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Cancels the pending action. Returns true if one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(timer) => {
                let waiting = !timer.is_finished();
                timer.abort();
                waiting
            }
            None => false,
        }
    }

    /// True while an action is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.get_mut().take() {
            timer.abort();
        }
    }
}
