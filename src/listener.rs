//! Result delivery to the presentation layer
//!
//! A request's worker thread terminates by handing its result to the bound
//! listener. Listeners run on the worker thread, so they must not touch any
//! presentation state; the supported pattern is to enqueue the event and let
//! the UI loop drain the queue in its own idle phase. The blanket impl for
//! `mpsc::Sender` is exactly that: hand the core a sender clone, keep the
//! receiver on the UI thread, poll it once per loop iteration.

use std::sync::mpsc::Sender;

use crate::results::CoreEvent;

/// Receives exactly one [`CoreEvent`] per request it was bound to.
pub trait ResultListener: Send + 'static {
    /// Called from the request's worker thread when its result is ready.
    ///
    /// Implementations must only enqueue the event for the owning thread,
    /// never mutate shared state directly.
    fn on_result(&self, event: CoreEvent);
}

impl ResultListener for Sender<CoreEvent> {
    fn on_result(&self, event: CoreEvent) {
        // The receiver may already be gone during shutdown; the result is
        // simply dropped then.
        let _ = self.send(event);
    }
}
