//! Request-scoped view state with a mount flag.
//!
//! Views publish their state through a `watch` channel so a host can
//! re-render on change. Once a view is unmounted, late results from
//! in-flight provider calls are dropped instead of applied.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::debug;

/// Observable state owned by one mounted view.
pub struct ViewState<T> {
    view: &'static str,
    tx: watch::Sender<T>,
    mounted: AtomicBool,
}

impl<T: Clone> ViewState<T> {
    pub fn new(view: &'static str, initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            view,
            tx,
            mounted: AtomicBool::new(true),
        }
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Applies `f` unless the view is unmounted.
    ///
    /// Returns `None` when the update was discarded.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        if !self.is_mounted() {
            debug!(view = self.view, "Discarding update after unmount");
            return None;
        }

        let mut result = None;
        self.tx.send_modify(|state| result = Some(f(state)));
        result
    }
}
