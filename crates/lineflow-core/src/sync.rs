//! `ConcurrencyPrimitives`: a value guarded by a monitor, with the two
//! operations every completion signal in this workspace is built from.
//!
//! `Selector`, `Partitioner`, and `Merger` each track some piece of shared
//! state (a remaining-critical-routes count, an alive-producers count) that
//! one thread mutates and another thread blocks on. [`Guarded`] is that
//! pattern factored out once: [`Guarded::update_and_notify_all`] mutates
//! under the lock and wakes every waiter, and [`Guarded::wait_while`] blocks
//! while a predicate over the guarded value still holds.

use std::sync::{Condvar, Mutex};

/// A value of type `T` guarded by a single monitor.
pub struct Guarded<T> {
    state: Mutex<T>,
    changed: Condvar,
}

impl<T> Guarded<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: Mutex::new(initial),
            changed: Condvar::new(),
        }
    }

    /// Mutate the guarded value under its lock, then wake every thread
    /// waiting in [`Guarded::wait_while`].
    pub fn update_and_notify_all(&self, f: impl FnOnce(&mut T)) {
        let mut guard = self.state.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard);
        drop(guard);
        self.changed.notify_all();
    }

    /// Block the calling thread for as long as `pred` holds for the
    /// guarded value. Spurious wakeups are tolerated: the predicate is
    /// re-checked every time the condition variable wakes.
    pub fn wait_while(&self, mut pred: impl FnMut(&T) -> bool) {
        let guard = self.state.lock().unwrap_or_else(|p| p.into_inner());
        let _ = self
            .changed
            .wait_while(guard, |value| pred(value))
            .unwrap_or_else(|p| p.into_inner());
    }

    /// Read the guarded value under its lock without waiting.
    pub fn get<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.state.lock().unwrap_or_else(|p| p.into_inner());
        f(&guard)
    }
}
