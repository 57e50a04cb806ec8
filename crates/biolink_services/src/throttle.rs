//! Rate limiting for high-frequency UI events

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::{Scheduler, TaskHandle};

/// Leading-edge throttle.
///
/// The first call in a quiet period is admitted and closes the gate; the gate
/// reopens `limit` later. Calls made while the gate is closed are dropped, not
/// queued.
pub struct Throttle {
    scheduler: Rc<dyn Scheduler>,
    limit: Duration,
    /// Reopen timer, present while the gate is closed.
    reopen: Rc<Cell<Option<TaskHandle>>>,
}

impl Throttle {
    pub fn new(scheduler: Rc<dyn Scheduler>, limit: Duration) -> Self {
        Self {
            scheduler,
            limit,
            reopen: Rc::new(Cell::new(None)),
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn is_open(&self) -> bool {
        self.reopen.get().is_none()
    }

    /// Admit the caller if the gate is open, closing it for `limit`.
    pub fn try_acquire(&self) -> bool {
        if !self.is_open() {
            return false;
        }

        let reopen = Rc::downgrade(&self.reopen);
        let handle = self.scheduler.schedule_after(
            self.limit,
            Box::new(move || {
                if let Some(reopen) = reopen.upgrade() {
                    reopen.set(None);
                }
            }),
        );
        self.reopen.set(Some(handle));
        true
    }

    /// Run `f` if admitted. Returns whether it ran.
    pub fn call(&self, f: impl FnOnce()) -> bool {
        if self.try_acquire() {
            f();
            true
        } else {
            false
        }
    }

    /// Clear the reopen timer and open the gate.
    pub fn cancel(&self) {
        if let Some(handle) = self.reopen.take() {
            self.scheduler.cancel(handle);
        }
    }
}

/// Trailing-edge debounce: only the last call in a burst runs, `delay` after
/// that call.
pub struct Debounce {
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
    pending: Rc<Cell<Option<TaskHandle>>>,
}

impl Debounce {
    pub fn new(scheduler: Rc<dyn Scheduler>, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: Rc::new(Cell::new(None)),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Replace any pending call with `f`.
    pub fn call(&self, f: impl FnOnce() + 'static) {
        self.cancel();

        let pending = Rc::downgrade(&self.pending);
        let handle = self.scheduler.schedule_after(
            self.delay,
            Box::new(move || {
                if let Some(pending) = pending.upgrade() {
                    pending.set(None);
                }
                f();
            }),
        );
        self.pending.set(Some(handle));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}
