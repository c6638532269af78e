use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::Duration;

use crate::error::{ConfigError, millis};
use crate::signal::{ReadSignal, Signal, signal};
use crate::timer::{Scheduler, TimerSlot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
    Destroyed,
}

/// Settles on the latest input once it has stayed unchanged for `settle`.
///
/// Earlier inputs inside the window are dropped, and equal inputs still
/// restart the window.
pub struct DebouncedValue<T: Clone + 'static> {
    inner: Rc<DebounceInner<T>>,
    settle: Duration,
}

struct DebounceInner<T: 'static> {
    current: Signal<T>,
    candidate: RefCell<Option<T>>,
    timer: TimerSlot,
    destroyed: Cell<bool>,
}

impl<T: Clone + 'static> DebounceInner<T> {
    fn commit(&self) {
        let next = self.candidate.borrow_mut().take();
        if let Some(v) = next {
            log::debug!("debounced value settled");
            self.current.set(v);
        }
    }
}

impl<T: Clone + 'static> DebouncedValue<T> {
    pub fn new(scheduler: Rc<dyn Scheduler>, initial: T, settle: Duration) -> Self {
        Self {
            inner: Rc::new(DebounceInner {
                current: signal(initial),
                candidate: RefCell::new(None),
                timer: TimerSlot::new(scheduler),
                destroyed: Cell::new(false),
            }),
            settle,
        }
    }

    pub fn create(
        scheduler: Rc<dyn Scheduler>,
        initial: T,
        settle_ms: i64,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(scheduler, initial, millis("settle_ms", settle_ms)?))
    }

    /// Replaces the candidate and restarts the settle window.
    pub fn update(&self, next: T) {
        if self.inner.destroyed.get() {
            log::warn!("update on a destroyed debounced value ignored");
            return;
        }
        *self.inner.candidate.borrow_mut() = Some(next);
        let weak = Rc::downgrade(&self.inner);
        self.inner.timer.arm(self.settle, move || {
            if let Some(inner) = weak.upgrade() {
                inner.commit();
            }
        });
    }

    /// Last settled value.
    pub fn current(&self) -> T {
        self.inner.current.get()
    }

    /// Candidate waiting for its window to close.
    pub fn pending(&self) -> Option<T> {
        self.inner.candidate.borrow().clone()
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn state(&self) -> DebounceState {
        if self.inner.destroyed.get() {
            DebounceState::Destroyed
        } else if self.inner.timer.is_armed() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    pub fn current_signal(&self) -> ReadSignal<T> {
        self.inner.current.read_only()
    }

    /// Cancels the outstanding timer and drops the candidate. Idempotent.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        if self.inner.timer.cancel() {
            log::debug!("debounced value destroyed with a pending candidate");
        }
        self.inner.candidate.borrow_mut().take();
    }
}

impl<T: Clone + 'static> Drop for DebouncedValue<T> {
    fn drop(&mut self) {
        self.destroy();
    }
}
