//! # Timers and schedulers
//!
//! Everything time-based in Tarry goes through a [`Scheduler`]: "run this
//! callback after `delay`" and "cancel that callback". Two implementations
//! are provided:
//!
//! - [`ManualScheduler`] keeps virtual time that only moves when you call
//!   `advance`. Tests and simulations use it.
//! - [`EventLoop`] reads a [`Clock`] and fires whatever is due when the host
//!   loop calls `run_due`.
//!
//! Callbacks never run inside `schedule`, so a zero delay still lands on a
//! later turn.
//!
//! State machines never hold a raw [`TimerId`]. They own a [`TimerSlot`],
//! which keeps at most one registration alive and cancels it on re-arm and
//! on drop.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use web_time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

/// Opaque token for one scheduled callback. Ids are never reused by a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

pub type TimerCallback = Box<dyn FnOnce(TimerId)>;

pub trait Scheduler: 'static {
    /// Registers `callback` to run once `delay` has elapsed.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;
    /// Returns `true` if the registration was still pending.
    fn cancel(&self, id: TimerId) -> bool;
    /// Number of registrations that have neither fired nor been cancelled.
    fn pending(&self) -> usize;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub scheduled: u64,
    pub cancelled: u64,
    pub fired: u64,
}

/// Deadline offset for delays too long to represent. Such timers stay
/// pending until cancelled and never fire.
const NEVER: Duration = Duration::MAX;

/// Deadline-ordered registrations. Deadlines are offsets from the
/// scheduler's origin; ties fire in scheduling order.
#[derive(Default)]
struct TimerQueue {
    next_id: u64,
    queue: BTreeMap<(Duration, TimerId), TimerCallback>,
    deadlines: HashMap<TimerId, Duration>,
    stats: SchedulerStats,
}

impl TimerQueue {
    fn insert(&mut self, deadline: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((deadline, id), callback);
        self.deadlines.insert(id, deadline);
        self.stats.scheduled += 1;
        id
    }

    fn remove(&mut self, id: TimerId) -> bool {
        let Some(deadline) = self.deadlines.remove(&id) else {
            return false;
        };
        self.queue.remove(&(deadline, id));
        self.stats.cancelled += 1;
        true
    }

    fn pop_due(&mut self, now: Duration) -> Option<(TimerId, Duration, TimerCallback)> {
        let (&(deadline, _), _) = self.queue.first_key_value()?;
        if deadline > now || deadline == NEVER {
            return None;
        }
        let ((deadline, id), callback) = self.queue.pop_first()?;
        self.deadlines.remove(&id);
        self.stats.fired += 1;
        Some((id, deadline, callback))
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.queue
            .first_key_value()
            .map(|(&(deadline, _), _)| deadline)
            .filter(|&deadline| deadline != NEVER)
    }
}

/// Scheduler over virtual time.
///
/// ```rust
/// use std::rc::Rc;
/// use tarry_core::*;
/// use web_time::Duration;
///
/// let sched = Rc::new(ManualScheduler::new());
/// let spinner = DelayedReveal::new(sched.clone(), Duration::from_millis(200));
/// sched.advance(Duration::from_millis(199));
/// assert!(!spinner.is_revealed());
/// sched.advance(Duration::from_millis(1));
/// assert!(spinner.is_revealed());
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    timers: RefCell<TimerQueue>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Moves time forward by `by`, firing every timer whose deadline falls
    /// inside the window in deadline order.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get().saturating_add(by);
        let fired = self.fire_until(target);
        self.now.set(target);
        fired
    }

    /// Fires timers already due at the current instant (zero-delay timers
    /// included) without moving time.
    pub fn run_pending(&self) -> usize {
        self.fire_until(self.now.get())
    }

    /// Jumps from deadline to deadline until nothing is queued.
    ///
    /// A callback that always re-arms itself keeps this running forever.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        loop {
            let next = self.timers.borrow().next_deadline();
            match next {
                Some(deadline) => fired += self.fire_until(deadline),
                None => return fired,
            }
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        self.timers.borrow().stats
    }

    fn fire_until(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            // Borrow released before the callback runs; callbacks re-arm.
            let due = self.timers.borrow_mut().pop_due(target);
            let Some((id, deadline, callback)) = due else {
                return fired;
            };
            self.now.set(deadline.max(self.now.get()));
            log::trace!("manual scheduler: firing {id:?} at {deadline:?}");
            callback(id);
            fired += 1;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let deadline = self.now.get().saturating_add(delay);
        self.timers.borrow_mut().insert(deadline, callback)
    }

    fn cancel(&self, id: TimerId) -> bool {
        self.timers.borrow_mut().remove(id)
    }

    fn pending(&self) -> usize {
        self.timers.borrow().deadlines.len()
    }
}

/// Real-time scheduler for a single-threaded host loop.
pub struct EventLoop {
    clock: Box<dyn Clock>,
    origin: Instant,
    timers: RefCell<TimerQueue>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let origin = clock.now();
        Self {
            clock,
            origin,
            timers: RefCell::new(TimerQueue::default()),
        }
    }

    fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.origin)
    }

    /// Fires every timer whose deadline has passed. Returns how many fired.
    pub fn run_due(&self) -> usize {
        let mut fired = 0;
        loop {
            let now = self.elapsed();
            let due = self.timers.borrow_mut().pop_due(now);
            let Some((id, _, callback)) = due else {
                return fired;
            };
            log::trace!("event loop: firing {id:?}");
            callback(id);
            fired += 1;
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers
            .borrow()
            .next_deadline()
            .and_then(|offset| self.origin.checked_add(offset))
    }

    /// Sleeps the current thread between deadlines until the queue drains.
    /// Only meaningful with a clock that follows wall time.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        loop {
            fired += self.run_due();
            let Some(at) = self.next_deadline() else {
                return fired;
            };
            let wait = at.saturating_duration_since(self.clock.now());
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        self.timers.borrow().stats
    }
}

impl Scheduler for EventLoop {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let deadline = self.elapsed().saturating_add(delay);
        self.timers.borrow_mut().insert(deadline, callback)
    }

    fn cancel(&self, id: TimerId) -> bool {
        self.timers.borrow_mut().remove(id)
    }

    fn pending(&self) -> usize {
        self.timers.borrow().deadlines.len()
    }
}

/// The timer handle owned by one state machine: holds at most one
/// outstanding registration on one scheduler.
pub struct TimerSlot {
    scheduler: Rc<dyn Scheduler>,
    held: Rc<Cell<Option<TimerId>>>,
}

impl TimerSlot {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            held: Rc::new(Cell::new(None)),
        }
    }

    /// Cancels the held registration, then schedules `callback`.
    pub fn arm(&self, delay: Duration, callback: impl FnOnce() + 'static) {
        self.cancel();
        let held: Weak<Cell<Option<TimerId>>> = Rc::downgrade(&self.held);
        let id = self.scheduler.schedule(
            delay,
            Box::new(move |fired| {
                // Clear first so the callback may re-arm the slot.
                if let Some(held) = held.upgrade()
                    && held.get() == Some(fired)
                {
                    held.set(None);
                }
                callback();
            }),
        );
        log::debug!("timer {id:?} armed for {delay:?}");
        self.held.set(Some(id));
    }

    /// Cancels the held registration. Returns whether one was pending; a
    /// slot that is empty, already fired, or already cancelled is a no-op.
    pub fn cancel(&self) -> bool {
        let Some(id) = self.held.take() else {
            return false;
        };
        let cancelled = self.scheduler.cancel(id);
        if cancelled {
            log::debug!("timer {id:?} cancelled");
        }
        cancelled
    }

    pub fn is_armed(&self) -> bool {
        self.held.get().is_some()
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
