//! Delayed reveal: a flag that turns `true` once, some time after creation.
//!
//! Used to keep spinners and skeleton pages from flashing on fast loads.

use std::cell::Cell;
use std::rc::Rc;

use web_time::Duration;

use crate::error::{ConfigError, millis};
use crate::signal::{ReadSignal, Signal, signal};
use crate::timer::{Scheduler, TimerSlot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Revealed,
    Destroyed,
}

pub struct DelayedReveal {
    inner: Rc<RevealInner>,
    delay: Duration,
}

struct RevealInner {
    revealed: Signal<bool>,
    timer: TimerSlot,
    destroyed: Cell<bool>,
}

impl RevealInner {
    fn reveal(&self) {
        if self.destroyed.get() {
            return;
        }
        log::debug!("delayed reveal: revealed");
        self.revealed.set(true);
    }
}

impl DelayedReveal {
    /// Starts hidden and arms a single timer for `delay`.
    pub fn new(scheduler: Rc<dyn Scheduler>, delay: Duration) -> Self {
        let inner = Rc::new(RevealInner {
            revealed: signal(false),
            timer: TimerSlot::new(scheduler),
            destroyed: Cell::new(false),
        });
        let weak = Rc::downgrade(&inner);
        inner.timer.arm(delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.reveal();
            }
        });
        Self { inner, delay }
    }

    /// Like [`DelayedReveal::new`] but from signed milliseconds; negative
    /// delays are rejected.
    pub fn create(scheduler: Rc<dyn Scheduler>, delay_ms: i64) -> Result<Self, ConfigError> {
        Ok(Self::new(scheduler, millis("delay_ms", delay_ms)?))
    }

    pub fn is_revealed(&self) -> bool {
        self.inner.revealed.get()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> RevealState {
        if self.inner.destroyed.get() {
            RevealState::Destroyed
        } else if self.inner.revealed.get() {
            RevealState::Revealed
        } else {
            RevealState::Pending
        }
    }

    pub fn revealed_signal(&self) -> ReadSignal<bool> {
        self.inner.revealed.read_only()
    }

    /// Cancels the pending timer, if any. Safe to call repeatedly.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        if self.inner.timer.cancel() {
            log::debug!("delayed reveal destroyed before {:?} elapsed", self.delay);
        }
    }
}

impl Drop for DelayedReveal {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_hidden_until_delay_elapses() {
        let sched = Rc::new(ManualScheduler::new());
        let r = DelayedReveal::create(sched.clone(), 200).unwrap();
        assert!(!r.is_revealed());
        assert_eq!(r.state(), RevealState::Pending);

        sched.advance(ms(199));
        assert!(!r.is_revealed());
        sched.advance(ms(1));
        assert!(r.is_revealed());
        assert_eq!(r.state(), RevealState::Revealed);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_zero_delay_reveals_on_next_turn() {
        let sched = Rc::new(ManualScheduler::new());
        let r = DelayedReveal::new(sched.clone(), Duration::ZERO);
        assert!(!r.is_revealed());
        sched.run_pending();
        assert!(r.is_revealed());
    }

    #[test]
    fn test_negative_delay_rejected() {
        let sched = Rc::new(ManualScheduler::new());
        let err = DelayedReveal::create(sched.clone(), -1).err();
        assert_eq!(
            err,
            Some(ConfigError::NegativeDuration {
                field: "delay_ms",
                value: -1
            })
        );
        assert_eq!(sched.stats().scheduled, 0);
    }

    #[test]
    fn test_destroy_before_expiry() {
        let sched = Rc::new(ManualScheduler::new());
        let r = DelayedReveal::new(sched.clone(), ms(200));
        sched.advance(ms(50));
        r.destroy();
        assert_eq!(r.state(), RevealState::Destroyed);

        assert_eq!(sched.advance(ms(500)), 0);
        assert!(!r.is_revealed());
        assert_eq!(sched.stats().cancelled, 1);
    }

    #[test]
    fn test_destroy_twice_cancels_once() {
        let sched = Rc::new(ManualScheduler::new());
        let r = DelayedReveal::new(sched.clone(), ms(10));
        r.destroy();
        r.destroy();
        drop(r);
        assert_eq!(sched.stats().cancelled, 1);
    }

    #[test]
    fn test_destroy_after_reveal_cancels_nothing() {
        let sched = Rc::new(ManualScheduler::new());
        let r = DelayedReveal::new(sched.clone(), ms(10));
        sched.advance(ms(10));
        r.destroy();
        assert_eq!(sched.stats().cancelled, 0);
        assert!(r.is_revealed());
    }

    #[test]
    fn test_drop_cancels() {
        let sched = Rc::new(ManualScheduler::new());
        drop(DelayedReveal::new(sched.clone(), ms(10)));
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.advance(ms(20)), 0);
    }

    #[test]
    fn test_subscriber_unsubscribes_itself_on_reveal() {
        let sched = Rc::new(ManualScheduler::new());
        let r = DelayedReveal::new(sched.clone(), ms(10));
        let sig = r.revealed_signal();
        let own_id = Rc::new(Cell::new(None));
        let seen = Rc::new(Cell::new(0));
        let id = {
            let handle = sig.clone();
            let own_id = own_id.clone();
            let seen = seen.clone();
            sig.subscribe(move |_| {
                seen.set(seen.get() + 1);
                if let Some(id) = own_id.get() {
                    handle.unsubscribe(id);
                }
            })
        };
        own_id.set(Some(id));

        sched.advance(ms(10));
        assert!(r.is_revealed());
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_signal_notifies_once() {
        let sched = Rc::new(ManualScheduler::new());
        let r = DelayedReveal::new(sched.clone(), ms(5));
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        r.revealed_signal().subscribe(move |v| {
            assert!(*v);
            s.set(s.get() + 1);
        });
        sched.advance(ms(100));
        assert_eq!(seen.get(), 1);
    }
}
