//! # Composition locals
//!
//! Hooks find their collaborators through thread-local "composition locals"
//! rather than through arguments:
//!
//! - the [`Scheduler`] that arms their timers;
//! - the [`TimingConfig`] holding default delays.
//!
//! Override either for a subtree with `with_scheduler` / `with_timing`:
//!
//! ```rust
//! use std::rc::Rc;
//! use tarry_core::*;
//!
//! let sched = Rc::new(ManualScheduler::new());
//! with_scheduler(sched, || {
//!     assert!(scheduler().is_some());
//! });
//! assert!(scheduler().is_none());
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::TimingConfig;
use crate::timer::Scheduler;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = const { RefCell::new(Vec::new()) };
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        let mut st = st.borrow_mut();
        if let Some(top) = st.last_mut() {
            top.insert(t, v);
        } else {
            let mut m = HashMap::new();
            m.insert(t, v);
            st.push(m);
        }
    });
}

fn get_local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(v) = v.downcast_ref::<T>()
            {
                return Some(v.clone());
            }
        }
        None
    })
}

pub fn with_scheduler<R>(scheduler: Rc<dyn Scheduler>, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Rc<dyn Scheduler>>(), Box::new(scheduler));
        f()
    })
}

/// Innermost installed scheduler.
pub fn scheduler() -> Option<Rc<dyn Scheduler>> {
    get_local::<Rc<dyn Scheduler>>()
}

pub fn with_timing<R>(config: TimingConfig, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<TimingConfig>(), Box::new(config));
        f()
    })
}

pub fn timing() -> TimingConfig {
    get_local::<TimingConfig>().unwrap_or_default()
}
