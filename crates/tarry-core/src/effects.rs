//! Teardown handles. Hooks register one with the rendering scope so the
//! timers they own are cancelled when the composition goes away.

use std::cell::RefCell;
use std::rc::Rc;

use crate::scope::current_scope;

type Teardown = Box<dyn FnOnce()>;

/// Shared, run-once teardown. Clones refer to the same work.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Teardown>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Runs the teardown the first time; later calls do nothing.
    pub fn run(&self) {
        let teardown = self.0.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }
}

/// Runs `setup` now and hands its teardown to the current scope.
///
/// Outside a scope nothing will run the teardown for you; the returned
/// handle is then the only way to trigger it.
pub fn effect<F>(setup: F) -> Dispose
where
    F: FnOnce() -> Dispose + 'static,
{
    let dispose = setup();
    match current_scope() {
        Some(scope) => {
            let registered = dispose.clone();
            scope.add_disposer(move || registered.run());
        }
        None => log::warn!("effect outside of a render scope; teardown is manual"),
    }
    dispose
}

pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}
