use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::scope::Scope;

thread_local! {
    static CURRENT: RefCell<Option<Rc<CompositionInner>>> = const { RefCell::new(None) };
}

#[derive(Default)]
struct Composer {
    keyed_slots: HashMap<String, Box<dyn Any>>,
}

struct CompositionInner {
    composer: RefCell<Composer>,
    scope: RefCell<Option<Scope>>,
    invalid: Rc<Cell<bool>>,
}

/// One render scope: remembered values, a teardown scope, and a dirty flag.
///
/// Every instance a hook creates during [`Composition::render`] lives until
/// [`Composition::dispose`] (or drop), which cancels their timers.
pub struct Composition {
    inner: Rc<CompositionInner>,
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

impl Composition {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(CompositionInner {
                composer: RefCell::new(Composer::default()),
                scope: RefCell::new(Some(Scope::new())),
                invalid: Rc::new(Cell::new(true)),
            }),
        }
    }

    /// Runs one render pass. Clears the dirty flag before `f` runs.
    pub fn render<R>(&self, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<Rc<CompositionInner>>);
        impl Drop for Restore {
            fn drop(&mut self) {
                let prev = self.0.take();
                CURRENT.with(|c| *c.borrow_mut() = prev);
            }
        }

        let scope = self.inner.scope.borrow().clone();
        let Some(scope) = scope else {
            log::warn!("render on a disposed composition");
            // Hooks inside `f` must not attach to an enclosing composition.
            let prev = CURRENT.with(|c| c.borrow_mut().take());
            let _restore = Restore(prev);
            return Scope::detached(f);
        };

        self.inner.invalid.set(false);

        let prev = CURRENT.with(|c| c.borrow_mut().replace(self.inner.clone()));
        let _restore = Restore(prev);
        scope.run(f)
    }

    pub fn needs_render(&self) -> bool {
        self.inner.invalid.get()
    }

    /// Returns the dirty flag and clears it.
    pub fn take_invalidation(&self) -> bool {
        self.inner.invalid.replace(false)
    }

    pub fn invalidator(&self) -> Invalidator {
        Invalidator(Rc::downgrade(&self.inner.invalid))
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.scope.borrow().is_none()
    }

    /// Runs all teardown work and drops remembered state. Idempotent.
    pub fn dispose(&self) {
        let Some(scope) = self.inner.scope.borrow_mut().take() else {
            return;
        };
        log::debug!("disposing composition");
        scope.dispose();

        // Dropped outside the borrow: slot destructors cancel timers.
        let composer = std::mem::take(&mut *self.inner.composer.borrow_mut());
        drop(composer);
    }
}

impl Drop for Composition {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Marks a composition as needing a render. Holds the flag weakly, so it is
/// inert once the composition is gone.
#[derive(Clone)]
pub struct Invalidator(Weak<Cell<bool>>);

impl Invalidator {
    pub fn invalidate(&self) {
        if let Some(flag) = self.0.upgrade() {
            flag.set(true);
        }
    }
}

/// Invalidator for the composition currently rendering, if any.
pub fn invalidator() -> Option<Invalidator> {
    CURRENT.with(|c| {
        c.borrow()
            .as_ref()
            .map(|inner| Invalidator(Rc::downgrade(&inner.invalid)))
    })
}

fn current() -> Option<Rc<CompositionInner>> {
    CURRENT.with(|c| c.borrow().clone())
}

/// Returns the value remembered under `key` in the current composition,
/// creating it with `init` on first use. Outside a composition the value is
/// created fresh every call.
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let Some(comp) = current() else {
        log::warn!("remember_with_key('{key}') outside of a composition; value is not retained");
        return Rc::new(init());
    };

    {
        let c = comp.composer.borrow();
        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            }
            log::warn!(
                "remember_with_key: key '{}' reused with a different type; replacing.",
                key
            );
        }
    }

    let rc: Rc<T> = Rc::new(init());
    let replaced = comp
        .composer
        .borrow_mut()
        .keyed_slots
        .insert(key, Box::new(rc.clone()));
    drop(replaced);
    rc
}
