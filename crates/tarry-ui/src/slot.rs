use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tarry_core::{ReadSignal, effect, invalidator, on_unmount, remember_with_key};

/// Something a hook owns and must tear down with its render scope.
pub trait Instance: 'static {
    fn destroy(&self);
}

impl Instance for tarry_core::DelayedReveal {
    fn destroy(&self) {
        tarry_core::DelayedReveal::destroy(self)
    }
}

impl<T: Clone + 'static> Instance for tarry_core::DebouncedValue<T> {
    fn destroy(&self) {
        tarry_core::DebouncedValue::destroy(self)
    }
}

/// One hook instance per call site, re-created only when its config changes.
pub struct Keyed<K: 'static, T: Instance> {
    config: RefCell<Option<K>>,
    instance: RefCell<Option<Rc<T>>>,
    installed: Cell<bool>,
}

impl<K: PartialEq + 'static, T: Instance> Keyed<K, T> {
    /// Returns the live instance and whether it was just created. A config
    /// change destroys the previous instance once the new one exists.
    pub fn get_or_create<E>(
        &self,
        config: K,
        create: impl FnOnce(&K) -> Result<T, E>,
    ) -> Result<(Rc<T>, bool), E> {
        if let Some(existing) = self.live_for(&config) {
            return Ok((existing, false));
        }
        let created = create(&config)?;
        Ok((self.install(config, created), true))
    }

    /// Like [`Keyed::get_or_create`] for instances that cannot fail to build.
    pub fn get_or_insert_with(&self, config: K, create: impl FnOnce(&K) -> T) -> (Rc<T>, bool) {
        if let Some(existing) = self.live_for(&config) {
            return (existing, false);
        }
        let created = create(&config);
        (self.install(config, created), true)
    }

    /// Destroys the live instance, if any.
    pub fn release(&self) {
        self.config.borrow_mut().take();
        let old = self.instance.borrow_mut().take();
        if let Some(old) = old {
            old.destroy();
        }
    }

    fn live_for(&self, config: &K) -> Option<Rc<T>> {
        if self.config.borrow().as_ref() != Some(config) {
            return None;
        }
        self.instance.borrow().clone()
    }

    fn install(&self, config: K, instance: T) -> Rc<T> {
        let created = Rc::new(instance);
        let old = self.instance.borrow_mut().replace(created.clone());
        *self.config.borrow_mut() = Some(config);
        if let Some(old) = old {
            log::debug!("hook config changed; replacing instance");
            old.destroy();
        }
        created
    }
}

/// Keyed slot in the current composition whose instance is destroyed when
/// the composition's scope is disposed.
pub fn keyed_slot<K: PartialEq + 'static, T: Instance>(key: String) -> Rc<Keyed<K, T>> {
    let slot = remember_with_key(key, || Keyed::<K, T> {
        config: RefCell::new(None),
        instance: RefCell::new(None),
        installed: Cell::new(false),
    });

    // Install a single unmount disposer for this slot.
    if !slot.installed.replace(true) {
        let weak = Rc::downgrade(&slot);
        effect(move || {
            on_unmount(move || {
                if let Some(slot) = weak.upgrade() {
                    slot.release();
                }
            })
        });
    }
    slot
}

/// Re-render the current composition whenever `sig` changes.
pub(crate) fn invalidate_on_change<T>(sig: &ReadSignal<T>) {
    match invalidator() {
        Some(inv) => {
            sig.subscribe(move |_| inv.invalidate());
        }
        None => log::warn!("hook used outside of a composition; changes will not re-render"),
    }
}
