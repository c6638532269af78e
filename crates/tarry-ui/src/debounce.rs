use std::cell::RefCell;

use tarry_core::{Color, DebouncedValue, remember_with_key, scheduler, timing};
use web_time::Duration;

use crate::error::HookError;
use crate::slot::{invalidate_on_change, keyed_slot};

/// Returns the last `value` that stayed unchanged for `settle`.
///
/// Each render whose `value` differs from the previous render's restarts
/// the window. Changing `settle` starts a new debouncer seeded with the
/// current input.
pub fn debounced_value<T>(
    key: impl Into<String>,
    value: T,
    settle: Duration,
) -> Result<T, HookError>
where
    T: Clone + PartialEq + 'static,
{
    let key = key.into();
    let last_input =
        remember_with_key(format!("debounce:{key}:input"), || RefCell::new(None::<T>));
    let slot = keyed_slot::<Duration, DebouncedValue<T>>(format!("debounce:{key}"));

    let (debounced, created) = slot.get_or_create(settle, |settle| {
        let sched = scheduler().ok_or(HookError::NoScheduler)?;
        let d = DebouncedValue::new(sched, value.clone(), *settle);
        invalidate_on_change(&d.current_signal());
        Ok::<_, HookError>(d)
    })?;

    let changed = last_input.borrow().as_ref() != Some(&value);
    if changed {
        if !created {
            debounced.update(value.clone());
        }
        *last_input.borrow_mut() = Some(value);
    }
    Ok(debounced.current())
}

/// Debounced color picker value, settled with the configured color window.
pub fn debounced_color(key: impl Into<String>, color: Color) -> Result<Color, HookError> {
    debounced_value(key, color, timing().color_settle)
}
