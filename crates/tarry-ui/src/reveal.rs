use std::cell::Cell;

use tarry_core::{DelayedReveal, millis, remember_with_key, scheduler, timing};
use web_time::Duration;

use crate::error::HookError;
use crate::slot::{invalidate_on_change, keyed_slot};

fn create_reveal(delay: Duration) -> Result<DelayedReveal, HookError> {
    let sched = scheduler().ok_or(HookError::NoScheduler)?;
    let reveal = DelayedReveal::new(sched, delay);
    invalidate_on_change(&reveal.revealed_signal());
    Ok(reveal)
}

/// `false` until `delay` has passed since this call site first rendered.
///
/// Changing `delay` starts over with a fresh reveal.
pub fn delayed_reveal(key: impl Into<String>, delay: Duration) -> Result<bool, HookError> {
    let slot = keyed_slot::<Duration, DelayedReveal>(format!("reveal:{}", key.into()));
    let (reveal, _) = slot.get_or_create(delay, |&delay| create_reveal(delay))?;
    Ok(reveal.is_revealed())
}

/// [`delayed_reveal`] with a signed millisecond delay, as props carry it.
pub fn delayed_reveal_ms(key: impl Into<String>, delay_ms: i64) -> Result<bool, HookError> {
    delayed_reveal(key, millis("delay_ms", delay_ms)?)
}

/// Spinner gating: while `loading`, visible only once the configured reveal
/// delay has passed. Each loading episode waits afresh.
pub fn loading_indicator_visible(
    key: impl Into<String>,
    loading: bool,
) -> Result<bool, HookError> {
    let key = key.into();
    let episode = remember_with_key(format!("loading:{key}:episode"), || {
        Cell::new((false, 0u64))
    });
    let slot = keyed_slot::<(u64, Duration), DelayedReveal>(format!("loading:{key}"));

    let (was_loading, mut count) = episode.get();
    if !loading {
        if was_loading {
            log::debug!("loading '{key}' finished");
        }
        episode.set((false, count));
        slot.release();
        return Ok(false);
    }
    if !was_loading {
        count += 1;
        episode.set((true, count));
    }

    let delay = timing().reveal_delay;
    let (reveal, _) = slot.get_or_create((count, delay), |&(_, delay)| create_reveal(delay))?;
    Ok(reveal.is_revealed())
}
