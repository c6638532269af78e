use tarry_core::{ReadSignal, Signal, signal};

use crate::slot::{Instance, invalidate_on_change, keyed_slot};

/// Last error reported by a component, e.g. an avatar image that failed
/// to load. Cloning shares the same state.
#[derive(Clone)]
pub struct ErrorState {
    message: Signal<Option<String>>,
}

impl ErrorState {
    fn new() -> Self {
        Self {
            message: signal(None),
        }
    }

    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("error state set: {message}");
        self.message.set(Some(message));
    }

    pub fn set_error(&self, err: &dyn std::error::Error) {
        self.set(err.to_string());
    }

    pub fn clear(&self) {
        if self.message.with(Option::is_some) {
            self.message.set(None);
        }
    }

    pub fn has_error(&self) -> bool {
        self.message.with(Option::is_some)
    }

    pub fn message(&self) -> Option<String> {
        self.message.get()
    }

    pub fn signal(&self) -> ReadSignal<Option<String>> {
        self.message.read_only()
    }
}

impl Instance for ErrorState {
    fn destroy(&self) {}
}

/// Error state for one call site. A change in `source` (say, the image URL)
/// starts over with no error.
pub fn error_state<D>(key: impl Into<String>, source: D) -> ErrorState
where
    D: PartialEq + 'static,
{
    let slot = keyed_slot::<D, ErrorState>(format!("error:{}", key.into()));
    let (state, _) = slot.get_or_insert_with(source, |_| {
        let state = ErrorState::new();
        invalidate_on_change(&state.signal());
        state
    });
    ErrorState::clone(&state)
}
