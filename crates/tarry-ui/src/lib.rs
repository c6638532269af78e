//! Hooks that components call while rendering.
//!
//! Each hook keeps one instance per call-site key inside the current
//! [`Composition`](tarry_core::Composition), marks it dirty when the value it
//! exposes changes, and tears the instance down with the composition.
//!
//! ```rust
//! use std::rc::Rc;
//! use web_time::Duration;
//! use tarry_core::*;
//! use tarry_ui::*;
//!
//! let sched = Rc::new(ManualScheduler::new());
//! let comp = Composition::new();
//! let spinner = || {
//!     with_scheduler(sched.clone(), || comp.render(|| loading_indicator_visible("page", true)))
//! };
//!
//! assert_eq!(spinner(), Ok(false));
//! sched.advance(Duration::from_millis(200));
//! assert!(comp.needs_render());
//! assert_eq!(spinner(), Ok(true));
//! ```

pub mod debounce;
pub mod error;
pub mod error_state;
pub mod reveal;
pub mod slot;

pub use debounce::{debounced_color, debounced_value};
pub use error::HookError;
pub use error_state::{ErrorState, error_state};
pub use reveal::{delayed_reveal, delayed_reveal_ms, loading_indicator_visible};
