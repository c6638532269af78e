//! # Timers, reveals, and debounced values
//!
//! Tarry holds the timing behind a component library's loading affordances.
//! Components never touch timers directly; they own small state machines:
//!
//! - [`DelayedReveal`] — a flag that flips to `true` once, `delay` after
//!   creation. Spinners use it so fast loads never flash an indicator.
//! - [`DebouncedValue`] — the latest input that has stayed unchanged for a
//!   settle window. Color pickers use it so a drag commits one color.
//!
//! Both arm their timers through a [`Scheduler`] and own them through a
//! [`TimerSlot`], so re-arming cancels the previous registration and
//! dropping (or `destroy`) cancels the outstanding one.
//!
//! ```rust
//! use std::rc::Rc;
//! use tarry_core::*;
//! use web_time::Duration;
//!
//! let sched = Rc::new(ManualScheduler::new());
//! let color = DebouncedValue::new(sched.clone(), "red", Duration::from_millis(100));
//!
//! color.update("green");
//! color.update("blue");
//! sched.advance(Duration::from_millis(100));
//! assert_eq!(color.current(), "blue");
//! ```
//!
//! ## Render scopes
//!
//! Hooks in `tarry-ui` create these per [`Composition`].
//! [`remember_with_key`] keeps the instance across renders, an [`effect`]
//! hands its teardown to the composition's [`Scope`], and an
//! [`Invalidator`] marks the composition dirty when a value changes.
//!
//! ```rust
//! use std::rc::Rc;
//! use tarry_core::*;
//! use web_time::Duration;
//!
//! let sched = Rc::new(ManualScheduler::new());
//! let comp = Composition::new();
//! comp.render(|| {
//!     let spinner = remember_with_key("spinner", || {
//!         DelayedReveal::new(sched.clone(), Duration::from_millis(200))
//!     });
//!     let weak = Rc::downgrade(&spinner);
//!     effect(move || {
//!         on_unmount(move || {
//!             if let Some(spinner) = weak.upgrade() {
//!                 spinner.destroy();
//!             }
//!         })
//!     });
//! });
//! assert_eq!(sched.pending(), 1);
//! comp.dispose();
//! assert_eq!(sched.pending(), 0);
//! ```

pub mod clock;
pub mod color;
pub mod config;
pub mod debounce;
pub mod effects;
pub mod error;
pub mod locals;
pub mod prelude;
pub mod reveal;
pub mod runtime;
pub mod scope;
pub mod signal;
pub mod timer;


pub use clock::*;
pub use color::*;
pub use config::*;
pub use debounce::*;
pub use effects::*;
pub use error::*;
pub use locals::*;
pub use reveal::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
pub use timer::*;
