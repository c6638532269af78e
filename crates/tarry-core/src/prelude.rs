pub use crate::clock::{Clock, SystemClock, TestClock};
pub use crate::color::Color;
pub use crate::config::{RawTimingConfig, TimingConfig};
pub use crate::debounce::{DebounceState, DebouncedValue};
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::error::ConfigError;
pub use crate::locals::{scheduler, timing, with_scheduler, with_timing};
pub use crate::reveal::{DelayedReveal, RevealState};
pub use crate::runtime::{Composition, Invalidator, invalidator, remember_with_key};
pub use crate::scope::{Scope, current_scope};
pub use crate::signal::{ReadSignal, Signal, signal};
pub use crate::timer::{EventLoop, ManualScheduler, Scheduler, TimerId, TimerSlot};
