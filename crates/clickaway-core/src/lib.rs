//! clickaway-core: outside-interaction detection engine.
//!
//! Design goal: keep this crate platform-agnostic. The DOM binding lives in
//! `clickaway-web`; anything that can deliver events, answer tree queries and
//! run timers can host a session through [`Platform`].
//!
//! ## Module Structure
//!
//! - `event` - Event classification into pointer/touch/focus/keyboard groups
//! - `region` - Watched/excluded region handles and the containment check
//! - `tolerance` - Pointer movement tolerance
//! - `debounce` - Debounce gate (single pending dispatch)
//! - `session` - Lifecycle state machine and the decision engine
//! - `listener` - Container and attachment entry points
//! - `options` - Serializable listener options
//! - `sim` - In-memory platform for deterministic tests

mod debounce;
mod error;
mod event;
mod listener;
mod options;
mod platform;
mod region;
mod session;
mod tolerance;

pub mod sim;

pub use debounce::{DebounceGate, Ticket};
pub use error::{ConfigError, ConfigResult};
pub use event::{EventGroup, InputEvent, Point, RawEvent};
pub use listener::{use_click_away, ClickAwayGuard, ClickAwayListener};
pub use options::{ClickAwayConfig, EventConfig, ListenerOptions};
pub use platform::{DocumentTree, EventHandler, Platform, Task};
pub use region::{is_contained, locate, Containment, RegionRef};
pub use session::{AwayCallback, ClickAway, LifecycleState, Suppression, Verdict};
pub use tolerance::ToleranceFilter;
