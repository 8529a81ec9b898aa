//! clickaway-web: DOM boundary for clickaway.
//!
//! This crate provides:
//! - `DomPlatform`, the `clickaway_core::Platform` implementation over
//!   `web-sys` (document capture listeners, `Node.contains`, `setTimeout`)
//! - JavaScript bindings (`attachClickAway`, `initLogging`)
//! - Console logging setup for `tracing`
//!
//! ## Module Structure
//!
//! - `error` - Common error types
//! - `dom` - Platform implementation
//! - `bindings` - wasm-bindgen exports
//! - `logging` - Console subscriber

mod bindings;
mod dom;
mod error;
mod logging;

// Re-export error types
pub use error::{WebError, WebResult};

// Re-export the platform
pub use dom::{DomEvent, DomListener, DomPlatform, DomTimer};

// Re-export JS bindings
pub use bindings::{attach_click_away, init_logging_js, ClickAwayHandle};

// Re-export logging
pub use logging::{init_logging, ConsoleMakeWriter, ConsoleWriter};
