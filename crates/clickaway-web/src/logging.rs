//! Logging setup for the browser.
//!
//! `tracing` output is formatted by `tracing-subscriber` and forwarded line by
//! line to `console.log`. There is no clock in `wasm32-unknown-unknown`, so
//! timestamps are left to the devtools console.

use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::JsValue;

const DEFAULT_FILTER: &str = "clickaway_core=info,clickaway_web=info";

/// Buffers one formatted record and writes it to the console on flush/drop.
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(line) = take_line(&mut self.buf) {
            web_sys::console::log_1(&JsValue::from_str(&line));
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buf: Vec::new() }
    }
}

/// Drain the buffer into a line without its trailing newline.
fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    if buf.is_empty() {
        return None;
    }
    let line = String::from_utf8_lossy(buf).trim_end().to_string();
    buf.clear();
    Some(line)
}

/// Parse a filter directive, falling back to the crate defaults.
fn parse_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a console subscriber. Safe to call more than once.
pub fn init_logging(directives: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(parse_filter(directives.unwrap_or(DEFAULT_FILTER)))
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .with_target(true)
        .without_time()
        .try_init();
}
