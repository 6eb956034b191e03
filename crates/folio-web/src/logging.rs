#![forbid(unsafe_code)]

//! Console sink for `tracing-subscriber`'s fmt layer.
//!
//! Each formatted record is buffered and handed to the sink in a single call
//! when the writer drops, so one record never spans two console entries.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Receives one formatted record at its level.
pub type Sink = fn(Level, &str);

#[derive(Debug, Clone, Copy)]
pub struct LineMakeWriter {
    sink: Sink,
}

impl LineMakeWriter {
    #[must_use]
    pub const fn new(sink: Sink) -> Self {
        Self { sink }
    }

    fn writer(&self, level: Level) -> LineWriter {
        LineWriter {
            level,
            buf: Vec::new(),
            sink: self.sink,
        }
    }
}

pub struct LineWriter {
    level: Level,
    buf: Vec<u8>,
    sink: Sink,
}

impl io::Write for LineWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        let line = text.trim_end_matches('\n');
        if !line.is_empty() {
            (self.sink)(self.level, line);
        }
    }
}

impl<'a> MakeWriter<'a> for LineMakeWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        self.writer(*meta.level())
    }
}

#[cfg(target_arch = "wasm32")]
pub fn console_sink(level: Level, line: &str) {
    let line = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        Level::INFO => web_sys::console::info_1(&line),
        Level::DEBUG => web_sys::console::debug_1(&line),
        _ => web_sys::console::log_1(&line),
    }
}

/// Install the global subscriber. Later calls are ignored.
#[cfg(target_arch = "wasm32")]
pub fn init(level: &str) {
    // Options are validated before this runs; the fallback only covers
    // direct callers.
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_writer(LineMakeWriter::new(console_sink))
        .with_max_level(level)
        .without_time()
        .with_ansi(false)
        .try_init();
}
