use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Log,
}

impl From<&Level> for ConsoleMethod {
    fn from(level: &Level) -> Self {
        if *level == Level::ERROR {
            ConsoleMethod::Error
        } else if *level == Level::WARN {
            ConsoleMethod::Warn
        } else {
            ConsoleMethod::Log
        }
    }
}

/// Buffers one formatted event and hands it to the browser console on drop.
struct ConsoleWriter {
    method: ConsoleMethod,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(method: ConsoleMethod) -> Self {
        Self {
            method,
            buf: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        let value = JsValue::from_str(line);
        match self.method {
            ConsoleMethod::Error => web_sys::console::error_1(&value),
            ConsoleMethod::Warn => web_sys::console::warn_1(&value),
            ConsoleMethod::Log => web_sys::console::log_1(&value),
        }
    }
}

/// Picks the console method from the event's level rather than its text.
struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::Log)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::from(meta.level()))
    }
}

pub fn init() {
    // No wall clock through std on wasm32, so events carry no timestamp.
    let result = tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_max_level(Level::INFO)
        .with_writer(Console)
        .try_init();
    if let Err(err) = result {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "logging already initialised: {err}"
        )));
    }
}
