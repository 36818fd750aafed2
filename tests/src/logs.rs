//! In-memory log capture for asserting on tracing output.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use telemetry::{build_subscriber, TracingConfig};
use tracing_subscriber::fmt::MakeWriter;

/// Shared buffer that a test subscriber writes formatted lines into.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with a plain-text subscriber at `filter` writing into this buffer.
    pub fn capture<T>(&self, filter: &str, f: impl FnOnce() -> T) -> T {
        let config = TracingConfig::new().with_filter(filter).with_ansi(false);
        let subscriber = build_subscriber(&config, self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Captured lines containing `needle`.
    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| l.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

pub struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buf: self.buf.clone(),
        }
    }
}
