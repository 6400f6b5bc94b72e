//! Line output targets.
//!
//! Sinks write through an [`OutputTarget`]: standard output by default, or a
//! capturable in-memory buffer for tests and demos. Write failures are
//! swallowed — a broken output stream must never turn into a test failure.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// A shared, thread-safe destination for formatted lines.
#[derive(Clone)]
pub struct OutputTarget {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl OutputTarget {
    /// Target writing to the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    /// Target writing to an arbitrary writer.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Target writing to an in-memory buffer, plus a handle to read it back.
    #[must_use]
    pub fn capture() -> (Self, CapturedOutput) {
        let captured = CapturedOutput {
            buf: Arc::new(Mutex::new(Vec::new())),
        };
        let target = Self::from_writer(CaptureWriter {
            buf: Arc::clone(&captured.buf),
        });
        (target, captured)
    }

    /// Write one line, appending a newline. Errors are discarded.
    pub(crate) fn write_line(&self, line: &str) {
        if let Ok(mut w) = self.writer.lock() {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }
}

impl Default for OutputTarget {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputTarget").finish_non_exhaustive()
    }
}

/// Read handle for a capture target created by [`OutputTarget::capture`].
#[derive(Clone, Debug)]
pub struct CapturedOutput {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .map_or_else(|_| String::new(), |buf| String::from_utf8_lossy(&buf).into_owned())
    }

    /// Written output split into lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// True when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.lock().map_or(true, |buf| buf.is_empty())
    }
}

struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if let Ok(mut buf) = self.buf.lock() {
            buf.extend_from_slice(data);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
