//! The buffered sink attached to one test.
//!
//! A [`BufferedSink`] starts attached, accepts entries from any thread, and
//! is detached exactly once at test end. In buffering mode lines accumulate
//! under a single mutex that also guards the drain in [`BufferedSink::flush`],
//! so an append racing a flush is either included in it, or deferred to the
//! buffer and discarded at detach — never lost mid-line, never duplicated.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::format::{LogEntry, format_entry};
use crate::output::OutputTarget;
use crate::rules::Rules;

/// A log-source attachment point scoped to one test execution.
#[derive(Debug)]
pub struct BufferedSink {
    rules: Rules,
    output: OutputTarget,
    buffer: Mutex<Vec<String>>,
    detached: AtomicBool,
}

impl BufferedSink {
    /// Sink writing to standard output.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self::with_output(rules, OutputTarget::stdout())
    }

    /// Sink writing to the given target.
    #[must_use]
    pub fn with_output(rules: Rules, output: OutputTarget) -> Self {
        Self {
            rules,
            output,
            buffer: Mutex::new(Vec::new()),
            detached: AtomicBool::new(false),
        }
    }

    /// The rules this sink was configured with.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Receive one log entry.
    ///
    /// Entries below the priority threshold are dropped. Kept lines are
    /// buffered when `log_only_when_test_fails` is set, written immediately
    /// otherwise. Calls arriving after [`detach`](Self::detach) are discarded
    /// without blocking.
    pub fn accept(&self, entry: &LogEntry<'_>) {
        if self.detached.load(Ordering::Acquire) {
            return;
        }
        let Some(line) = format_entry(&self.rules, entry) else {
            return;
        };
        if self.rules.log_only_when_test_fails {
            if let Ok(mut buffer) = self.buffer.lock() {
                // Re-check under the lock: a detach may have raced in and the
                // buffer contents are about to be discarded.
                if !self.detached.load(Ordering::Acquire) {
                    buffer.push(line);
                }
            }
        } else {
            self.output.write_line(&line);
        }
    }

    /// Drain the buffer in insertion order, writing each line.
    ///
    /// Idempotent: flushing an empty buffer is a no-op.
    pub fn flush(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            for line in buffer.drain(..) {
                self.output.write_line(&line);
            }
        }
    }

    /// Transition to the terminal detached state, discarding anything still
    /// buffered. Further [`accept`](Self::accept) calls become no-ops.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::Release);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }

    /// Whether the sink has been detached.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    /// Number of lines currently buffered.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.lock().map_or(0, |buffer| buffer.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Priority;

    fn entry<'a>(priority: Priority, message: &'a str) -> LogEntry<'a> {
        LogEntry {
            priority,
            tag: Some("sink"),
            message,
            error: None,
        }
    }

    fn buffering_rules() -> Rules {
        Rules {
            show_timestamp: false,
            ..Rules::default()
        }
    }

    #[test]
    fn buffering_mode_holds_lines_until_flush() {
        let (output, captured) = OutputTarget::capture();
        let sink = BufferedSink::with_output(buffering_rules(), output);

        sink.accept(&entry(Priority::Info, "one"));
        sink.accept(&entry(Priority::Warn, "two"));
        assert!(captured.is_empty());
        assert_eq!(sink.buffered_len(), 2);

        sink.flush();
        assert_eq!(captured.lines(), vec!["I/sink: one", "W/sink: two"]);
        assert_eq!(sink.buffered_len(), 0);
    }

    #[test]
    fn immediate_mode_writes_without_buffering() {
        let (output, captured) = OutputTarget::capture();
        let rules = Rules {
            show_timestamp: false,
            log_only_when_test_fails: false,
            ..Rules::default()
        };
        let sink = BufferedSink::with_output(rules, output);

        sink.accept(&entry(Priority::Debug, "live"));
        assert_eq!(captured.lines(), vec!["D/sink: live"]);
        assert_eq!(sink.buffered_len(), 0);
    }

    #[test]
    fn flush_is_idempotent() {
        let (output, captured) = OutputTarget::capture();
        let sink = BufferedSink::with_output(buffering_rules(), output);

        sink.accept(&entry(Priority::Info, "once"));
        sink.flush();
        sink.flush();

        assert_eq!(captured.lines(), vec!["I/sink: once"]);
    }

    #[test]
    fn filtered_entries_never_reach_the_buffer() {
        let (output, captured) = OutputTarget::capture();
        let rules = Rules {
            min_priority: Priority::Error,
            show_timestamp: false,
            ..Rules::default()
        };
        let sink = BufferedSink::with_output(rules, output);

        sink.accept(&entry(Priority::Info, "dropped"));
        sink.accept(&entry(Priority::Warn, "dropped too"));
        assert_eq!(sink.buffered_len(), 0);

        sink.flush();
        assert!(captured.is_empty());
    }

    #[test]
    fn detach_is_terminal_and_discards_buffer() {
        let (output, captured) = OutputTarget::capture();
        let sink = BufferedSink::with_output(buffering_rules(), output);

        sink.accept(&entry(Priority::Info, "before detach"));
        sink.detach();
        assert!(sink.is_detached());
        assert_eq!(sink.buffered_len(), 0);

        sink.accept(&entry(Priority::Error, "after detach"));
        sink.flush();
        assert!(captured.is_empty());
    }
}
