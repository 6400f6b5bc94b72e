//! Pure log-line formatting.
//!
//! [`format_entry`] turns a [`LogEntry`] into a formatted line, or `None`
//! when the entry falls below the configured priority threshold. It has no
//! side effects and no error outcomes: anything that cannot be rendered
//! degrades to the best available partial line rather than aborting the log
//! call.

use chrono::{Local, Timelike};
use std::fmt::Write as _;

use crate::level::Priority;
use crate::rules::Rules;

/// One log call, as delivered by the log source.
///
/// Entries are ephemeral: produced by the source, consumed once by the
/// formatter, never retained.
#[derive(Debug, Clone, Copy)]
pub struct LogEntry<'a> {
    /// Severity of the call.
    pub priority: Priority,
    /// Short category label identifying the call's origin.
    pub tag: Option<&'a str>,
    /// The log message itself.
    pub message: &'a str,
    /// Optional error payload carried alongside the message.
    pub error: Option<&'a (dyn std::error::Error + 'static)>,
}

/// Format an entry according to the rules.
///
/// Returns `None` when `entry.priority` is below `rules.min_priority` — the
/// threshold is checked before any string construction. Otherwise the line
/// is, in fixed order:
///
/// ```text
/// [timestamp ][threadId/threadName ]<glyph>/<tag>: <message>
/// ```
///
/// An error payload is appended as `caused by:` continuation lines walking
/// the [`std::error::Error::source`] chain.
#[must_use]
pub fn format_entry(rules: &Rules, entry: &LogEntry<'_>) -> Option<String> {
    // Avoid formatting work entirely when the priority is too low.
    if entry.priority < rules.min_priority {
        return None;
    }

    let mut line = String::with_capacity(64);
    if rules.show_timestamp {
        line.push_str(&timestamp_now());
        line.push(' ');
    }
    if rules.show_thread {
        line.push_str(&thread_label());
        line.push(' ');
    }
    line.push(entry.priority.glyph());
    line.push('/');
    line.push_str(entry.tag.unwrap_or(""));
    line.push_str(": ");
    line.push_str(entry.message);

    if let Some(err) = entry.error {
        let _ = write!(line, "\n  error: {err}");
        let mut cause = err.source();
        while let Some(err) = cause {
            let _ = write!(line, "\n  caused by: {err}");
            cause = err.source();
        }
    }

    Some(line)
}

/// Current wall-clock time as `HH:MM:SS:MMMMMMM` (milliseconds zero-padded
/// to seven digits).
///
/// Built from a fresh `Local::now()` per call, so there is no shared
/// formatter state and concurrent callers always see consistent output.
fn timestamp_now() -> String {
    let now = Local::now();
    format!(
        "{:02}:{:02}:{:02}:{:07}",
        now.hour(),
        now.minute(),
        now.second(),
        now.nanosecond() / 1_000_000
    )
}

/// Executing thread as `<id>/<name>`.
fn thread_label() -> String {
    let thread = std::thread::current();
    // ThreadId has no stable numeric accessor; its Debug form is "ThreadId(n)".
    let id: String = format!("{:?}", thread.id())
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    format!("{}/{}", id, thread.name().unwrap_or("unnamed"))
}
