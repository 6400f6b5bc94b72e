//! The process-wide log source boundary.
//!
//! A single registry of planted sinks receives every log call in the
//! process. [`plant`] and [`uproot`] are invoked only from lifecycle hooks
//! (never concurrently for one test), while [`dispatch`] runs on whatever
//! thread issued the log call, so the registry sits behind a `RwLock` with
//! reads on the hot path.
//!
//! The [`log`] facade is bridged in via a static dispatcher installed with
//! [`install_bridge`]; `log::info!` and friends then reach planted sinks
//! with the record's `target` as the tag. Callers carrying an error payload
//! (which the `log` macros cannot express) use [`emit`] directly.

use std::sync::{Arc, RwLock};

use crate::format::LogEntry;
use crate::level::Priority;
use crate::sink::BufferedSink;

static PLANTED: RwLock<Vec<Arc<BufferedSink>>> = RwLock::new(Vec::new());

/// Register a sink to receive all subsequent log calls.
pub fn plant(sink: Arc<BufferedSink>) {
    if let Ok(mut planted) = PLANTED.write() {
        planted.push(sink);
    }
}

/// Unregister a previously planted sink (identity, not equality).
pub fn uproot(sink: &Arc<BufferedSink>) {
    if let Ok(mut planted) = PLANTED.write() {
        planted.retain(|planted| !Arc::ptr_eq(planted, sink));
    }
}

/// Deliver one entry to every planted sink.
pub fn dispatch(entry: &LogEntry<'_>) {
    if let Ok(planted) = PLANTED.read() {
        for sink in planted.iter() {
            sink.accept(entry);
        }
    }
}

/// Issue a log call directly against the source, with an optional error
/// payload.
pub fn emit(
    priority: Priority,
    tag: Option<&str>,
    message: &str,
    error: Option<&(dyn std::error::Error + 'static)>,
) {
    dispatch(&LogEntry {
        priority,
        tag,
        message,
        error,
    });
}

/// Number of currently planted sinks.
#[must_use]
pub fn planted_count() -> usize {
    PLANTED.read().map_or(0, |planted| planted.len())
}

/// Route the [`log`] facade into the planted-sink registry.
///
/// Idempotent. If another logger is already installed the call is a no-op
/// and `log` macro output will not reach planted sinks; [`emit`] still
/// works. The max level is raised to `Trace` so filtering happens in the
/// sinks, where the per-test rules live.
pub fn install_bridge() {
    if log::set_logger(&BRIDGE).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
}

static BRIDGE: FacadeBridge = FacadeBridge;

struct FacadeBridge;

impl log::Log for FacadeBridge {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let message = record.args().to_string();
        dispatch(&LogEntry {
            priority: record.level().into(),
            tag: Some(record.target()),
            message: &message,
            error: None,
        });
    }

    fn flush(&self) {}
}

#[cfg(test)]
pub(crate) fn registry_guard() -> std::sync::MutexGuard<'static, ()> {
    // Tests touching the process-wide registry must not interleave.
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputTarget;
    use crate::rules::Rules;

    fn quiet_rules() -> Rules {
        Rules {
            show_timestamp: false,
            ..Rules::default()
        }
    }

    #[test]
    fn dispatch_reaches_planted_sinks_only() {
        let _guard = registry_guard();
        let (output, captured) = OutputTarget::capture();
        let sink = Arc::new(BufferedSink::with_output(quiet_rules(), output));

        plant(Arc::clone(&sink));
        emit(Priority::Info, Some("src"), "planted", None);
        uproot(&sink);
        emit(Priority::Info, Some("src"), "uprooted", None);

        sink.flush();
        assert_eq!(captured.lines(), vec!["I/src: planted"]);
    }

    #[test]
    fn uproot_removes_by_identity() {
        let _guard = registry_guard();
        let (output_a, captured_a) = OutputTarget::capture();
        let (output_b, captured_b) = OutputTarget::capture();
        let sink_a = Arc::new(BufferedSink::with_output(quiet_rules(), output_a));
        let sink_b = Arc::new(BufferedSink::with_output(quiet_rules(), output_b));

        plant(Arc::clone(&sink_a));
        plant(Arc::clone(&sink_b));
        uproot(&sink_a);
        assert_eq!(planted_count(), 1);

        emit(Priority::Warn, Some("src"), "still planted", None);
        uproot(&sink_b);

        sink_a.flush();
        sink_b.flush();
        assert!(captured_a.is_empty());
        assert_eq!(captured_b.lines(), vec!["W/src: still planted"]);
    }

    #[test]
    fn emit_carries_error_payload() {
        let _guard = registry_guard();
        let (output, captured) = OutputTarget::capture();
        let sink = Arc::new(BufferedSink::with_output(quiet_rules(), output));

        plant(Arc::clone(&sink));
        let err = std::io::Error::other("payload");
        emit(Priority::Error, Some("src"), "failed", Some(&err));
        uproot(&sink);

        sink.flush();
        let contents = captured.contents();
        assert!(contents.contains("E/src: failed"));
        assert!(contents.contains("error: payload"));
    }
}
