//! Per-test attach/detach orchestration.
//!
//! The [`LifecycleController`] walks `Idle → Attaching → Active → Detaching
//! → Idle` around each test: a fresh [`BufferedSink`] is planted before the
//! test body runs and uprooted after it, flushing first when the test failed
//! and the rules buffer on failure. Detach is enforced by a drop guard, so a
//! sink can never stay planted past its test even if the flush panics.
//!
//! Rust's built-in harness has no per-test hooks, so the usual entry point
//! is [`capture`], an RAII guard that runs the after-hook on `Drop` and
//! treats a same-thread panic as the failure signal.

use std::sync::Arc;
use tracing::debug;

use crate::output::OutputTarget;
use crate::rules::Rules;
use crate::sink::BufferedSink;
use crate::source;

/// Controller position within one test's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Between tests; no sink planted.
    Idle,
    /// Building and planting the sink.
    Attaching,
    /// Test body running; sink planted.
    Active,
    /// Flushing and uprooting.
    Detaching,
}

/// Outcome of a completed test, as reported by the runner.
#[derive(Debug, Clone, Default)]
pub struct TestContext {
    failed: bool,
    execution_error: Option<String>,
}

impl TestContext {
    /// The test completed without an uncaught failure.
    #[must_use]
    pub const fn passed() -> Self {
        Self {
            failed: false,
            execution_error: None,
        }
    }

    /// The test raised an uncaught failure.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            failed: true,
            execution_error: None,
        }
    }

    /// The test failed with the given error message.
    #[must_use]
    pub fn failed_with(message: impl Into<String>) -> Self {
        Self {
            failed: true,
            execution_error: Some(message.into()),
        }
    }

    /// Whether an uncaught failure occurred.
    #[must_use]
    pub const fn has_failure(&self) -> bool {
        self.failed
    }

    /// The failure message, when one was reported.
    #[must_use]
    pub fn execution_error(&self) -> Option<&str> {
        self.execution_error.as_deref()
    }
}

/// Orchestrates attach-on-start, detach-on-end, and flush-on-failure.
///
/// Holds the currently active sink and nothing else across tests; each
/// `before_each` builds a fresh sink from the bound rules.
#[derive(Debug)]
pub struct LifecycleController {
    rules: Rules,
    output: OutputTarget,
    state: LifecycleState,
    sink: Option<Arc<BufferedSink>>,
}

impl LifecycleController {
    /// Controller emitting to standard output.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self::with_output(rules, OutputTarget::stdout())
    }

    /// Controller emitting to the given target.
    #[must_use]
    pub fn with_output(rules: Rules, output: OutputTarget) -> Self {
        Self {
            rules,
            output,
            state: LifecycleState::Idle,
            sink: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// The sink planted for the currently running test, if any.
    #[must_use]
    pub fn active_sink(&self) -> Option<&Arc<BufferedSink>> {
        self.sink.as_ref()
    }

    /// Hook to run before the test body: plant a fresh sink.
    ///
    /// Must run before any test code; exactly one sink is active per test.
    pub fn before_each(&mut self) {
        source::install_bridge();
        // A sink left over from a missed after-hook would leak buffered
        // lines into this test; uproot it before planting a fresh one.
        if let Some(stale) = self.sink.take() {
            stale.detach();
            source::uproot(&stale);
            debug!("uprooted stale sink from previous test");
        }
        self.state = LifecycleState::Attaching;
        let sink = Arc::new(BufferedSink::with_output(
            self.rules.clone(),
            self.output.clone(),
        ));
        source::plant(Arc::clone(&sink));
        self.sink = Some(sink);
        self.state = LifecycleState::Active;
        debug!(
            buffered = self.rules.log_only_when_test_fails,
            min_priority = %self.rules.min_priority,
            "log capture attached"
        );
    }

    /// Hook to run after the test body: flush on failure, then detach.
    ///
    /// The sink is uprooted unconditionally — pass or fail, flushed or not,
    /// and even if the flush itself panics.
    pub fn after_each(&mut self, context: &TestContext) {
        self.state = LifecycleState::Detaching;
        if let Some(sink) = self.sink.take() {
            let guard = UprootGuard {
                sink,
                state: &mut self.state,
            };
            if context.has_failure() && guard.sink.rules().log_only_when_test_fails {
                guard.sink.flush();
            }
        } else {
            self.state = LifecycleState::Idle;
        }
        debug!(failed = context.has_failure(), "log capture detached");
    }
}

/// Detaches, uproots, and returns the controller to idle on drop, so cleanup
/// survives a panicking flush.
struct UprootGuard<'a> {
    sink: Arc<BufferedSink>,
    state: &'a mut LifecycleState,
}

impl Drop for UprootGuard<'_> {
    fn drop(&mut self) {
        self.sink.detach();
        source::uproot(&self.sink);
        *self.state = LifecycleState::Idle;
    }
}

/// Start capturing with the given rules; capture ends when the guard drops.
///
/// On drop, a same-thread panic counts as the test failing. Panics on other
/// threads are not visible here; harnesses that know the real outcome should
/// call [`CaptureGuard::finish`] instead.
pub fn capture(rules: Rules) -> CaptureGuard {
    capture_to(rules, OutputTarget::stdout())
}

/// [`capture`], but emitting to the given target.
pub fn capture_to(rules: Rules, output: OutputTarget) -> CaptureGuard {
    let mut controller = LifecycleController::with_output(rules, output);
    controller.before_each();
    CaptureGuard { controller }
}

/// RAII handle for one test's capture session.
#[must_use = "dropping the guard immediately ends the capture"]
pub struct CaptureGuard {
    controller: LifecycleController,
}

impl CaptureGuard {
    /// End the capture with an explicit outcome instead of panic detection.
    pub fn finish(mut self, context: &TestContext) {
        self.controller.after_each(context);
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if self.controller.state() == LifecycleState::Active {
            let context = if std::thread::panicking() {
                TestContext::failed()
            } else {
                TestContext::passed()
            };
            self.controller.after_each(&context);
        }
    }
}

impl std::fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureGuard")
            .field("state", &self.controller.state())
            .finish()
    }
}
