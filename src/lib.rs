#![forbid(unsafe_code)]
//! Lumbermill: test-scoped log capture.
//!
//! This library intercepts log calls for the duration of a single test,
//! buffers them, and replays them only if the test fails. Passing tests stay
//! silent; failing tests dump their full, ordered log stream right next to
//! the failure report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Rules                                   │
//! │  (min priority, thread info, timestamp, buffer-vs-immediate)    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Lifecycle Controller                          │
//! │  (attach on test start, conditional flush + detach on test end) │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Log Source                                 │
//! │  (process-wide registry; `log` facade bridge; plant/uproot)     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Buffered Sink                               │
//! │  Formatter (filter → timestamp/thread/glyph) → buffer or print  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! The main entry point is [`capture`], which returns a guard that ends the
//! capture when dropped:
//!
//! ```ignore
//! use lumbermill::{capture, Rules};
//!
//! #[test]
//! fn does_the_thing() {
//!     let _logs = capture(Rules::default());
//!
//!     log::info!("only shown if this test fails");
//!     // ... test body ...
//! }
//! ```
//!
//! Harnesses with real per-test hooks can drive the
//! [`lifecycle::LifecycleController`] directly instead of relying on the
//! guard's panic detection.

pub mod format;
pub mod level;
pub mod lifecycle;
pub mod output;
pub mod rules;
pub mod sink;
pub mod source;

// Re-export commonly used types
pub use format::{LogEntry, format_entry};
pub use level::Priority;
pub use lifecycle::{
    CaptureGuard, LifecycleController, LifecycleState, TestContext, capture, capture_to,
};
pub use output::{CapturedOutput, OutputTarget};
pub use rules::Rules;
pub use sink::BufferedSink;
pub use source::{emit, install_bridge, plant, uproot};
