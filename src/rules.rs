//! Per-test capture rules.
//!
//! A [`Rules`] value is fully determined at construction and bound to exactly
//! one test execution. Every combination of fields is valid, so there is no
//! validation step and no error type.

use serde::{Deserialize, Serialize};

use crate::level::Priority;

/// Filtering and formatting policy for one test's logging session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Lowest priority that is kept; logs below this are dropped before any
    /// formatting work happens.
    pub min_priority: Priority,

    /// Prepend the executing thread's id and name to each line.
    pub show_thread: bool,

    /// Prepend a timestamp (millisecond precision) to each line.
    pub show_timestamp: bool,

    /// Buffer lines and surface them only when the test fails. When false,
    /// lines are written immediately as the test runs.
    pub log_only_when_test_fails: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            min_priority: Priority::Verbose,
            show_thread: false,
            show_timestamp: true,
            log_only_when_test_fails: true,
        }
    }
}
