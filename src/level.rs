//! Log priority levels.
//!
//! Priorities are ordered `Verbose < Debug < Info < Warn < Error`. Each
//! priority renders as a single-character glyph in formatted lines, and
//! out-of-range raw values fail open to the most severe glyph so an unknown
//! priority is never silently miscoded as harmless.

use serde::{Deserialize, Serialize};

/// Ordinal severity of a log call.
///
/// The derived `Ord` gives the filtering order: a log is kept when its
/// priority is `>=` the configured minimum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Chattiest level; kept by the default rules.
    #[default]
    Verbose,
    /// Debugging detail.
    Debug,
    /// General progress.
    Info,
    /// Something suspicious but recoverable.
    Warn,
    /// Failures and anything unrecognized.
    Error,
}

impl Priority {
    /// Single-character code used as the line prefix (`V/D/I/W/E`).
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Verbose => 'V',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }

    /// Map a raw ordinal to a priority.
    ///
    /// Values `0..=4` map in order; anything else (negative, out of range)
    /// maps to [`Priority::Error`]. Failing open keeps unknown priorities
    /// visible instead of dropping them below the filter threshold.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        match raw {
            0 => Self::Verbose,
            1 => Self::Debug,
            2 => Self::Info,
            3 => Self::Warn,
            _ => Self::Error,
        }
    }

    /// Human-readable name for the level.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Verbose => "VERBOSE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<log::Level> for Priority {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Self::Verbose,
            log::Level::Debug => Self::Debug,
            log::Level::Info => Self::Info,
            log::Level::Warn => Self::Warn,
            log::Level::Error => Self::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering() {
        assert!(Priority::Verbose < Priority::Debug);
        assert!(Priority::Debug < Priority::Info);
        assert!(Priority::Info < Priority::Warn);
        assert!(Priority::Warn < Priority::Error);
    }

    #[test]
    fn glyph_mapping_is_exhaustive() {
        assert_eq!(Priority::Verbose.glyph(), 'V');
        assert_eq!(Priority::Debug.glyph(), 'D');
        assert_eq!(Priority::Info.glyph(), 'I');
        assert_eq!(Priority::Warn.glyph(), 'W');
        assert_eq!(Priority::Error.glyph(), 'E');
    }

    #[test]
    fn from_raw_maps_known_ordinals() {
        assert_eq!(Priority::from_raw(0), Priority::Verbose);
        assert_eq!(Priority::from_raw(1), Priority::Debug);
        assert_eq!(Priority::from_raw(2), Priority::Info);
        assert_eq!(Priority::from_raw(3), Priority::Warn);
        assert_eq!(Priority::from_raw(4), Priority::Error);
    }

    #[test]
    fn from_raw_fails_open_to_error() {
        assert_eq!(Priority::from_raw(-1), Priority::Error);
        assert_eq!(Priority::from_raw(5), Priority::Error);
        assert_eq!(Priority::from_raw(i64::MAX), Priority::Error);
    }

    #[test]
    fn log_level_bridge() {
        assert_eq!(Priority::from(log::Level::Trace), Priority::Verbose);
        assert_eq!(Priority::from(log::Level::Debug), Priority::Debug);
        assert_eq!(Priority::from(log::Level::Info), Priority::Info);
        assert_eq!(Priority::from(log::Level::Warn), Priority::Warn);
        assert_eq!(Priority::from(log::Level::Error), Priority::Error);
    }

    #[test]
    fn serde_lowercase_names() {
        let json = serde_json::to_string(&Priority::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        let back: Priority = serde_json::from_str("\"verbose\"").unwrap();
        assert_eq!(back, Priority::Verbose);
    }

    #[test]
    fn default_is_verbose() {
        assert_eq!(Priority::default(), Priority::Verbose);
    }
}
