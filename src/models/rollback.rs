//! Rollback data model.
//!
//! Values an action records during `execute` so that `rollback` can reverse it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a successful `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The mutation was performed.
    Done,
    /// An existing target was reused; nothing to undo.
    Reused,
    /// The source did not exist and the action was graceful; nothing to undo.
    SkippedNotFound,
    /// The folder was not empty and the action was graceful; nothing to undo.
    SkippedNonEmpty,
    /// Source and target were identical; nothing to undo.
    Unchanged,
}

impl Outcome {
    /// Whether a later rollback has anything to reverse.
    pub fn needs_undo(&self) -> bool {
        matches!(self, Outcome::Done)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Done => "done",
            Outcome::Reused => "reused",
            Outcome::SkippedNotFound => "skipped (not found)",
            Outcome::SkippedNonEmpty => "skipped (not empty)",
            Outcome::Unchanged => "unchanged",
        };
        write!(f, "{}", s)
    }
}

/// Interval bracketing a deletion, used for point-in-time restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether a unix timestamp (seconds) falls into the interval at second
    /// resolution.
    pub fn contains_secs(&self, secs: i64) -> bool {
        secs >= self.start.timestamp() && secs <= self.end.timestamp()
    }
}

/// Reverse operation selected by a rename action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameUndo {
    /// A new node was created; delete it.
    Delete,
    /// The node was moved; move it back.
    Rename,
    /// The node was deleted; restore it from the trash.
    Restore,
    /// Nothing was changed.
    Nothing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_interval_contains_secs() {
        let start = Utc.timestamp_opt(100, 500_000_000).unwrap();
        let end = Utc.timestamp_opt(101, 200_000_000).unwrap();
        let interval = TimeInterval::new(start, end);
        assert!(interval.contains_secs(100));
        assert!(interval.contains_secs(101));
        assert!(!interval.contains_secs(99));
        assert!(!interval.contains_secs(102));
    }

    #[test]
    fn test_outcome_needs_undo() {
        assert!(Outcome::Done.needs_undo());
        assert!(!Outcome::Reused.needs_undo());
        assert!(!Outcome::SkippedNotFound.needs_undo());
    }
}
