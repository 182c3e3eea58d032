use chrono::{Local, TimeZone, Utc};

use crate::model::tag::{Tag, render_children};

/// A named task carrying a creation timestamp and a root tag forest.
///
/// The name doubles as the task's key in the persisted document, so two
/// tasks with the same name collapse to one entry at save time (last write
/// wins). `created_on` is set exactly once and never touched afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    /// Seconds since the epoch
    pub created_on: i64,
    pub tags: Vec<Tag>,
}

impl Task {
    /// Create a task stamped with the current time
    pub fn new(name: impl Into<String>, tags: Vec<Tag>) -> Self {
        Task {
            name: name.into(),
            created_on: Utc::now().timestamp(),
            tags,
        }
    }

    /// Reconstruct a task from persisted fields
    pub fn from_parts(name: impl Into<String>, created_on: i64, tags: Vec<Tag>) -> Self {
        Task {
            name: name.into(),
            created_on,
            tags,
        }
    }

    /// Header line with the creation timestamp, then the tag tree depth-first
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.name);
        out.push_str("  [created ");
        out.push_str(&format_timestamp(self.created_on));
        out.push_str("]\n");
        render_children(&mut out, &self.tags, 0);
        out
    }
}

/// Format an epoch timestamp in local time, minute precision. Out-of-range
/// values fall back to the raw number rather than failing a listing.
pub fn format_timestamp(secs: i64) -> String {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| format!("@{secs}"))
}
