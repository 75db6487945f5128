//! Run-level result and summary counts.

use serde::{Deserialize, Serialize};

use super::Row;

/// Run-level counts.
///
/// `included + excluded == detected` for every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Packets before the sentinel row.
    pub detected: usize,
    /// Rows with generated segments.
    pub included: usize,
    /// Rows routed to manual entry.
    pub excluded: usize,
    /// 1-based position of the sentinel row, or one past the last row.
    pub stopped_at_row: usize,
}

/// Everything one engine run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// The resolved work date.
    pub work_date: String,
    /// Run-level counts.
    pub summary: RunSummary,
    /// One row per detected packet, in input order.
    pub rows: Vec<Row>,
}

impl RunResult {
    /// Rows with generated segments.
    pub fn included_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.is_excluded())
    }

    /// Rows routed to manual entry.
    pub fn excluded_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.is_excluded())
    }
}
