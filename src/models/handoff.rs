//! Records handed to the external ledger, worklog and export writers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClockTime, ExclusionTag, RowStatus, Shape};

/// One exclusion-ledger line per excluded row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Employee id.
    pub employee_id: String,
    /// Employee name, for the operator.
    pub employee_name: String,
    /// Work date.
    pub work_date: String,
    /// Every tag that fired.
    pub exclusion_tags: Vec<ExclusionTag>,
    /// Notes, verbatim.
    pub notes_text: String,
    /// Primary condition, verbatim.
    pub primary_condition_text: String,
    /// Always `pending` when handed off.
    pub status: RowStatus,
}

/// One worklog line per processed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklogEntry {
    /// Employee id.
    pub employee_id: String,
    /// Work date.
    pub date: String,
    /// Segment shape, if one was chosen.
    pub shape: Option<Shape>,
    /// Row status at hand-off time.
    pub status: RowStatus,
    /// When the hand-off happened.
    pub timestamp: DateTime<Utc>,
}

/// One export line per segment of a completed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLine {
    /// Employee id.
    pub employee_id: String,
    /// Calendar date the segment starts on.
    pub date_in: String,
    /// Calendar date the segment ends on.
    pub date_out: String,
    /// Segment start.
    pub start: ClockTime,
    /// Segment end.
    pub end: ClockTime,
    /// Labor code.
    pub labor_code: String,
}
