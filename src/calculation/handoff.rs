//! Builds the records handed to external ledger, worklog and export writers.
//!
//! These are pure projections of a run; writing them anywhere is the
//! caller's job.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::{ExportLine, LedgerEntry, Row, RowStatus, RunResult, WorklogEntry};

/// Work-date layouts accepted for export, tried in order.
const WORK_DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y"];

/// One ledger entry per excluded row, in row order.
pub fn ledger_entries(run: &RunResult) -> Vec<LedgerEntry> {
    run.excluded_rows()
        .map(|row| LedgerEntry {
            employee_id: row.packet.employee_id.clone(),
            employee_name: row.packet.employee_name.clone(),
            work_date: row.packet.work_date.clone(),
            exclusion_tags: row.packet.exclusion_tags.clone(),
            notes_text: row.packet.notes_text.clone(),
            primary_condition_text: row.packet.primary_condition_text.clone(),
            status: RowStatus::Pending,
        })
        .collect()
}

/// One worklog entry per row, all stamped with `timestamp`.
pub fn worklog_entries(run: &RunResult, timestamp: DateTime<Utc>) -> Vec<WorklogEntry> {
    run.rows
        .iter()
        .map(|row| WorklogEntry {
            employee_id: row.packet.employee_id.clone(),
            date: row.packet.work_date.clone(),
            shape: row.shape,
            status: row.status,
            timestamp,
        })
        .collect()
}

/// Parses a work date, returning it with the layout it matched.
fn parse_work_date(value: &str) -> EngineResult<(NaiveDate, &'static str)> {
    let trimmed = value.trim();
    WORK_DATE_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(trimmed, fmt)
                .ok()
                .map(|date| (date, *fmt))
        })
        .ok_or_else(|| EngineError::InvalidWorkDate {
            value: value.to_string(),
        })
}

/// One export line per segment of every completed row.
///
/// Dates are written in the layout the work date arrived in. A segment
/// whose end is earlier than its start ends on the next calendar day, and
/// any segment after it starts on that day too.
///
/// # Example
///
/// ```
/// use segment_engine::calculation::export_lines;
/// use segment_engine::models::{Bucket, ClockTime, Packet, Row, RowStatus, Segment, SegmentLabel};
///
/// let t = |s: &str| s.parse::<ClockTime>().unwrap();
/// let row = Row {
///     packet: Packet {
///         employee_id: "2964".to_string(),
///         work_date: "02/12/2026".to_string(),
///         ..Packet::default()
///     },
///     bucket: Bucket::Simple,
///     segments: vec![Segment { label: SegmentLabel::Reg, start: t("22:00"), end: t("06:00"), code: "1020".to_string() }],
///     ot_pay_type: None,
///     cte_preferred: false,
///     lpi_minutes: 0,
///     lpi_pay_type: None,
///     total_worked_minutes: Some(480),
///     total_worked_hours: None,
///     shape: None,
///     status: RowStatus::Completed,
///     flagged: false,
///     annotation: None,
///     suggested_leave_code: None,
///     audit_trace: vec![],
/// };
///
/// let lines = export_lines(&[row]).unwrap();
/// assert_eq!(lines[0].date_in, "02/12/2026");
/// assert_eq!(lines[0].date_out, "02/13/2026");
/// ```
pub fn export_lines(rows: &[Row]) -> EngineResult<Vec<ExportLine>> {
    let mut lines = Vec::new();

    for row in rows.iter().filter(|r| r.status == RowStatus::Completed) {
        let (mut day, fmt) = parse_work_date(&row.packet.work_date)?;
        for segment in &row.segments {
            let date_in = day;
            if segment.crosses_midnight() {
                day = day
                    .checked_add_days(Days::new(1))
                    .ok_or_else(|| EngineError::InvalidWorkDate {
                        value: row.packet.work_date.clone(),
                    })?;
            }
            lines.push(ExportLine {
                employee_id: row.packet.employee_id.clone(),
                date_in: date_in.format(fmt).to_string(),
                date_out: day.format(fmt).to_string(),
                start: segment.start,
                end: segment.end,
                labor_code: segment.code.clone(),
            });
        }
    }

    Ok(lines)
}
