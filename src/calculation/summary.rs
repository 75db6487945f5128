//! Run summary aggregation.

use super::stop_detector::StopDetection;
use crate::models::{Row, RunSummary};

/// Folds rows into run-level counts.
///
/// `detected` comes from the stop detector; every detected packet produces
/// exactly one row, so `included + excluded == detected`.
pub fn summarize(rows: &[Row], stop: &StopDetection) -> RunSummary {
    debug_assert_eq!(rows.len(), stop.detected);
    let excluded = rows.iter().filter(|r| r.is_excluded()).count();

    RunSummary {
        detected: stop.detected,
        included: rows.len() - excluded,
        excluded,
        stopped_at_row: stop.stopped_at_row,
    }
}
