//! Rule logic for the Segment Suggestion Engine.
//!
//! Each stage of a run lives in its own module: sentinel detection,
//! exclusion evaluation, bucket classification, CTE preference, shape
//! selection, segment building and summary counts. [`process_run`] wires
//! them together; the hand-off builders project a finished run into the
//! records external writers consume.

mod bucket;
mod engine;
mod exclusion;
mod handoff;
mod keywords;
mod preference;
mod segment_builder;
mod shape;
mod stop_detector;
mod summary;

pub use bucket::{BUCKET_RULES, BucketClassification, BucketContext, BucketRule, classify_bucket};
pub use engine::process_run;
pub use exclusion::{ExclusionEvaluation, evaluate_exclusions};
pub use handoff::{export_lines, ledger_entries, worklog_entries};
pub use preference::{OvertimePreference, resolve_overtime_preference};
pub use segment_builder::{SegmentBuild, build_segments, verify_segments};
pub use shape::{
    OT_INCLUDES_LPI, REGULAR_MINUTES, ShapeDecision, ShapePlan, ShiftTimes,
    lpi_pay_type_from_notes, select_shape,
};
pub use stop_detector::{StopDetection, detect_stop, truncate_at_sentinel};
pub use summary::summarize;
