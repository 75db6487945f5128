//! Segment materialization and verification.
//!
//! Builds the concrete REG / OT / CTE / LPI / GUARANTEE segments for a shape
//! plan, then checks them. A failed check is returned as
//! [`EngineError::SegmentMismatch`]; boundaries are never adjusted to make the
//! numbers agree.

use serde::{Deserialize, Serialize};

use super::shape::{REGULAR_MINUTES, ShapePlan, ShiftTimes};
use crate::config::{LaborCodes, SegmentOptions};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ClockTime, PayType, Segment, SegmentLabel};

/// Built and verified segments for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentBuild {
    /// Contiguous segments in time order.
    pub segments: Vec<Segment>,
    /// Total segment minutes the build was verified against.
    pub expected_minutes: u32,
    /// The audit step recording the build.
    pub audit_step: AuditStep,
}

fn segment(label: SegmentLabel, start: ClockTime, end: ClockTime, code: &str) -> Segment {
    Segment {
        label,
        start,
        end,
        code: code.to_string(),
    }
}

/// Materializes a shape plan into segments.
///
/// `overtime` is the pay type already in effect for the employee; its code
/// is used for the OT/CTE segment. An LPI segment is coded by its own pay
/// type.
///
/// # Example
///
/// ```
/// use segment_engine::calculation::{build_segments, ShapePlan, ShiftTimes};
/// use segment_engine::config::{LaborCodes, SegmentOptions};
/// use segment_engine::models::PayType;
///
/// let times = ShiftTimes {
///     actual_start: "06:00".parse().unwrap(),
///     actual_end: "16:00".parse().unwrap(),
///     scheduled_end: "14:30".parse().unwrap(),
/// };
/// let plan = ShapePlan::SplitLpi { lpi_pay_type: PayType::Cte };
///
/// let build = build_segments(
///     "2964", &times, plan, PayType::Ot, &SegmentOptions::default(), &LaborCodes::default(), 1,
/// ).unwrap();
///
/// let spans: Vec<String> = build.segments.iter()
///     .map(|s| format!("{} {}-{} {}", s.label, s.start, s.end, s.code))
///     .collect();
/// assert_eq!(spans, vec![
///     "REG 06:00-14:00 1020",
///     "OT 14:00-14:30 1013",
///     "LPI 14:30-16:00 3002",
/// ]);
/// ```
pub fn build_segments(
    employee_id: &str,
    times: &ShiftTimes,
    plan: ShapePlan,
    overtime: PayType,
    options: &SegmentOptions,
    codes: &LaborCodes,
    step_number: u32,
) -> EngineResult<SegmentBuild> {
    let worked = times.worked_minutes();
    let t8 = times.t8();
    let mut segments = Vec::with_capacity(3);
    let mut expected_minutes = worked;

    match plan {
        ShapePlan::Regular => {
            segments.push(segment(
                SegmentLabel::Reg,
                times.actual_start,
                times.actual_end,
                &codes.reg,
            ));
            if options.guarantee_short_shifts && worked < REGULAR_MINUTES {
                segments.push(segment(
                    SegmentLabel::Guarantee,
                    times.actual_end,
                    t8,
                    &codes.guarantee,
                ));
                expected_minutes = REGULAR_MINUTES;
            }
        }
        ShapePlan::Overtime { .. } => {
            segments.push(segment(SegmentLabel::Reg, times.actual_start, t8, &codes.reg));
            segments.push(segment(
                overtime.label(),
                t8,
                times.actual_end,
                codes.pay_code(overtime),
            ));
        }
        ShapePlan::SplitLpi { lpi_pay_type } => {
            segments.push(segment(SegmentLabel::Reg, times.actual_start, t8, &codes.reg));
            let lpi_start = if times.scheduled_offset() > REGULAR_MINUTES {
                segments.push(segment(
                    overtime.label(),
                    t8,
                    times.scheduled_end,
                    codes.pay_code(overtime),
                ));
                times.scheduled_end
            } else {
                t8
            };
            segments.push(segment(
                SegmentLabel::Lpi,
                lpi_start,
                times.actual_end,
                codes.pay_code(lpi_pay_type),
            ));
        }
    }

    verify_segments(employee_id, &segments, expected_minutes)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "segment_build".to_string(),
        rule_name: "Segment Build".to_string(),
        input: serde_json::json!({
            "actual_start": times.actual_start,
            "actual_end": times.actual_end,
            "scheduled_end": times.scheduled_end,
            "plan": plan,
            "overtime": overtime
        }),
        output: serde_json::to_value(&segments).unwrap_or_default(),
        reasoning: format!(
            "{} contiguous segment(s) totalling {} minutes",
            segments.len(),
            expected_minutes
        ),
    };

    Ok(SegmentBuild {
        segments,
        expected_minutes,
        audit_step,
    })
}

/// Checks that segments are non-empty, contiguous, free of zero-length
/// entries and sum to `expected_minutes`.
pub fn verify_segments(
    employee_id: &str,
    segments: &[Segment],
    expected_minutes: u32,
) -> EngineResult<()> {
    let mismatch = |message: String| EngineError::SegmentMismatch {
        employee_id: employee_id.to_string(),
        message,
    };

    if segments.is_empty() {
        return Err(mismatch("no segments generated".to_string()));
    }

    for (index, seg) in segments.iter().enumerate() {
        if seg.duration_minutes() == 0 {
            return Err(mismatch(format!(
                "segment {} ({}) has zero duration at {}",
                index, seg.label, seg.start
            )));
        }
    }

    for (index, pair) in segments.windows(2).enumerate() {
        if pair[0].end != pair[1].start {
            return Err(mismatch(format!(
                "segment {} ends at {} but segment {} starts at {}",
                index,
                pair[0].end,
                index + 1,
                pair[1].start
            )));
        }
    }

    let total: u32 = segments.iter().map(Segment::duration_minutes).sum();
    if total != expected_minutes {
        return Err(mismatch(format!(
            "segments total {} minutes, expected {}",
            total, expected_minutes
        )));
    }

    Ok(())
}
