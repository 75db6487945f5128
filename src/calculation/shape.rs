//! Worked time, LPI and segment shape selection.
//!
//! All arithmetic is done in minutes on a 24-hour dial. The scheduled end is
//! measured as an offset from the actual start, so a run that crosses
//! midnight and one that finishes early both compare correctly.

use serde::{Deserialize, Serialize};

use super::keywords::has_token;
use crate::config::SegmentOptions;
use crate::models::{AuditStep, ClockTime, LpiPayType, PayType, Shape};

/// Regular minutes before overtime begins (8 hours).
pub const REGULAR_MINUTES: u32 = 480;

/// Annotation attached when LPI minutes stay inside the OT/CTE segment.
pub const OT_INCLUDES_LPI: &str = "OT includes LPI";

/// The three times a shape decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTimes {
    /// Actual start.
    pub actual_start: ClockTime,
    /// Actual end.
    pub actual_end: ClockTime,
    /// Scheduled end.
    pub scheduled_end: ClockTime,
}

impl ShiftTimes {
    /// Worked minutes, adding a day when the end is before the start.
    pub fn worked_minutes(&self) -> u32 {
        self.actual_start.minutes_until(self.actual_end)
    }

    /// The end of regular time: actual start plus 8 hours.
    pub fn t8(&self) -> ClockTime {
        self.actual_start.add_minutes(REGULAR_MINUTES)
    }

    /// Minutes from actual start to scheduled end.
    pub fn scheduled_offset(&self) -> u32 {
        self.actual_start.minutes_until(self.scheduled_end)
    }

    /// Minutes worked past the scheduled end, before tolerance.
    pub fn raw_lpi_minutes(&self) -> u32 {
        self.worked_minutes().saturating_sub(self.scheduled_offset())
    }

    /// LPI minutes, with overruns at or under `tolerance` counted as zero.
    ///
    /// # Example
    ///
    /// ```
    /// use segment_engine::calculation::ShiftTimes;
    ///
    /// let times = ShiftTimes {
    ///     actual_start: "06:00".parse().unwrap(),
    ///     actual_end: "16:00".parse().unwrap(),
    ///     scheduled_end: "14:30".parse().unwrap(),
    /// };
    /// assert_eq!(times.lpi_minutes(0), 90);
    /// assert_eq!(times.t8().to_string(), "14:00");
    /// ```
    pub fn lpi_minutes(&self, tolerance: u32) -> u32 {
        let raw = self.raw_lpi_minutes();
        if raw <= tolerance { 0 } else { raw }
    }
}

/// Reads the LPI pay treatment from notes.
///
/// The notes decide only which code LPI minutes are paid under, never how
/// many there are. Without an `LPI` word the treatment is unknown; with one,
/// `CTE` wins over `OT`.
pub fn lpi_pay_type_from_notes(notes: &str) -> LpiPayType {
    if !has_token(notes, "LPI") {
        LpiPayType::Unknown
    } else if has_token(notes, "CTE") {
        LpiPayType::Cte
    } else if has_token(notes, "OT") {
        LpiPayType::Ot
    } else {
        LpiPayType::Unknown
    }
}

/// The layout the segment builder should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapePlan {
    /// One REG segment.
    Regular,
    /// REG then one OT/CTE segment running to the actual end.
    Overtime {
        /// LPI minutes sit inside the OT/CTE segment.
        folds_lpi: bool,
    },
    /// REG, OT/CTE to the scheduled end, then LPI under `lpi_pay_type`.
    SplitLpi {
        /// Pay type for the LPI segment.
        lpi_pay_type: PayType,
    },
}

impl ShapePlan {
    /// The row-level shape for this plan.
    pub fn shape(self) -> Shape {
        match self {
            ShapePlan::Regular => Shape::A,
            ShapePlan::Overtime { .. } => Shape::B,
            ShapePlan::SplitLpi { .. } => Shape::C,
        }
    }
}

/// The result of shape selection for one included row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeDecision {
    /// The chosen plan.
    pub plan: ShapePlan,
    /// Operator-facing note, if any.
    pub annotation: Option<String>,
    /// The audit step recording the decision.
    pub audit_step: AuditStep,
}

/// Picks shape A, B or C.
///
/// - A: worked minutes at or under 8 hours.
/// - B: over 8 hours, and either no LPI, LPI paid the same way as the
///   overtime in effect, LPI treatment unknown, or `ot_includes_lpi` set.
/// - C: over 8 hours with LPI paid under a different type.
pub fn select_shape(
    worked_minutes: u32,
    lpi_minutes: u32,
    lpi_pay_type: LpiPayType,
    ot_pay_type: PayType,
    options: &SegmentOptions,
    step_number: u32,
) -> ShapeDecision {
    let (plan, annotation, reasoning) = if worked_minutes <= REGULAR_MINUTES {
        (
            ShapePlan::Regular,
            None,
            format!(
                "{} minutes worked is within the {} minute regular threshold",
                worked_minutes, REGULAR_MINUTES
            ),
        )
    } else if lpi_minutes == 0 {
        (
            ShapePlan::Overtime { folds_lpi: false },
            None,
            format!(
                "{} minutes worked exceeds {} with no LPI",
                worked_minutes, REGULAR_MINUTES
            ),
        )
    } else {
        match lpi_pay_type.pay_type() {
            Some(lpi_type) if lpi_type != ot_pay_type && !options.ot_includes_lpi => (
                ShapePlan::SplitLpi {
                    lpi_pay_type: lpi_type,
                },
                None,
                format!(
                    "{} LPI minutes paid as {:?} differ from overtime paid as {:?}; split",
                    lpi_minutes, lpi_type, ot_pay_type
                ),
            ),
            Some(_) if options.ot_includes_lpi => (
                ShapePlan::Overtime { folds_lpi: true },
                Some(OT_INCLUDES_LPI.to_string()),
                format!(
                    "{} LPI minutes folded into overtime by configuration",
                    lpi_minutes
                ),
            ),
            Some(lpi_type) => (
                ShapePlan::Overtime { folds_lpi: true },
                Some(OT_INCLUDES_LPI.to_string()),
                format!(
                    "{} LPI minutes paid as {:?}, same as overtime; not split",
                    lpi_minutes, lpi_type
                ),
            ),
            None => (
                ShapePlan::Overtime { folds_lpi: true },
                Some(OT_INCLUDES_LPI.to_string()),
                format!(
                    "{} LPI minutes with no pay treatment in notes; kept in overtime",
                    lpi_minutes
                ),
            ),
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "shape_selection".to_string(),
        rule_name: "Segment Shape Selection".to_string(),
        input: serde_json::json!({
            "worked_minutes": worked_minutes,
            "lpi_minutes": lpi_minutes,
            "lpi_pay_type": lpi_pay_type,
            "ot_pay_type": ot_pay_type,
            "ot_includes_lpi": options.ot_includes_lpi
        }),
        output: serde_json::json!({
            "shape": plan.shape(),
            "annotation": annotation
        }),
        reasoning,
    };

    ShapeDecision {
        plan,
        annotation,
        audit_step,
    }
}
