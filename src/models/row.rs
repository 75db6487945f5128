//! Output rows, triage buckets, segment shapes and the review status machine.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditStep, LpiPayType, Packet, PayType, Segment};
use crate::error::{EngineError, EngineResult};

/// Triage category, independent of inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Clean run, no LPI.
    Simple,
    /// Worked past the scheduled end.
    Lpi,
    /// Alternate-day assignment.
    Alt,
    /// Extraboard shine run.
    ExbShine,
    /// Primary condition or alternate driver recorded.
    ConditionOrAlternate,
    /// Extraboard.
    Exb,
    /// Anything else.
    Other,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::Simple => "simple",
            Bucket::Lpi => "lpi",
            Bucket::Alt => "alt",
            Bucket::ExbShine => "exb_shine",
            Bucket::ConditionOrAlternate => "condition_or_alternate",
            Bucket::Exb => "exb",
            Bucket::Other => "other",
        };
        f.write_str(name)
    }
}

/// Segment layout chosen for an included row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Single REG segment.
    A,
    /// REG then one OT/CTE segment.
    B,
    /// REG, OT/CTE, then LPI under a different pay type.
    C,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::A => "A",
            Shape::B => "B",
            Shape::C => "C",
        };
        f.write_str(name)
    }
}

/// Review status of a row.
///
/// The engine only ever assigns [`RowStatus::Pending`]. The review layer
/// moves rows along the legal edges listed in [`RowStatus::LEGAL_TRANSITIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Looked at, not yet entered.
    Reviewed,
    /// Entered into the timekeeping system.
    Completed,
    /// Deliberately not entered.
    Skipping,
}

impl RowStatus {
    /// Every permitted `(from, to)` edge.
    pub const LEGAL_TRANSITIONS: [(RowStatus, RowStatus); 4] = [
        (RowStatus::Pending, RowStatus::Reviewed),
        (RowStatus::Pending, RowStatus::Completed),
        (RowStatus::Pending, RowStatus::Skipping),
        (RowStatus::Reviewed, RowStatus::Completed),
    ];

    /// Whether `self -> next` is a legal edge.
    pub fn can_transition_to(self, next: RowStatus) -> bool {
        Self::LEGAL_TRANSITIONS.contains(&(self, next))
    }

    /// Returns `next` if the edge is legal, otherwise
    /// [`EngineError::InvalidTransition`].
    pub fn transition(self, next: RowStatus) -> EngineResult<RowStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(EngineError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RowStatus::Pending => "pending",
            RowStatus::Reviewed => "reviewed",
            RowStatus::Completed => "completed",
            RowStatus::Skipping => "skipping",
        };
        f.write_str(name)
    }
}

/// One output row per packet that survived the stop detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// The packet, with its exclusion tags filled in.
    pub packet: Packet,
    /// Triage bucket.
    pub bucket: Bucket,
    /// Suggested segments. Always empty for excluded rows.
    pub segments: Vec<Segment>,
    /// Overtime pay type in effect. `None` for excluded rows.
    pub ot_pay_type: Option<PayType>,
    /// Whether the employee prefers CTE.
    pub cte_preferred: bool,
    /// Minutes worked past the scheduled end.
    pub lpi_minutes: u32,
    /// LPI pay type read from the notes. `None` for excluded rows.
    pub lpi_pay_type: Option<LpiPayType>,
    /// Worked minutes, when both actual times are valid.
    pub total_worked_minutes: Option<u32>,
    /// Worked hours as a decimal, when both actual times are valid.
    pub total_worked_hours: Option<Decimal>,
    /// Chosen segment shape. `None` for excluded rows.
    pub shape: Option<Shape>,
    /// Review status. Always `pending` from the engine.
    pub status: RowStatus,
    /// Review flag. Initially set for suspected bleed or pay-as notes.
    pub flagged: bool,
    /// Operator-facing note about the suggestion, e.g. "OT includes LPI".
    pub annotation: Option<String>,
    /// Leave code matching the primary condition, for manual entry.
    pub suggested_leave_code: Option<String>,
    /// Every rule decision made for this row.
    pub audit_trace: Vec<AuditStep>,
}

impl Row {
    /// True when the row carries at least one exclusion tag.
    pub fn is_excluded(&self) -> bool {
        !self.packet.exclusion_tags.is_empty()
    }

    /// Moves the row along a legal status edge.
    pub fn transition(&mut self, next: RowStatus) -> EngineResult<()> {
        self.status = self.status.transition(next)?;
        Ok(())
    }

    /// Flips the review flag. Independent of status.
    pub fn toggle_flag(&mut self) {
        self.flagged = !self.flagged;
    }

    /// Sum of all segment durations.
    pub fn segment_minutes(&self) -> u32 {
        self.segments.iter().map(Segment::duration_minutes).sum()
    }

    /// Worked duration as `H:MM`, when known.
    pub fn total_worked_display(&self) -> Option<String> {
        self.total_worked_minutes
            .map(|m| format!("{}:{:02}", m / 60, m % 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_row() -> Row {
        Row {
            packet: Packet::default(),
            bucket: Bucket::Simple,
            segments: vec![],
            ot_pay_type: Some(PayType::Ot),
            cte_preferred: false,
            lpi_minutes: 0,
            lpi_pay_type: Some(LpiPayType::Unknown),
            total_worked_minutes: Some(485),
            total_worked_hours: None,
            shape: Some(Shape::B),
            status: RowStatus::Pending,
            flagged: false,
            annotation: None,
            suggested_leave_code: None,
            audit_trace: vec![],
        }
    }

    /// RS-001: every legal edge is accepted
    #[test]
    fn test_legal_transitions_succeed() {
        for (from, to) in RowStatus::LEGAL_TRANSITIONS {
            assert_eq!(from.transition(to).unwrap(), to);
        }
    }

    /// RS-002: anything off the edge list is rejected
    #[test]
    fn test_illegal_transitions_fail() {
        let all = [
            RowStatus::Pending,
            RowStatus::Reviewed,
            RowStatus::Completed,
            RowStatus::Skipping,
        ];
        for from in all {
            for to in all {
                let legal = RowStatus::LEGAL_TRANSITIONS.contains(&(from, to));
                assert_eq!(from.transition(to).is_ok(), legal, "{} -> {}", from, to);
            }
        }
        assert!(matches!(
            RowStatus::Completed.transition(RowStatus::Pending),
            Err(EngineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_row_transition_and_flag_are_independent() {
        let mut row = pending_row();
        row.toggle_flag();
        row.transition(RowStatus::Reviewed).unwrap();
        assert!(row.flagged);
        row.toggle_flag();
        row.transition(RowStatus::Completed).unwrap();
        assert!(!row.flagged);
        assert_eq!(row.status, RowStatus::Completed);
        assert!(row.transition(RowStatus::Skipping).is_err());
        assert_eq!(row.status, RowStatus::Completed);
    }

    #[test]
    fn test_total_worked_display() {
        assert_eq!(pending_row().total_worked_display().as_deref(), Some("8:05"));
    }

    #[test]
    fn test_bucket_and_status_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&Bucket::ConditionOrAlternate).unwrap(),
            "\"condition_or_alternate\""
        );
        assert_eq!(serde_json::to_string(&Bucket::ExbShine).unwrap(), "\"exb_shine\"");
        assert_eq!(serde_json::to_string(&RowStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(Bucket::ExbShine.to_string(), "exb_shine");
    }
}
