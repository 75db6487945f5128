//! Segment model and pay types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ClockTime;

/// The label printed on a time segment.
///
/// Leave labels are free-form (upper-cased) so new leave types only need a
/// code-table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SegmentLabel {
    /// Regular time.
    Reg,
    /// Standard overtime.
    Ot,
    /// Compensatory time earned in place of overtime pay.
    Cte,
    /// Minutes worked past the scheduled end under a distinct pay type.
    Lpi,
    /// Minimum-guarantee top-up.
    Guarantee,
    /// A leave type such as `SICK` or `VACATION`.
    Leave(String),
}

impl SegmentLabel {
    /// The printed label.
    pub fn as_str(&self) -> &str {
        match self {
            SegmentLabel::Reg => "REG",
            SegmentLabel::Ot => "OT",
            SegmentLabel::Cte => "CTE",
            SegmentLabel::Lpi => "LPI",
            SegmentLabel::Guarantee => "GUARANTEE",
            SegmentLabel::Leave(label) => label,
        }
    }
}

impl From<String> for SegmentLabel {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "REG" => SegmentLabel::Reg,
            "OT" => SegmentLabel::Ot,
            "CTE" => SegmentLabel::Cte,
            "LPI" => SegmentLabel::Lpi,
            "GUARANTEE" => SegmentLabel::Guarantee,
            other => SegmentLabel::Leave(other.to_string()),
        }
    }
}

impl From<SegmentLabel> for String {
    fn from(label: SegmentLabel) -> Self {
        match label {
            SegmentLabel::Leave(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for SegmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How overtime minutes are paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayType {
    /// Standard overtime pay.
    #[serde(rename = "OT")]
    Ot,
    /// Compensatory time earned.
    #[serde(rename = "CTE")]
    Cte,
}

impl PayType {
    /// The segment label used for an overtime segment of this pay type.
    pub fn label(self) -> SegmentLabel {
        match self {
            PayType::Ot => SegmentLabel::Ot,
            PayType::Cte => SegmentLabel::Cte,
        }
    }
}

/// Pay treatment of LPI minutes, as read from the notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LpiPayType {
    /// Notes say LPI is paid as overtime.
    #[serde(rename = "OT")]
    Ot,
    /// Notes say LPI is paid as CTE.
    #[serde(rename = "CTE")]
    Cte,
    /// Notes do not say.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl LpiPayType {
    /// The concrete pay type, if the notes named one.
    pub fn pay_type(self) -> Option<PayType> {
        match self {
            LpiPayType::Ot => Some(PayType::Ot),
            LpiPayType::Cte => Some(PayType::Cte),
            LpiPayType::Unknown => None,
        }
    }
}

/// One contiguous block of time with its labor code.
///
/// # Example
///
/// ```
/// use segment_engine::models::{Segment, SegmentLabel};
///
/// let segment = Segment {
///     label: SegmentLabel::Reg,
///     start: "22:00".parse().unwrap(),
///     end: "06:00".parse().unwrap(),
///     code: "1020".to_string(),
/// };
/// assert_eq!(segment.duration_minutes(), 480);
/// assert!(segment.crosses_midnight());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// What kind of time this is.
    pub label: SegmentLabel,
    /// Segment start.
    pub start: ClockTime,
    /// Segment end.
    pub end: ClockTime,
    /// Labor code to enter.
    pub code: String,
}

impl Segment {
    /// Length of the segment, wrapping past midnight.
    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }

    /// True when the end is numerically earlier than the start.
    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parses_known_and_leave_names() {
        assert_eq!(SegmentLabel::from("reg".to_string()), SegmentLabel::Reg);
        assert_eq!(SegmentLabel::from("GUARANTEE".to_string()), SegmentLabel::Guarantee);
        assert_eq!(
            SegmentLabel::from("fmla sick".to_string()),
            SegmentLabel::Leave("FMLA SICK".to_string())
        );
    }

    #[test]
    fn test_pay_type_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&PayType::Cte).unwrap(), "\"CTE\"");
        assert_eq!(serde_json::to_string(&LpiPayType::Unknown).unwrap(), "\"UNKNOWN\"");
    }

    #[test]
    fn test_segment_serialization() {
        let segment = Segment {
            label: SegmentLabel::Lpi,
            start: "14:30".parse().unwrap(),
            end: "16:00".parse().unwrap(),
            code: "3002".to_string(),
        };
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"label": "LPI", "start": "14:30", "end": "16:00", "code": "3002"})
        );
        assert_eq!(segment.duration_minutes(), 90);
        assert!(!segment.crosses_midnight());
    }
}
