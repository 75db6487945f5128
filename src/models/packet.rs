//! Packet model and exclusion tags.
//!
//! A [`Packet`] is one employee-day shift record as produced by the upstream
//! extraction step. The engine never mutates its input packets; the copy
//! carried on each output row has its `exclusion_tags` filled in.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ClockTime;

/// Why a packet was routed to manual entry.
///
/// Serialized as a snake_case string. Tags produced by configured
/// uncertainty signals round-trip through [`ExclusionTag::Signal`].
///
/// # Example
///
/// ```
/// use segment_engine::models::ExclusionTag;
///
/// assert_eq!(ExclusionTag::MissingTime.as_str(), "missing_time");
/// assert_eq!(ExclusionTag::from("extraboard".to_string()), ExclusionTag::Signal("extraboard".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExclusionTag {
    /// An alternate driver was recorded against the run.
    AlternateDriver,
    /// The primary-condition column was not empty.
    PrimaryCondition,
    /// A required time was absent or not a valid `HH:MM`.
    MissingTime,
    /// The packet has no usable employee id.
    MissingIdentity,
    /// Generated segments failed verification.
    SegmentMismatch,
    /// The record could not be read as a packet.
    MalformedPacket,
    /// A configured uncertainty signal fired.
    Signal(String),
}

impl ExclusionTag {
    /// The wire name of this tag.
    pub fn as_str(&self) -> &str {
        match self {
            ExclusionTag::AlternateDriver => "alternate_driver",
            ExclusionTag::PrimaryCondition => "primary_condition",
            ExclusionTag::MissingTime => "missing_time",
            ExclusionTag::MissingIdentity => "missing_identity",
            ExclusionTag::SegmentMismatch => "segment_mismatch",
            ExclusionTag::MalformedPacket => "malformed_packet",
            ExclusionTag::Signal(tag) => tag,
        }
    }
}

impl From<String> for ExclusionTag {
    fn from(value: String) -> Self {
        match value.as_str() {
            "alternate_driver" => ExclusionTag::AlternateDriver,
            "primary_condition" => ExclusionTag::PrimaryCondition,
            "missing_time" => ExclusionTag::MissingTime,
            "missing_identity" => ExclusionTag::MissingIdentity,
            "segment_mismatch" => ExclusionTag::SegmentMismatch,
            "malformed_packet" => ExclusionTag::MalformedPacket,
            _ => ExclusionTag::Signal(value),
        }
    }
}

impl From<ExclusionTag> for String {
    fn from(tag: ExclusionTag) -> Self {
        match tag {
            ExclusionTag::Signal(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExclusionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts an id written as text or as a bare integer.
fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Reads a field as text if it is a string or a number.
fn readable_text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

/// One employee-day shift record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Packet {
    /// Employee id (digits in practice; kept as text).
    #[serde(default, deserialize_with = "id_text")]
    pub employee_id: String,
    /// Employee display name. Also the text the sentinel row is matched on.
    #[serde(default)]
    pub employee_name: String,
    /// Work date as printed on the source document.
    #[serde(default)]
    pub work_date: String,
    /// Actual start, `HH:MM`.
    #[serde(default)]
    pub actual_start_time: Option<String>,
    /// Actual end, `HH:MM`.
    #[serde(default)]
    pub actual_end_time: Option<String>,
    /// Scheduled end, `HH:MM`. Source of truth for LPI.
    #[serde(default)]
    pub scheduled_end_time: Option<String>,
    /// The scheduled run as printed, e.g. `03:43-12:22`.
    #[serde(default)]
    pub scheduled_run: String,
    /// Block id, e.g. `1001` or `EXB`.
    #[serde(default)]
    pub block: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes_text: String,
    /// Whether an alternate driver was recorded against the run.
    #[serde(default)]
    pub alternate_driver_present: bool,
    /// Free-text primary condition (sick, vacation, ...).
    #[serde(default)]
    pub primary_condition_text: String,
    /// Exclusion tags. Empty on input; filled on output rows.
    #[serde(default)]
    pub exclusion_tags: Vec<ExclusionTag>,
    /// Upstream hint that notes may have bled in from a neighbouring row.
    #[serde(default)]
    pub potential_bleed: bool,
    /// Alternate driver's employee id, when one is recorded.
    #[serde(default)]
    pub alternate_employee_id: Option<String>,
    /// Alternate driver's name, when one is recorded.
    #[serde(default)]
    pub alternate_name: Option<String>,
}

impl Packet {
    /// Stand-in for a record that could not be read as a packet.
    ///
    /// Keeps whatever identity is readable so the row can still be found
    /// and so a sentinel row is still recognised, and carries the
    /// `malformed_packet` tag.
    ///
    /// # Example
    ///
    /// ```
    /// use segment_engine::models::{ExclusionTag, Packet};
    ///
    /// let raw = serde_json::json!({ "employee_id": 3011, "alternate_driver_present": "yes" });
    /// let packet = Packet::unreadable(&raw);
    /// assert_eq!(packet.employee_id, "3011");
    /// assert_eq!(packet.exclusion_tags, vec![ExclusionTag::MalformedPacket]);
    /// ```
    pub fn unreadable(raw: &Value) -> Self {
        Self {
            employee_id: readable_text(raw, "employee_id"),
            employee_name: readable_text(raw, "employee_name"),
            work_date: readable_text(raw, "work_date"),
            exclusion_tags: vec![ExclusionTag::MalformedPacket],
            ..Self::default()
        }
    }

    /// The text the stop detector compares against the sentinel.
    pub fn identifying_text(&self) -> &str {
        &self.employee_name
    }

    /// True when the identifying text equals `sentinel`, ignoring case and
    /// surrounding whitespace.
    pub fn is_sentinel(&self, sentinel: &str) -> bool {
        self.identifying_text()
            .trim()
            .eq_ignore_ascii_case(sentinel.trim())
    }

    /// Parsed actual start, if valid.
    pub fn actual_start(&self) -> Option<ClockTime> {
        ClockTime::parse_optional(self.actual_start_time.as_deref())
    }

    /// Parsed actual end, if valid.
    pub fn actual_end(&self) -> Option<ClockTime> {
        ClockTime::parse_optional(self.actual_end_time.as_deref())
    }

    /// Parsed scheduled end, if valid.
    pub fn scheduled_end(&self) -> Option<ClockTime> {
        ClockTime::parse_optional(self.scheduled_end_time.as_deref())
    }

    /// Whether the primary-condition column carries any text.
    pub fn has_primary_condition(&self) -> bool {
        !self.primary_condition_text.trim().is_empty()
    }

    /// Worked minutes from actual start to actual end, if both are valid.
    pub fn worked_minutes(&self) -> Option<u32> {
        Some(self.actual_start()?.minutes_until(self.actual_end()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(start: Option<&str>, end: Option<&str>) -> Packet {
        Packet {
            employee_id: "2964".to_string(),
            employee_name: "Adelaida Robledo".to_string(),
            work_date: "02/12/2026".to_string(),
            actual_start_time: start.map(str::to_string),
            actual_end_time: end.map(str::to_string),
            scheduled_end_time: Some("14:30".to_string()),
            ..Packet::default()
        }
    }

    #[test]
    fn test_sentinel_match_ignores_case_and_whitespace() {
        let mut p = Packet::default();
        p.employee_name = "  transit supervisor ".to_string();
        assert!(p.is_sentinel("TRANSIT SUPERVISOR"));

        p.employee_name = "TRANSIT SUPERVISOR ON DUTY".to_string();
        assert!(!p.is_sentinel("TRANSIT SUPERVISOR"));
    }

    #[test]
    fn test_worked_minutes_crosses_midnight() {
        assert_eq!(packet(Some("06:00"), Some("16:00")).worked_minutes(), Some(600));
        assert_eq!(packet(Some("22:00"), Some("02:00")).worked_minutes(), Some(240));
        assert_eq!(packet(None, Some("02:00")).worked_minutes(), None);
        assert_eq!(packet(Some("6"), Some("02:00")).worked_minutes(), None);
    }

    #[test]
    fn test_exclusion_tag_round_trips_through_string() {
        let tags = vec![
            ExclusionTag::AlternateDriver,
            ExclusionTag::MissingTime,
            ExclusionTag::Signal("extraboard".to_string()),
        ];
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"["alternate_driver","missing_time","extraboard"]"#);
        let back: Vec<ExclusionTag> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tags);
    }

    #[test]
    fn test_packet_deserializes_with_defaults() {
        let json = r#"{
            "employee_id": "3011",
            "employee_name": "Sam Ortiz",
            "actual_start_time": "05:10",
            "actual_end_time": "13:10"
        }"#;
        let p: Packet = serde_json::from_str(json).unwrap();
        assert_eq!(p.employee_id, "3011");
        assert_eq!(p.scheduled_end_time, None);
        assert!(p.exclusion_tags.is_empty());
        assert!(!p.alternate_driver_present);
    }

    #[test]
    fn test_numeric_employee_id_is_accepted() {
        let p: Packet = serde_json::from_str(r#"{"employee_id": 3011, "employee_name": "Sam Ortiz"}"#)
            .unwrap();
        assert_eq!(p.employee_id, "3011");
    }

    #[test]
    fn test_unreadable_keeps_identity() {
        let raw = serde_json::json!({
            "employee_id": "2964",
            "employee_name": "Adelaida Robledo",
            "work_date": "02/12/2026",
            "alternate_driver_present": "yes"
        });
        assert!(Packet::deserialize(&raw).is_err());

        let p = Packet::unreadable(&raw);
        assert_eq!(p.employee_id, "2964");
        assert_eq!(p.employee_name, "Adelaida Robledo");
        assert_eq!(p.work_date, "02/12/2026");
        assert!(!p.alternate_driver_present);
        assert_eq!(p.exclusion_tags, vec![ExclusionTag::MalformedPacket]);
        assert_eq!(ExclusionTag::MalformedPacket.as_str(), "malformed_packet");

        let p = Packet::unreadable(&serde_json::json!(42));
        assert!(p.employee_id.is_empty());
    }
}
