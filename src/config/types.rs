//! Configuration types for the segment engine.
//!
//! Every type here has a `Default` carrying the built-in values, so a run can
//! proceed without any files. The YAML files only need to name what differs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::PayType;

/// The sentinel row text that ends the operator section of the document.
pub const TRANSIT_SUPERVISOR_SENTINEL: &str = "TRANSIT SUPERVISOR";

/// Options that change how segments are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    /// Always fold LPI minutes into the single OT/CTE segment (never Shape C).
    pub ot_includes_lpi: bool,
    /// Pad shifts shorter than 8 hours with a GUARANTEE segment.
    pub guarantee_short_shifts: bool,
    /// LPI overruns at or under this many minutes count as zero.
    pub lpi_tolerance_minutes: u32,
}

/// Which packet field an uncertainty signal inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalField {
    /// Notes text.
    Notes,
    /// Scheduled-run text.
    ScheduledRun,
    /// Block id.
    Block,
    /// The upstream bleed hint. Keywords are ignored.
    PotentialBleed,
}

/// A configured reason to defer a packet to manual entry.
///
/// Fires when the chosen field contains any keyword (case-insensitive).
///
/// ```yaml
/// - tag: extraboard
///   field: block
///   keywords: [EXB]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncertaintySignal {
    /// Exclusion tag emitted when the signal fires.
    pub tag: String,
    /// Field to inspect.
    pub field: SignalField,
    /// Case-insensitive substrings.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Keyword patterns behind the `alt`, `exb_shine` and `exb` buckets.
///
/// All matching is case-insensitive substring matching over notes,
/// scheduled-run and block text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketPatterns {
    /// Alternate-day assignment markers.
    pub alternate_day: Vec<String>,
    /// Extraboard markers.
    pub extraboard: Vec<String>,
    /// Shine-run markers. Only meaningful together with an extraboard marker.
    pub shine: Vec<String>,
}

impl Default for BucketPatterns {
    fn default() -> Self {
        Self {
            alternate_day: vec!["ALT DAY".to_string(), "ALTERNATE DAY".to_string()],
            extraboard: vec!["EXB".to_string()],
            shine: vec!["SHINE".to_string()],
        }
    }
}

/// Labor codes for each segment label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborCodes {
    /// Regular time.
    pub reg: String,
    /// Standard overtime.
    pub ot: String,
    /// Compensatory time earned.
    pub cte: String,
    /// Minimum guarantee.
    pub guarantee: String,
    /// Leave label (upper case) to code.
    pub leave: BTreeMap<String, String>,
}

impl Default for LaborCodes {
    fn default() -> Self {
        let leave = [
            ("SICK", "3009"),
            ("FMLA SICK", "2024"),
            ("VACATION", "3008"),
            ("FMLA VACATION", "2025"),
            ("ADMIN LEAVE", "3010"),
            ("CT PAY", "3003"),
        ]
        .into_iter()
        .map(|(label, code)| (label.to_string(), code.to_string()))
        .collect();

        Self {
            reg: "1020".to_string(),
            ot: "1013".to_string(),
            cte: "3002".to_string(),
            guarantee: "1000".to_string(),
            leave,
        }
    }
}

impl LaborCodes {
    /// Code for an overtime pay type.
    pub fn pay_code(&self, pay_type: PayType) -> &str {
        match pay_type {
            PayType::Ot => &self.ot,
            PayType::Cte => &self.cte,
        }
    }

    /// The leave entry whose label appears in `text`.
    ///
    /// When several labels match, the longest wins, so "FMLA SICK" beats
    /// "SICK".
    pub fn match_leave(&self, text: &str) -> Option<(&str, &str)> {
        let haystack = text.to_uppercase();
        self.leave
            .iter()
            .filter(|(label, _)| !label.is_empty() && haystack.contains(label.to_uppercase().as_str()))
            .max_by_key(|(label, _)| label.len())
            .map(|(label, code)| (label.as_str(), code.as_str()))
    }
}

/// Per-run engine configuration. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sentinel row text.
    pub sentinel: String,
    /// Segment layout options.
    pub segments: SegmentOptions,
    /// Extra exclusion triggers.
    pub uncertainty_signals: Vec<UncertaintySignal>,
    /// Bucket keyword patterns.
    pub buckets: BucketPatterns,
    /// Labor code table. Loaded from its own file.
    #[serde(skip)]
    pub labor_codes: LaborCodes,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sentinel: TRANSIT_SUPERVISOR_SENTINEL.to_string(),
            segments: SegmentOptions::default(),
            uncertainty_signals: Vec::new(),
            buckets: BucketPatterns::default(),
            labor_codes: LaborCodes::default(),
        }
    }
}

/// Employee id to "prefers CTE" mapping.
///
/// Owned by the caller and passed into each run by reference.
///
/// # Example
///
/// ```
/// use segment_engine::config::PreferenceMap;
///
/// let prefs = PreferenceMap::from_ids(["2964", "3011"]);
/// assert!(prefs.prefers_cte("2964"));
/// assert!(!prefs.prefers_cte("1234"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceMap(BTreeMap<String, bool>);

impl PreferenceMap {
    /// An empty mapping: nobody prefers CTE.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every listed id prefers CTE.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(|id| (id.into(), true)).collect())
    }

    /// The mapped value, if the id is present.
    pub fn get(&self, employee_id: &str) -> Option<bool> {
        self.0.get(employee_id.trim()).copied()
    }

    /// True only when the id is present and mapped to `true`.
    pub fn prefers_cte(&self, employee_id: &str) -> bool {
        self.get(employee_id).unwrap_or(false)
    }

    /// Number of mapped ids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, bool)> for PreferenceMap {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
