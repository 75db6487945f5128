//! 24-hour clock times with midnight wraparound.
//!
//! Shift records only carry wall-clock times, never dates, so every duration
//! in the engine is a forward span on a 1440-minute dial.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day, stored as minutes since midnight.
///
/// Serializes as a zero-padded `HH:MM` string.
///
/// # Example
///
/// ```
/// use segment_engine::models::ClockTime;
///
/// let start: ClockTime = "22:00".parse().unwrap();
/// let end: ClockTime = "6:30".parse().unwrap();
/// assert_eq!(start.minutes_until(end), 510);
/// assert_eq!(end.to_string(), "06:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Midnight.
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Builds a clock time from minutes, wrapping past midnight.
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes % MINUTES_PER_DAY)
    }

    /// Parses `H:MM` or `HH:MM` (hours 0-23, minutes 0-59).
    ///
    /// Surrounding whitespace is ignored. Anything else is rejected with
    /// [`EngineError::InvalidTime`].
    pub fn parse(value: &str) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidTime {
            value: value.to_string(),
        };

        let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
        let hours_ok = (1..=2).contains(&hours.len()) && hours.bytes().all(|b| b.is_ascii_digit());
        let minutes_ok = minutes.len() == 2 && minutes.bytes().all(|b| b.is_ascii_digit());
        if !hours_ok || !minutes_ok {
            return Err(invalid());
        }

        let hours: u32 = hours.parse().map_err(|_| invalid())?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }

        Ok(Self(hours * 60 + minutes))
    }

    /// Parses an optional field, treating absent or malformed values as `None`.
    pub fn parse_optional(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| Self::parse(v).ok())
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        self.0
    }

    /// The time `minutes` later, wrapping past midnight.
    pub fn add_minutes(self, minutes: u32) -> Self {
        Self::from_minutes(self.0 + minutes % MINUTES_PER_DAY)
    }

    /// Forward span from `self` to `later`.
    ///
    /// An earlier `later` means the span crosses midnight.
    pub fn minutes_until(self, later: ClockTime) -> u32 {
        if later.0 >= self.0 {
            later.0 - self.0
        } else {
            MINUTES_PER_DAY - self.0 + later.0
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
