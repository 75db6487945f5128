//! Sentinel detection.
//!
//! The operations sheet lists operators first and supervisors after a
//! `TRANSIT SUPERVISOR` row. Everything from that row down is dropped.

use serde::{Deserialize, Serialize};

use crate::models::Packet;

/// Where the packet stream was cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopDetection {
    /// Packets strictly before the sentinel.
    pub detected: usize,
    /// 1-based position of the sentinel, or `len + 1` if absent.
    pub stopped_at_row: usize,
    /// Whether a sentinel row was found.
    pub sentinel_found: bool,
}

/// Finds the first sentinel row.
///
/// # Example
///
/// ```
/// use segment_engine::calculation::detect_stop;
/// use segment_engine::models::Packet;
///
/// let named = |name: &str| Packet { employee_name: name.to_string(), ..Packet::default() };
/// let packets = vec![named("A"), named("B"), named("Transit Supervisor"), named("C")];
///
/// let stop = detect_stop(&packets, "TRANSIT SUPERVISOR");
/// assert_eq!(stop.detected, 2);
/// assert_eq!(stop.stopped_at_row, 3);
/// ```
pub fn detect_stop(packets: &[Packet], sentinel: &str) -> StopDetection {
    match packets.iter().position(|p| p.is_sentinel(sentinel)) {
        Some(index) => StopDetection {
            detected: index,
            stopped_at_row: index + 1,
            sentinel_found: true,
        },
        None => StopDetection {
            detected: packets.len(),
            stopped_at_row: packets.len() + 1,
            sentinel_found: false,
        },
    }
}

/// The packets before the sentinel, plus the detection that cut them.
pub fn truncate_at_sentinel<'a>(
    packets: &'a [Packet],
    sentinel: &str,
) -> (&'a [Packet], StopDetection) {
    let stop = detect_stop(packets, sentinel);
    (&packets[..stop.detected], stop)
}
