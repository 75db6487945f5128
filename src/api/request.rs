//! Request types for the segment engine API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::PreferenceMap;
use crate::models::{Packet, Row};

/// Reads each packet on its own; one unreadable record becomes a single
/// excluded packet instead of failing the whole request.
fn packets_one_by_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Packet>, D::Error> {
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, value)| match Packet::deserialize(&value) {
            Ok(packet) => packet,
            Err(err) => {
                warn!(index, error = %err, "Unreadable packet routed to manual entry");
                Packet::unreadable(&value)
            }
        })
        .collect())
}

/// Request body for `POST /api/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Packets in source order, sentinel row included if present.
    #[serde(deserialize_with = "packets_one_by_one")]
    pub packets: Vec<Packet>,
    /// Preference mapping for this run. Falls back to the loaded mapping.
    #[serde(default)]
    pub preferences: Option<PreferenceMap>,
    /// Work date applied to every row.
    #[serde(default)]
    pub work_date_override: Option<String>,
}

/// Request body for `POST /api/export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Reviewed rows. Only `completed` ones are exported.
    pub rows: Vec<Row>,
}
