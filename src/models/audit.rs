//! Audit records for row decisions.
//!
//! Every rule the engine applies to a packet leaves an [`AuditStep`] on the
//! resulting row, so an operator can see why a suggestion was (or was not)
//! generated.

use serde::{Deserialize, Serialize};

/// A single step in a row's audit trace.
///
/// # Example
///
/// ```
/// use segment_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "exclusion_evaluation".to_string(),
///     rule_name: "Exclusion Evaluation".to_string(),
///     input: serde_json::json!({"alternate_driver_present": true}),
///     output: serde_json::json!({"tags": ["alternate_driver"]}),
///     reasoning: "1 exclusion trigger fired: alternate_driver".to_string(),
/// };
/// assert_eq!(step.rule_id, "exclusion_evaluation");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// Position of this step within the row's trace.
    pub step_number: u32,
    /// Stable identifier of the rule.
    pub rule_id: String,
    /// Human-readable rule name.
    pub rule_name: String,
    /// What the rule looked at.
    pub input: serde_json::Value,
    /// What the rule decided.
    pub output: serde_json::Value,
    /// Plain-language explanation of the decision.
    pub reasoning: String,
}
