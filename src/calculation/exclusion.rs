//! Exclusion evaluation.
//!
//! Every trigger is evaluated and every tag that fires is kept. A packet with
//! any tag is routed to manual entry; nothing here tries to resolve the
//! ambiguity it found.

use serde::{Deserialize, Serialize};

use super::keywords::contains_any;
use crate::config::{SignalField, UncertaintySignal};
use crate::models::{AuditStep, ClockTime, ExclusionTag, Packet};

/// The outcome of evaluating exclusion triggers for one packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionEvaluation {
    /// Every tag that fired, in rule order, without duplicates.
    pub tags: Vec<ExclusionTag>,
    /// The audit step recording the evaluation.
    pub audit_step: AuditStep,
}

impl ExclusionEvaluation {
    /// True when no trigger fired.
    pub fn is_included(&self) -> bool {
        self.tags.is_empty()
    }
}

/// A built-in trigger: a predicate and the tag it emits.
struct ExclusionRule {
    tag: ExclusionTag,
    fires: fn(&Packet) -> bool,
}

fn built_in_rules() -> [ExclusionRule; 4] {
    [
        ExclusionRule {
            tag: ExclusionTag::MissingIdentity,
            fires: |p| p.employee_id.trim().is_empty(),
        },
        ExclusionRule {
            tag: ExclusionTag::AlternateDriver,
            fires: |p| p.alternate_driver_present,
        },
        ExclusionRule {
            tag: ExclusionTag::PrimaryCondition,
            fires: Packet::has_primary_condition,
        },
        ExclusionRule {
            tag: ExclusionTag::MissingTime,
            fires: |p| {
                [
                    &p.actual_start_time,
                    &p.actual_end_time,
                    &p.scheduled_end_time,
                ]
                .into_iter()
                .any(|t| ClockTime::parse_optional(t.as_deref()).is_none())
            },
        },
    ]
}

fn signal_fires(signal: &UncertaintySignal, packet: &Packet) -> bool {
    let text = match signal.field {
        SignalField::Notes => &packet.notes_text,
        SignalField::ScheduledRun => &packet.scheduled_run,
        SignalField::Block => &packet.block,
        SignalField::PotentialBleed => return packet.potential_bleed,
    };
    contains_any(text, &signal.keywords)
}

/// Evaluates every exclusion trigger against a packet.
///
/// Tags already present on the packet are kept first, then the built-in
/// triggers (`missing_identity`, `alternate_driver`, `primary_condition`,
/// `missing_time`), then each configured signal.
///
/// # Example
///
/// ```
/// use segment_engine::calculation::evaluate_exclusions;
/// use segment_engine::models::{ExclusionTag, Packet};
///
/// let packet = Packet {
///     employee_id: "2964".to_string(),
///     alternate_driver_present: true,
///     primary_condition_text: "Sick continued".to_string(),
///     ..Packet::default()
/// };
///
/// let evaluation = evaluate_exclusions(&packet, &[], 1);
/// assert_eq!(
///     evaluation.tags,
///     vec![ExclusionTag::AlternateDriver, ExclusionTag::PrimaryCondition, ExclusionTag::MissingTime]
/// );
/// ```
pub fn evaluate_exclusions(
    packet: &Packet,
    signals: &[UncertaintySignal],
    step_number: u32,
) -> ExclusionEvaluation {
    let mut tags: Vec<ExclusionTag> = Vec::new();
    let mut push = |tag: ExclusionTag| {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    };

    for tag in &packet.exclusion_tags {
        push(tag.clone());
    }
    for rule in built_in_rules() {
        if (rule.fires)(packet) {
            push(rule.tag);
        }
    }
    for signal in signals {
        if signal_fires(signal, packet) {
            push(ExclusionTag::Signal(signal.tag.clone()));
        }
    }

    let tag_names: Vec<&str> = tags.iter().map(ExclusionTag::as_str).collect();
    let reasoning = if tags.is_empty() {
        "No exclusion trigger fired; segments may be generated".to_string()
    } else {
        format!(
            "{} exclusion trigger(s) fired: {}; deferred to manual entry",
            tags.len(),
            tag_names.join(", ")
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "exclusion_evaluation".to_string(),
        rule_name: "Exclusion Evaluation".to_string(),
        input: serde_json::json!({
            "employee_id": packet.employee_id,
            "alternate_driver_present": packet.alternate_driver_present,
            "primary_condition_text": packet.primary_condition_text,
            "actual_start_time": packet.actual_start_time,
            "actual_end_time": packet.actual_end_time,
            "scheduled_end_time": packet.scheduled_end_time,
            "signals_configured": signals.len()
        }),
        output: serde_json::json!({ "tags": tag_names }),
        reasoning,
    };

    ExclusionEvaluation { tags, audit_step }
}
