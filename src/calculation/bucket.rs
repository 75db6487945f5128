//! Triage bucket classification.
//!
//! Buckets are an ordered list of predicate rules; the first rule that
//! matches wins. The bucket is independent of inclusion: an excluded packet
//! still gets one.

use serde::{Deserialize, Serialize};

use super::keywords::contains_any;
use crate::config::BucketPatterns;
use crate::models::{AuditStep, Bucket, ExclusionTag, Packet};

/// Everything a bucket rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct BucketContext<'a> {
    /// The packet being classified.
    pub packet: &'a Packet,
    /// Exclusion tags from the evaluator.
    pub exclusion_tags: &'a [ExclusionTag],
    /// Worked minutes, if computable.
    pub worked_minutes: Option<u32>,
    /// LPI minutes (zero when not computable).
    pub lpi_minutes: u32,
    /// Configured keyword patterns.
    pub patterns: &'a BucketPatterns,
}

impl BucketContext<'_> {
    fn assignment_text(&self) -> String {
        format!(
            "{} {} {}",
            self.packet.notes_text, self.packet.scheduled_run, self.packet.block
        )
    }

    fn is_extraboard(&self) -> bool {
        contains_any(&self.assignment_text(), &self.patterns.extraboard)
    }
}

/// One rule in the cascade.
#[derive(Clone, Copy)]
pub struct BucketRule {
    /// Bucket assigned when the rule matches.
    pub bucket: Bucket,
    /// Stable rule identifier for the audit trace.
    pub rule_id: &'static str,
    /// The predicate.
    pub matches: fn(&BucketContext<'_>) -> bool,
}

/// The cascade, highest priority first. The last rule always matches.
pub static BUCKET_RULES: [BucketRule; 7] = [
    BucketRule {
        bucket: Bucket::ConditionOrAlternate,
        rule_id: "condition_or_alternate",
        matches: |ctx| ctx.packet.has_primary_condition() || ctx.packet.alternate_driver_present,
    },
    BucketRule {
        bucket: Bucket::Alt,
        rule_id: "alternate_day_assignment",
        matches: |ctx| {
            let text = format!("{} {}", ctx.packet.notes_text, ctx.packet.scheduled_run);
            contains_any(&text, &ctx.patterns.alternate_day)
        },
    },
    BucketRule {
        bucket: Bucket::ExbShine,
        rule_id: "extraboard_shine",
        matches: |ctx| ctx.is_extraboard() && contains_any(&ctx.assignment_text(), &ctx.patterns.shine),
    },
    BucketRule {
        bucket: Bucket::Exb,
        rule_id: "extraboard",
        matches: |ctx| ctx.is_extraboard(),
    },
    BucketRule {
        bucket: Bucket::Lpi,
        rule_id: "lpi_minutes",
        matches: |ctx| ctx.lpi_minutes > 0,
    },
    BucketRule {
        bucket: Bucket::Simple,
        rule_id: "simple",
        matches: |ctx| {
            ctx.worked_minutes.is_some() && ctx.exclusion_tags.is_empty() && ctx.lpi_minutes == 0
        },
    },
    BucketRule {
        bucket: Bucket::Other,
        rule_id: "fallback",
        matches: |_| true,
    },
];

/// The chosen bucket and its audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketClassification {
    /// The assigned bucket.
    pub bucket: Bucket,
    /// The audit step recording which rule matched.
    pub audit_step: AuditStep,
}

/// Assigns exactly one bucket using [`BUCKET_RULES`].
pub fn classify_bucket(ctx: &BucketContext<'_>, step_number: u32) -> BucketClassification {
    let rule = BUCKET_RULES
        .iter()
        .find(|rule| (rule.matches)(ctx))
        .unwrap_or(&BUCKET_RULES[BUCKET_RULES.len() - 1]);

    let audit_step = AuditStep {
        step_number,
        rule_id: "bucket_classification".to_string(),
        rule_name: "Bucket Classification".to_string(),
        input: serde_json::json!({
            "primary_condition_text": ctx.packet.primary_condition_text,
            "alternate_driver_present": ctx.packet.alternate_driver_present,
            "notes_text": ctx.packet.notes_text,
            "scheduled_run": ctx.packet.scheduled_run,
            "block": ctx.packet.block,
            "worked_minutes": ctx.worked_minutes,
            "lpi_minutes": ctx.lpi_minutes,
            "exclusion_tags": ctx.exclusion_tags
        }),
        output: serde_json::json!({ "bucket": rule.bucket }),
        reasoning: format!("Matched rule '{}' -> {}", rule.rule_id, rule.bucket),
    };

    BucketClassification {
        bucket: rule.bucket,
        audit_step,
    }
}
