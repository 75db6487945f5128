//! The per-run pipeline.
//!
//! `process_run` is a pure function of its inputs: packets, an immutable
//! engine configuration and a preference mapping. It performs no I/O and
//! holds no state between calls.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::bucket::{BucketContext, classify_bucket};
use super::exclusion::evaluate_exclusions;
use super::preference::resolve_overtime_preference;
use super::segment_builder::build_segments;
use super::shape::{ShiftTimes, lpi_pay_type_from_notes, select_shape};
use super::stop_detector::truncate_at_sentinel;
use super::summary::summarize;
use crate::config::{EngineConfig, PreferenceMap};
use crate::models::{ExclusionTag, Packet, Row, RowStatus, RunResult};

/// Notes text that marks a row for a second look.
const PAID_AS_MARKER: &str = "paid as ";

fn resolve_work_date(packets: &[Packet], work_date_override: Option<&str>) -> String {
    match work_date_override.map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => date.to_string(),
        None => packets
            .iter()
            .map(|p| p.work_date.trim())
            .find(|d| !d.is_empty())
            .unwrap_or_default()
            .to_string(),
    }
}

fn worked_hours(minutes: u32) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(2)
}

fn initially_flagged(packet: &Packet) -> bool {
    packet.potential_bleed || packet.notes_text.to_lowercase().contains(PAID_AS_MARKER)
}

fn shift_times(packet: &Packet) -> Option<ShiftTimes> {
    Some(ShiftTimes {
        actual_start: packet.actual_start()?,
        actual_end: packet.actual_end()?,
        scheduled_end: packet.scheduled_end()?,
    })
}

/// Builds the row for one packet.
fn process_packet(
    mut packet: Packet,
    work_date: &str,
    override_given: bool,
    config: &EngineConfig,
    preferences: &PreferenceMap,
) -> Row {
    if override_given || packet.work_date.trim().is_empty() {
        packet.work_date = work_date.to_string();
    }

    let codes = &config.labor_codes;
    let options = &config.segments;
    let mut audit_trace = Vec::new();

    let exclusion = evaluate_exclusions(&packet, &config.uncertainty_signals, 1);
    audit_trace.push(exclusion.audit_step);

    let times = shift_times(&packet);
    let total_worked_minutes = packet.worked_minutes();
    let lpi_minutes = times
        .map(|t| t.lpi_minutes(options.lpi_tolerance_minutes))
        .unwrap_or(0);

    let classification = classify_bucket(
        &BucketContext {
            packet: &packet,
            exclusion_tags: &exclusion.tags,
            worked_minutes: total_worked_minutes,
            lpi_minutes,
            patterns: &config.buckets,
        },
        2,
    );
    audit_trace.push(classification.audit_step);

    let mut tags = exclusion.tags;
    let mut row = Row {
        cte_preferred: preferences.prefers_cte(&packet.employee_id),
        bucket: classification.bucket,
        segments: Vec::new(),
        ot_pay_type: None,
        lpi_minutes,
        lpi_pay_type: None,
        total_worked_minutes,
        total_worked_hours: total_worked_minutes.map(worked_hours),
        shape: None,
        status: RowStatus::Pending,
        flagged: initially_flagged(&packet),
        annotation: None,
        suggested_leave_code: None,
        audit_trace: Vec::new(),
        packet,
    };

    if let Some(times) = times.filter(|_| tags.is_empty()) {
        let preference = resolve_overtime_preference(
            &row.packet.employee_id,
            preferences,
            codes,
            3,
        );
        audit_trace.push(preference.audit_step);

        let lpi_pay_type = lpi_pay_type_from_notes(&row.packet.notes_text);
        let decision = select_shape(
            times.worked_minutes(),
            lpi_minutes,
            lpi_pay_type,
            preference.pay_type,
            options,
            4,
        );
        audit_trace.push(decision.audit_step);

        match build_segments(
            &row.packet.employee_id,
            &times,
            decision.plan,
            preference.pay_type,
            options,
            codes,
            5,
        ) {
            Ok(build) => {
                audit_trace.push(build.audit_step);
                row.segments = build.segments;
                row.ot_pay_type = Some(preference.pay_type);
                row.lpi_pay_type = Some(lpi_pay_type);
                row.shape = Some(decision.plan.shape());
                row.annotation = decision.annotation;
            }
            Err(err) => {
                warn!(
                    employee_id = %row.packet.employee_id,
                    error = %err,
                    "Segment verification failed; routing to manual entry"
                );
                tags.push(ExclusionTag::SegmentMismatch);

                // The first pass saw no tags; simple is no longer possible.
                let reclassified = classify_bucket(
                    &BucketContext {
                        packet: &row.packet,
                        exclusion_tags: &tags,
                        worked_minutes: total_worked_minutes,
                        lpi_minutes,
                        patterns: &config.buckets,
                    },
                    6,
                );
                row.bucket = reclassified.bucket;
                audit_trace.push(reclassified.audit_step);
            }
        }
    }

    if !tags.is_empty() {
        row.suggested_leave_code = codes
            .match_leave(&row.packet.primary_condition_text)
            .map(|(_, code)| code.to_string());
    }

    row.packet.exclusion_tags = tags;
    row.audit_trace = audit_trace;

    debug!(
        employee_id = %row.packet.employee_id,
        bucket = %row.bucket,
        excluded = row.is_excluded(),
        segments = row.segments.len(),
        "Row processed"
    );

    row
}

/// Runs the engine over one ordered batch of packets.
///
/// Packets from the sentinel row onward are ignored. Every detected packet
/// yields exactly one row, in input order; a row either carries segments or
/// carries exclusion tags, never both.
///
/// # Example
///
/// ```
/// use segment_engine::calculation::process_run;
/// use segment_engine::config::{EngineConfig, PreferenceMap};
/// use segment_engine::models::{Packet, Shape};
///
/// let packet = Packet {
///     employee_id: "2964".to_string(),
///     employee_name: "Adelaida Robledo".to_string(),
///     work_date: "02/12/2026".to_string(),
///     actual_start_time: Some("06:00".to_string()),
///     actual_end_time: Some("16:00".to_string()),
///     scheduled_end_time: Some("16:00".to_string()),
///     ..Packet::default()
/// };
///
/// let result = process_run(&[packet], &EngineConfig::default(), &PreferenceMap::new(), None);
/// assert_eq!(result.summary.included, 1);
/// assert_eq!(result.rows[0].shape, Some(Shape::B));
/// ```
pub fn process_run(
    packets: &[Packet],
    config: &EngineConfig,
    preferences: &PreferenceMap,
    work_date_override: Option<&str>,
) -> RunResult {
    let (detected, stop) = truncate_at_sentinel(packets, &config.sentinel);
    let work_date = resolve_work_date(detected, work_date_override);
    let override_given = work_date_override.is_some_and(|d| !d.trim().is_empty());

    let rows: Vec<Row> = detected
        .iter()
        .cloned()
        .map(|packet| process_packet(packet, &work_date, override_given, config, preferences))
        .collect();

    let summary = summarize(&rows, &stop);

    info!(
        work_date = %work_date,
        detected = summary.detected,
        included = summary.included,
        excluded = summary.excluded,
        sentinel_found = stop.sentinel_found,
        "Run processed"
    );

    RunResult {
        work_date,
        summary,
        rows,
    }
}
