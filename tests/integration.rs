//! Integration tests for the segment engine.
//!
//! This test suite covers whole runs against the shipped configuration:
//! - Sentinel detection
//! - Shapes A, B and C
//! - CTE preference
//! - Exclusions and the manual-entry hand-off
//! - Review status and export
//! - HTTP endpoints

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use segment_engine::api::{AppState, create_router};
use segment_engine::calculation::{export_lines, ledger_entries, process_run};
use segment_engine::config::{ConfigLoader, PreferenceMap};
use segment_engine::error::EngineError;
use segment_engine::models::{
    Bucket, ExclusionTag, Packet, RowStatus, RunResult, SegmentLabel, Shape,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/default").expect("Failed to load config")
}

fn create_router_for_test() -> Router {
    create_router(AppState::new(load_config()))
}

fn packet(id: &str, name: &str, start: &str, end: &str, sched_end: &str) -> Packet {
    Packet {
        employee_id: id.to_string(),
        employee_name: name.to_string(),
        work_date: "02/12/2026".to_string(),
        actual_start_time: Some(start.to_string()),
        actual_end_time: Some(end.to_string()),
        scheduled_end_time: Some(sched_end.to_string()),
        scheduled_run: "1001".to_string(),
        block: "101".to_string(),
        ..Packet::default()
    }
}

fn run(packets: &[Packet]) -> RunResult {
    let config = load_config();
    process_run(packets, config.engine(), config.preferences(), None)
}

fn spans(result: &RunResult, index: usize) -> Vec<String> {
    result.rows[index]
        .segments
        .iter()
        .map(|s| format!("{} {}-{} {}", s.label, s.start, s.end, s.code))
        .collect()
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

// =============================================================================
// Engine runs
// =============================================================================

/// INT-001: rows after the sentinel are never processed
#[test]
fn test_int_001_sentinel_stops_run() {
    let packets = vec![
        packet("1001", "Adelaida Robledo", "06:00", "14:00", "14:00"),
        packet("1002", "Bo Whitfield", "07:00", "15:00", "15:00"),
        packet("0", "Transit Supervisor", "", "", ""),
        packet("1003", "Cruz Nakamura", "08:00", "16:00", "16:00"),
        packet("1004", "Dana Oyelaran", "09:00", "17:00", "17:00"),
    ];

    let result = run(&packets);
    assert_eq!(result.summary.detected, 2);
    assert_eq!(result.summary.stopped_at_row, 3);
    assert_eq!(result.summary.included, 2);
    assert_eq!(result.summary.excluded, 0);
    assert!(result.rows.iter().all(|r| r.packet.employee_id != "1003"));
}

/// INT-002: no sentinel means every packet is detected
#[test]
fn test_int_002_no_sentinel() {
    let packets = vec![
        packet("1001", "Adelaida Robledo", "06:00", "14:00", "14:00"),
        packet("1002", "Bo Whitfield", "07:00", "15:00", "15:00"),
    ];
    let result = run(&packets);
    assert_eq!(result.summary.detected, 2);
    assert_eq!(result.summary.stopped_at_row, 3);
}

/// INT-003: the LPI worked example under a CTE preference
#[test]
fn test_int_003_shape_c_worked_example() {
    let mut p = packet("1234", "Cruz Nakamura", "06:00", "16:00", "14:30");
    p.notes_text = "LPI paid as CTE".to_string();

    let result = run(&[p]);
    let row = &result.rows[0];
    assert_eq!(row.shape, Some(Shape::C));
    assert_eq!(row.lpi_minutes, 90);
    assert_eq!(row.bucket, Bucket::Lpi);
    assert_eq!(row.total_worked_hours, Some(Decimal::new(10, 0)));
    assert_eq!(
        spans(&result, 0),
        vec![
            "REG 06:00-14:00 1020",
            "OT 14:00-14:30 1013",
            "LPI 14:30-16:00 3002",
        ]
    );
}

/// INT-004: scheduled end before t8 skips the OT segment
#[test]
fn test_int_004_shape_c_short_schedule() {
    let mut p = packet("1234", "Cruz Nakamura", "06:00", "15:00", "13:30");
    p.notes_text = "LPI CTE".to_string();

    let result = run(&[p]);
    assert_eq!(result.rows[0].shape, Some(Shape::C));
    assert_eq!(
        spans(&result, 0),
        vec!["REG 06:00-14:00 1020", "LPI 14:00-15:00 3002"]
    );
}

/// INT-005: mapped preference puts the CTE code on overtime
#[test]
fn test_int_005_preference_from_config() {
    let packets = vec![
        packet("2964", "Adelaida Robledo", "06:00", "16:00", "16:00"),
        packet("3105", "Bo Whitfield", "06:00", "16:00", "16:00"),
        packet("7777", "Eli Marsh", "06:00", "16:00", "16:00"),
    ];
    let result = run(&packets);

    assert!(result.rows[0].cte_preferred);
    assert_eq!(result.rows[0].segments[1].label, SegmentLabel::Cte);
    assert_eq!(result.rows[0].segments[1].code, "3002");
    assert!(!result.rows[1].cte_preferred);
    assert_eq!(result.rows[1].segments[1].code, "1013");
    assert_eq!(result.rows[2].segments[1].code, "1013");
}

/// INT-006: overnight shift wraps midnight
#[test]
fn test_int_006_overnight_shift() {
    let result = run(&[packet("1001", "Adelaida Robledo", "20:00", "05:00", "05:00")]);
    assert_eq!(result.rows[0].total_worked_minutes, Some(540));
    assert_eq!(
        spans(&result, 0),
        vec!["REG 20:00-04:00 1020", "OT 04:00-05:00 1013"]
    );
}

/// INT-007: every exclusion reason routes to manual entry
#[test]
fn test_int_007_exclusions_and_ledger() {
    let mut alt = packet("1001", "Adelaida Robledo", "06:00", "14:00", "14:00");
    alt.alternate_driver_present = true;
    alt.alternate_employee_id = Some("3011".to_string());
    let mut vacation = packet("1002", "Bo Whitfield", "06:00", "14:00", "14:00");
    vacation.primary_condition_text = "Vacation".to_string();
    let mut exb = packet("1003", "Cruz Nakamura", "06:00", "14:00", "14:00");
    exb.block = "EXB".to_string();
    let mut untimed = packet("1004", "Dana Oyelaran", "06:00", "14:00", "14:00");
    untimed.actual_end_time = None;
    let clean = packet("1005", "Eli Marsh", "06:00", "14:00", "14:00");

    let result = run(&[alt, vacation, exb, untimed, clean]);
    assert_eq!(result.summary.detected, 5);
    assert_eq!(result.summary.included, 1);
    assert_eq!(result.summary.excluded, 4);

    let tags: Vec<Vec<ExclusionTag>> = result
        .rows
        .iter()
        .map(|r| r.packet.exclusion_tags.clone())
        .collect();
    assert_eq!(tags[0], vec![ExclusionTag::AlternateDriver]);
    assert_eq!(tags[1], vec![ExclusionTag::PrimaryCondition]);
    assert_eq!(tags[2], vec![ExclusionTag::Signal("extraboard".to_string())]);
    assert_eq!(tags[3], vec![ExclusionTag::MissingTime]);
    assert!(tags[4].is_empty());

    assert_eq!(result.rows[0].bucket, Bucket::ConditionOrAlternate);
    assert_eq!(result.rows[1].suggested_leave_code.as_deref(), Some("3008"));
    assert_eq!(result.rows[2].bucket, Bucket::Exb);

    let ledger = ledger_entries(&result);
    assert_eq!(ledger.len(), 4);
    assert!(ledger.iter().all(|e| e.status == RowStatus::Pending));
}

/// INT-008: identical input gives identical output
#[test]
fn test_int_008_idempotent() {
    let mut lpi = packet("2964", "Adelaida Robledo", "06:00", "16:00", "14:30");
    lpi.notes_text = "LPI OT".to_string();
    let packets = vec![
        lpi,
        packet("1002", "Bo Whitfield", "06:00", "13:00", "14:00"),
    ];
    let config = load_config();
    let prefs = PreferenceMap::from_ids(["2964"]);

    let first = process_run(&packets, config.engine(), &prefs, None);
    let second = process_run(&packets, config.engine(), &prefs, None);
    assert_eq!(first, second);
}

/// INT-009: review then export, with the completed rows only
#[test]
fn test_int_009_review_and_export() {
    let packets = vec![
        packet("1001", "Adelaida Robledo", "22:00", "07:00", "07:00"),
        packet("1002", "Bo Whitfield", "06:00", "14:00", "14:00"),
    ];
    let mut result = run(&packets);

    result.rows[0].transition(RowStatus::Reviewed).unwrap();
    result.rows[0].transition(RowStatus::Completed).unwrap();
    result.rows[1].transition(RowStatus::Skipping).unwrap();
    assert!(matches!(
        result.rows[1].transition(RowStatus::Completed),
        Err(EngineError::InvalidTransition { .. })
    ));

    let lines = export_lines(&result.rows).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].date_in, "02/12/2026");
    assert_eq!(lines[0].date_out, "02/13/2026");
    assert_eq!(lines[0].labor_code, "1020");
    assert_eq!(lines[1].date_in, "02/13/2026");
    assert_eq!(lines[1].labor_code, "1013");
}

// =============================================================================
// HTTP
// =============================================================================

/// INT-010: process endpoint over the loaded configuration
#[tokio::test]
async fn test_int_010_process_endpoint() {
    let body = json!({
        "packets": [
            {
                "employee_id": "2964",
                "employee_name": "Adelaida Robledo",
                "work_date": "02/12/2026",
                "actual_start_time": "06:00",
                "actual_end_time": "16:00",
                "scheduled_end_time": "16:00"
            },
            {
                "employee_id": "1002",
                "employee_name": "Bo Whitfield",
                "work_date": "02/12/2026",
                "actual_start_time": "06:00",
                "actual_end_time": "14:00",
                "scheduled_end_time": "14:00",
                "alternate_driver_present": true
            },
            { "employee_id": "", "employee_name": "TRANSIT SUPERVISOR" }
        ]
    });

    let (status, json) = post_json(create_router_for_test(), "/api/process", body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["run_id"].is_string());
    assert_eq!(json["summary"]["detected"], 2);
    assert_eq!(json["summary"]["included"], 1);
    assert_eq!(json["summary"]["excluded"], 1);
    assert_eq!(json["summary"]["stopped_at_row"], 3);
    assert_eq!(json["rows"][0]["segments"][1]["code"], "3002");
    assert_eq!(json["rows"][1]["packet"]["exclusion_tags"][0], "alternate_driver");
    assert_eq!(json["rows"][1]["status"], "pending");
}

/// INT-011: work date override applies to every row
#[tokio::test]
async fn test_int_011_work_date_override() {
    let body = json!({
        "packets": [
            {
                "employee_id": "1001",
                "employee_name": "Adelaida Robledo",
                "actual_start_time": "06:00",
                "actual_end_time": "14:00",
                "scheduled_end_time": "14:00"
            }
        ],
        "work_date_override": "2026-02-13"
    });

    let (status, json) = post_json(create_router_for_test(), "/api/process", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["work_date"], "2026-02-13");
    assert_eq!(json["rows"][0]["packet"]["work_date"], "2026-02-13");
}

/// INT-012: unknown endpoint is not found
#[tokio::test]
async fn test_int_012_unknown_route() {
    let (status, _) = post_json(create_router_for_test(), "/calculate", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
