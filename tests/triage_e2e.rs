//! End-to-end tests for the triage engine.
//!
//! These run the full path a pipeline step would: parse a JSON payload,
//! classify the batch, and render/write the report artifacts.

use std::collections::HashMap;

use triage_core::{
    classify, FlagCode, Priority, SecurityConfig, SecurityEvent, TriageError, TriagePayload,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn event(
    timestamp: &str,
    agent: &str,
    kind: &str,
    user: &str,
    ip: &str,
    status: &str,
) -> SecurityEvent {
    SecurityEvent {
        timestamp: timestamp.to_string(),
        agent: agent.to_string(),
        event: kind.to_string(),
        user: user.to_string(),
        ip: ip.to_string(),
        status: status.to_string(),
    }
}

#[test]
fn unknown_user_failed_key_access_is_one_critical_incident() {
    let events = vec![event(
        "2025-01-01T10:00:00Z",
        "Integration",
        "api_key_access",
        "unknown",
        "203.0.113.99",
        "failed",
    )];
    let config = SecurityConfig {
        sensitive_agents: strings(&["Integration"]),
        allowlist_users: strings(&["operator"]),
        allowlist_ip_ranges: strings(&["192.168.1.0/24"]),
        alert_priority: HashMap::from([("api_key_access".to_string(), "high".to_string())]),
        ..Default::default()
    };

    let report = classify(&events, &config);

    assert_eq!(report.meta.event_count, 1);
    assert_eq!(report.meta.critical_count, 1);
    let entry = &report.security_report[0];
    assert_eq!(entry.priority, Priority::Critical);

    let codes: Vec<FlagCode> = entry.flag.iter().map(|f| f.code).collect();
    assert!(codes.contains(&FlagCode::SuspiciousAccess));
    assert!(codes.contains(&FlagCode::AuthFail));

    assert!(entry
        .suggested_action
        .contains(&"Block IP 203.0.113.99".to_string()));
    assert!(entry
        .suggested_action
        .contains(&"Reset credential".to_string()));

    assert_eq!(report.incident_alert.len(), 1);
    assert_eq!(report.incident_alert[0].severity, Priority::Critical);
    assert_eq!(report.incident_alert[0].recipient, strings(&["admin"]));
}

#[test]
fn repeated_clean_heartbeats_recur_without_incidents() {
    let events = vec![
        event("2025-01-01T10:00:00Z", "Monitor", "heartbeat", "operator", "10.1.2.3", "success"),
        event("2025-01-01T10:05:00Z", "Monitor", "heartbeat", "operator", "10.1.2.3", "success"),
    ];
    let config = SecurityConfig {
        allowlist_users: strings(&["operator"]),
        allowlist_ip_ranges: strings(&["10.0.0.0/8"]),
        ..Default::default()
    };

    let report = classify(&events, &config);

    assert_eq!(report.meta.event_count, 2);
    assert!(report.security_report.iter().all(|e| e.flag.is_empty()));
    assert!(report.incident_alert.is_empty());

    assert_eq!(report.recurring_risk.len(), 1);
    let risk = &report.recurring_risk[0];
    assert_eq!(risk.event_type, "heartbeat");
    assert_eq!(risk.status, "success");
    assert_eq!(risk.count, 2);
    assert_eq!(risk.time_window_hours, 24);
}

#[test]
fn sensitive_agent_bump_without_flags_is_not_an_incident() {
    let events = vec![event(
        "2025-01-01T10:00:00Z",
        "Scheduler",
        "config_change",
        "operator",
        "10.1.2.3",
        "success",
    )];
    let config = SecurityConfig {
        sensitive_agents: strings(&["Scheduler"]),
        alert_priority: HashMap::from([("config_change".to_string(), "medium".to_string())]),
        ..Default::default()
    };

    let report = classify(&events, &config);

    let entry = &report.security_report[0];
    assert_eq!(entry.priority, Priority::High);
    assert!(entry.flag.is_empty());
    assert!(report.incident_alert.is_empty());
    assert_eq!(report.meta.high_count, 1);
}

#[test]
fn final_priority_never_below_configured_baseline() {
    let kinds = ["auth_fail", "data_export", "api_key_access", "heartbeat"];
    let baselines = ["low", "medium", "high", "critical"];

    for kind in kinds {
        for baseline in baselines {
            let config = SecurityConfig {
                allowlist_users: strings(&["operator"]),
                alert_priority: HashMap::from([(kind.to_string(), baseline.to_string())]),
                ..Default::default()
            };
            let events = vec![event("t", "Monitor", kind, "mallory", "1.2.3.4", "failed")];
            let report = classify(&events, &config);
            let expected_floor = Priority::parse_lenient(baseline);
            assert!(
                report.security_report[0].priority >= expected_floor,
                "event '{kind}' with baseline '{baseline}' dropped below the floor"
            );
        }
    }
}

#[test]
fn payload_pipeline_produces_report_files() {
    let payload = TriagePayload::from_json_str(
        r#"{
            "security_event_log": [
                {
                    "timestamp": "2025-01-01T10:00:00Z",
                    "agent": "Integration",
                    "event": "auth_fail",
                    "user": "unknown",
                    "ip": "203.0.113.99",
                    "status": "failed"
                },
                {
                    "timestamp": "2025-01-01T10:01:00Z",
                    "agent": "Monitor",
                    "event": "heartbeat",
                    "user": "operator",
                    "ip": "10.1.2.3",
                    "status": "success"
                }
            ],
            "config": {
                "allowlist_users": ["operator"],
                "allowlist_ip_ranges": ["10.0.0.0/8"]
            }
        }"#,
    )
    .unwrap();

    let report = classify(&payload.events, &payload.config);
    assert_eq!(report.incident_alert.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let (json_path, md_path) = report.write_files(dir.path()).unwrap();

    let written = std::fs::read_to_string(&json_path).unwrap();
    let round_trip: triage_core::SecurityReport = serde_json::from_str(&written).unwrap();
    assert_eq!(round_trip, report);

    let markdown = std::fs::read_to_string(&md_path).unwrap();
    assert!(markdown.contains("# Security Report"));
    assert!(markdown.contains("- Total events: 2"));
    assert!(markdown.contains("auth_fail"));
}

#[test]
fn invalid_event_in_payload_yields_no_partial_batch() {
    let result = TriagePayload::from_json_str(
        r#"{
            "security_event_log": [
                {
                    "timestamp": "2025-01-01T10:00:00Z",
                    "agent": "Monitor",
                    "event": "heartbeat",
                    "user": "operator",
                    "ip": "10.1.2.3",
                    "status": "success"
                },
                {
                    "timestamp": "2025-01-01T10:01:00Z",
                    "agent": "",
                    "event": "heartbeat",
                    "user": "operator",
                    "ip": "10.1.2.3",
                    "status": "success"
                }
            ]
        }"#,
    );

    match result {
        Err(TriageError::EmptyField { index, field }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "agent");
        }
        other => panic!("expected EmptyField error, got {other:?}"),
    }
}
