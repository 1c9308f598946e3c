//! Event classification and correlation.
//!
//! The single entry point [`classify`] runs every event in arrival order
//! through a fixed rule pipeline, synthesizes incident alerts for flagged
//! high/critical events, and aggregates recurring (event, status) pairs
//! across the batch. The whole pass is a pure function of its inputs: no
//! I/O, no clock, no state shared across invocations.

use std::collections::HashMap;

use tracing::debug;

use crate::config::SecurityConfig;
use crate::event::{AnalyzedEvent, Flag, Priority, SecurityEvent};
use crate::report::{
    IncidentAlert, RecurringRisk, SecurityReport, SecurityReportMeta, SelfCheck,
};
use crate::trust::{is_suspicious_ip, is_suspicious_user};

/// Users exempt from the unusual-export rule.
const EXPORT_EXEMPT_USERS: [&str; 2] = ["operator", "admin"];

/// Minimum occurrences of an (event, status) pair to report it as recurring.
const RECURRENCE_THRESHOLD: usize = 2;

/// Fixed window label attached to recurring risks. Recurrence is a
/// same-batch count; the batch is treated as one rolling 24-hour window.
const RECURRENCE_WINDOW_HOURS: u32 = 24;

/// Recipients for every incident alert.
const INCIDENT_RECIPIENTS: [&str; 1] = ["admin"];

/// Classify a batch of security events under the given configuration.
///
/// Events are processed strictly in input order. Priority moves only
/// upward through the `low < medium < high < critical` lattice; the
/// suspicious-access and auth-failure rules force `critical` outright,
/// and a sensitive agent adds one final escalation step on top of
/// whatever the other rules produced.
pub fn classify(events: &[SecurityEvent], config: &SecurityConfig) -> SecurityReport {
    let mut analyzed: Vec<AnalyzedEvent> = Vec::with_capacity(events.len());
    let mut incidents: Vec<IncidentAlert> = Vec::new();
    let mut recurrence: HashMap<(String, String), usize> = HashMap::new();
    let mut recurrence_order: Vec<(String, String)> = Vec::new();

    for event in events {
        let entry = analyze_event(event, config);

        if let Some(incident) = build_incident(event, &entry) {
            incidents.push(incident);
        }

        // Every event feeds the recurrence counter, flagged or not.
        let key = (event.event.clone(), event.status.clone());
        match recurrence.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                recurrence.insert(key.clone(), 1);
                recurrence_order.push(key);
            }
        }

        analyzed.push(entry);
    }

    // Recurring risks come out in first-seen order.
    let recurring_risk: Vec<RecurringRisk> = recurrence_order
        .into_iter()
        .filter_map(|key| {
            let count = recurrence[&key];
            if count < RECURRENCE_THRESHOLD {
                return None;
            }
            let (event_type, status) = key;
            let message = format!("Event {event_type} ({status}) occurred {count} times");
            Some(RecurringRisk {
                event_type,
                status,
                count,
                time_window_hours: RECURRENCE_WINDOW_HOURS,
                message,
            })
        })
        .collect();

    let meta = build_meta(&analyzed);

    SecurityReport {
        security_report: analyzed,
        incident_alert: incidents,
        recurring_risk,
        meta,
    }
}

/// Run one event through the rule pipeline.
fn analyze_event(event: &SecurityEvent, config: &SecurityConfig) -> AnalyzedEvent {
    let mut flags: Vec<Flag> = Vec::new();
    let mut actions: Vec<String> = Vec::new();
    let mut priority = config
        .alert_priority
        .get(&event.event)
        .map(|p| Priority::parse_lenient(p))
        .unwrap_or(Priority::Low);

    // Monitored event types get a bump out of the noise floor, but only
    // when no configured baseline already raised them.
    if priority == Priority::Low && config.monitor_event.iter().any(|m| m == &event.event) {
        priority = Priority::Medium;
    }

    if is_suspicious_user(&event.user, &config.allowlist_users)
        || is_suspicious_ip(&event.ip, &config.allowlist_ip_ranges)
    {
        flags.push(Flag::suspicious_access());
        priority = Priority::Critical;
        push_action(&mut actions, format!("Block IP {}", event.ip));
        push_action(&mut actions, "Notify admin".to_string());
        push_action(&mut actions, "Audit logs".to_string());
    }

    if event.event == "auth_fail"
        || (event.event == "api_key_access" && event.status == "failed")
    {
        flags.push(Flag::auth_fail());
        priority = Priority::Critical;
        push_action(&mut actions, "Reset credential".to_string());
        push_action(&mut actions, "Audit logs".to_string());
    }

    if event.event == "data_export" && !EXPORT_EXEMPT_USERS.contains(&event.user.as_str()) {
        flags.push(Flag::unusual_export());
        if priority != Priority::Critical {
            priority = Priority::High;
        }
        push_action(&mut actions, "Review export request".to_string());
        push_action(&mut actions, "Verify user permissions".to_string());
    }

    // Sensitive agents escalate one lattice step, after every other rule.
    if config.sensitive_agents.iter().any(|a| a == &event.agent) {
        priority = priority.escalate();
    }

    if !flags.is_empty() {
        debug!(
            "event '{}' from agent '{}' flagged {:?} at priority {}",
            event.event,
            event.agent,
            flags.iter().map(|f| f.code).collect::<Vec<_>>(),
            priority,
        );
    }

    AnalyzedEvent {
        event: event.clone(),
        flag: flags,
        priority,
        suggested_action: actions,
    }
}

/// Append an action unless it is already present. First occurrence wins.
fn push_action(actions: &mut Vec<String>, action: String) {
    if !action.is_empty() && !actions.contains(&action) {
        actions.push(action);
    }
}

/// An incident requires high or critical priority AND at least one flag;
/// the summary is built from the first flag in detection order.
fn build_incident(event: &SecurityEvent, analyzed: &AnalyzedEvent) -> Option<IncidentAlert> {
    if analyzed.priority < Priority::High {
        return None;
    }
    let first_flag = analyzed.flag.first()?;

    Some(IncidentAlert {
        timestamp: event.timestamp.clone(),
        agent: event.agent.clone(),
        event: event.event.clone(),
        severity: analyzed.priority,
        summary: format!(
            "{} (user={}, ip={})",
            first_flag.message, event.user, event.ip
        ),
        recipient: INCIDENT_RECIPIENTS.iter().map(|r| r.to_string()).collect(),
        suggested_action: analyzed.suggested_action.clone(),
    })
}

fn build_meta(analyzed: &[AnalyzedEvent]) -> SecurityReportMeta {
    SecurityReportMeta {
        event_count: analyzed.len(),
        critical_count: count_priority(analyzed, Priority::Critical),
        high_count: count_priority(analyzed, Priority::High),
        medium_count: count_priority(analyzed, Priority::Medium),
        self_check: SelfCheck::default(),
    }
}

fn count_priority(analyzed: &[AnalyzedEvent], priority: Priority) -> usize {
    analyzed.iter().filter(|e| e.priority == priority).count()
}
