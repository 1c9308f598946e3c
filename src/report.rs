//! Report structures and rendering.
//!
//! The classifier hands back a [`SecurityReport`]; this module owns its
//! shape plus the markdown/JSON renderers and the report file writer. The
//! classifier itself performs no I/O.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::event::{AnalyzedEvent, Priority};

/// Alert synthesized for a flagged high/critical event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentAlert {
    pub timestamp: String,
    pub agent: String,
    pub event: String,
    /// Copy of the analyzed event's final priority.
    pub severity: Priority,
    /// One-line description built from the first flag plus user/ip.
    pub summary: String,
    pub recipient: Vec<String>,
    pub suggested_action: Vec<String>,
}

/// An (event type, status) pair observed at least twice in one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringRisk {
    pub event_type: String,
    pub status: String,
    pub count: usize,
    /// Fixed window label: the batch stands in for a rolling 24-hour
    /// window, no timestamp arithmetic is performed.
    pub time_window_hours: u32,
    pub message: String,
}

/// Trivial self-check block surfaced by downstream rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfCheck {
    pub all_sections_present: bool,
    pub no_empty_fields: bool,
}

impl Default for SelfCheck {
    fn default() -> Self {
        Self {
            all_sections_present: true,
            no_empty_fields: true,
        }
    }
}

/// Aggregate counts for one classification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityReportMeta {
    pub event_count: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub self_check: SelfCheck,
}

/// Full output of one classification run.
///
/// Field names match the wire format consumed by downstream pipeline steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityReport {
    pub security_report: Vec<AnalyzedEvent>,
    pub incident_alert: Vec<IncidentAlert>,
    pub recurring_risk: Vec<RecurringRisk>,
    pub meta: SecurityReportMeta,
}

impl SecurityReport {
    /// Render the human-readable markdown summary.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Security Report\n\n## Summary\n");
        let _ = writeln!(out, "- Total events: {}", self.meta.event_count);
        let _ = writeln!(out, "- Critical: {}", self.meta.critical_count);
        let _ = writeln!(out, "- High: {}", self.meta.high_count);
        let _ = writeln!(out, "- Medium: {}", self.meta.medium_count);

        out.push_str("\n## Incidents\n");
        if self.incident_alert.is_empty() {
            out.push_str("- None\n");
        } else {
            for incident in &self.incident_alert {
                let _ = writeln!(
                    out,
                    "- [{}] {} {} {}: {} | actions: {}",
                    incident.severity,
                    incident.timestamp,
                    incident.agent,
                    incident.event,
                    incident.summary,
                    join_or_none(&incident.suggested_action),
                );
            }
        }

        out.push_str("\n## Flagged Events\n");
        let flagged: Vec<&AnalyzedEvent> = self
            .security_report
            .iter()
            .filter(|e| !e.flag.is_empty())
            .collect();
        if flagged.is_empty() {
            out.push_str("- None\n");
        } else {
            for entry in flagged {
                let flags: Vec<&str> = entry.flag.iter().map(|f| f.code.as_str()).collect();
                let _ = writeln!(
                    out,
                    "- [{}] {} {} {} user={} ip={} flags: {} | actions: {}",
                    entry.priority,
                    entry.event.timestamp,
                    entry.event.agent,
                    entry.event.event,
                    entry.event.user,
                    entry.event.ip,
                    flags.join(", "),
                    join_or_none(&entry.suggested_action),
                );
            }
        }

        out.push_str("\n## Recurring Risks\n");
        if self.recurring_risk.is_empty() {
            out.push_str("- None\n");
        } else {
            for risk in &self.recurring_risk {
                let _ = writeln!(
                    out,
                    "- {} ({}) x{}: {}",
                    risk.event_type, risk.status, risk.count, risk.message
                );
            }
        }

        out
    }

    /// Write `security_report.json` and `security_report.md` into `dir`,
    /// creating the directory if needed. Returns the two paths.
    pub fn write_files(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating report directory {}", dir.display()))?;

        let json_path = dir.join("security_report.json");
        let json = serde_json::to_string_pretty(self).context("serializing security report")?;
        fs::write(&json_path, json)
            .with_context(|| format!("writing {}", json_path.display()))?;

        let md_path = dir.join("security_report.md");
        fs::write(&md_path, self.to_markdown())
            .with_context(|| format!("writing {}", md_path.display()))?;

        Ok((json_path, md_path))
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report() -> SecurityReport {
        SecurityReport {
            security_report: vec![],
            incident_alert: vec![],
            recurring_risk: vec![],
            meta: SecurityReportMeta {
                event_count: 0,
                critical_count: 0,
                high_count: 0,
                medium_count: 0,
                self_check: SelfCheck::default(),
            },
        }
    }

    #[test]
    fn empty_sections_render_none() {
        let md = empty_report().to_markdown();
        assert!(md.contains("# Security Report"));
        assert!(md.contains("## Incidents\n- None"));
        assert!(md.contains("## Flagged Events\n- None"));
        assert!(md.contains("## Recurring Risks\n- None"));
    }

    #[test]
    fn self_check_defaults_true() {
        let check = SelfCheck::default();
        assert!(check.all_sections_present);
        assert!(check.no_empty_fields);
    }

    #[test]
    fn incident_renders_one_line() {
        let mut report = empty_report();
        report.incident_alert.push(IncidentAlert {
            timestamp: "2025-01-01T10:00:00Z".to_string(),
            agent: "Integration".to_string(),
            event: "auth_fail".to_string(),
            severity: Priority::Critical,
            summary: "Authentication failed (user=bob, ip=1.2.3.4)".to_string(),
            recipient: vec!["admin".to_string()],
            suggested_action: vec!["Reset credential".to_string(), "Audit logs".to_string()],
        });
        let md = report.to_markdown();
        assert!(md.contains(
            "- [critical] 2025-01-01T10:00:00Z Integration auth_fail: \
             Authentication failed (user=bob, ip=1.2.3.4) | actions: Reset credential, Audit logs"
        ));
    }

    #[test]
    fn recurring_risk_renders_count() {
        let mut report = empty_report();
        report.recurring_risk.push(RecurringRisk {
            event_type: "heartbeat".to_string(),
            status: "success".to_string(),
            count: 3,
            time_window_hours: 24,
            message: "Event heartbeat (success) occurred 3 times".to_string(),
        });
        let md = report.to_markdown();
        assert!(md.contains("- heartbeat (success) x3: Event heartbeat (success) occurred 3 times"));
    }
}
