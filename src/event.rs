//! Event types for the triage engine.
//!
//! Events are the fundamental data unit flowing through triage. A raw
//! [`SecurityEvent`] arrives from an upstream pipeline agent; classification
//! enriches it into an [`AnalyzedEvent`] carrying flags, a final priority,
//! and suggested remediation actions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw security event as reported by an upstream pipeline agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// When the event occurred. Preserved verbatim, never parsed.
    pub timestamp: String,
    /// Name of the subsystem that emitted the event.
    pub agent: String,
    /// Event-type identifier, e.g. `"auth_fail"` or `"data_export"`.
    pub event: String,
    /// User identifier associated with the event.
    pub user: String,
    /// Source address as reported; may be malformed.
    pub ip: String,
    /// Free-text outcome, e.g. `"failed"` or `"success"`.
    pub status: String,
}

/// Priority lattice for analyzed events: `low < medium < high < critical`.
///
/// Escalation is monotonic -- rules may raise priority toward
/// [`Priority::Critical`] but never lower it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Parse a configured priority string, case-insensitively.
    ///
    /// Unrecognized values fall back to [`Priority::Low`] rather than
    /// erroring; configuration anomalies are never fatal.
    pub fn parse_lenient(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            "critical" => Priority::Critical,
            _ => Priority::Low,
        }
    }

    /// Raise by exactly one lattice step. `Critical` stays `Critical`.
    pub fn escalate(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High | Priority::Critical => Priority::Critical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code identifying a detected risk pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCode {
    /// Unknown or non-allowlisted user, or untrusted/unparseable source IP.
    SuspiciousAccess,
    /// Failed authentication or failed API-key access.
    AuthFail,
    /// Data export by a non-exempt user.
    UnusualExport,
}

impl FlagCode {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagCode::SuspiciousAccess => "suspicious_access",
            FlagCode::AuthFail => "auth_fail",
            FlagCode::UnusualExport => "unusual_export",
        }
    }
}

impl fmt::Display for FlagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coded annotation attached to an analyzed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub code: FlagCode,
    pub message: String,
}

impl Flag {
    pub fn suspicious_access() -> Self {
        Self {
            code: FlagCode::SuspiciousAccess,
            message: "Unknown or unauthorized user/IP".to_string(),
        }
    }

    pub fn auth_fail() -> Self {
        Self {
            code: FlagCode::AuthFail,
            message: "Authentication failed".to_string(),
        }
    }

    pub fn unusual_export() -> Self {
        Self {
            code: FlagCode::UnusualExport,
            message: "Unusual data export request".to_string(),
        }
    }
}

/// A security event enriched with flags, a final priority, and actions.
///
/// The raw event fields are flattened so the wire format stays a single
/// flat object, matching what downstream report consumers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedEvent {
    #[serde(flatten)]
    pub event: SecurityEvent,
    /// Flags in detection order.
    #[serde(default)]
    pub flag: Vec<Flag>,
    #[serde(default)]
    pub priority: Priority,
    /// Deduplicated suggested actions, in append order.
    #[serde(default)]
    pub suggested_action: Vec<String>,
}
