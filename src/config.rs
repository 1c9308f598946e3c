//! Triage configuration supplied by the caller.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for one classification run.
///
/// All thresholds are data, not code: allowlists, CIDR ranges, baseline
/// priorities, and sensitive agents are supplied here and passed by
/// reference into the stateless classifier. Empty allowlists mean
/// "no enforcement", not "trust nothing".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Agents whose events always receive one extra escalation step.
    #[serde(default)]
    pub sensitive_agents: Vec<String>,

    /// Event types promoted from low to medium when no stronger rule fires.
    #[serde(default)]
    pub monitor_event: Vec<String>,

    /// Trusted user identifiers (exact, case-sensitive match).
    #[serde(default)]
    pub allowlist_users: Vec<String>,

    /// Trusted network blocks in CIDR notation. Malformed entries are
    /// skipped at evaluation time, not rejected at load time.
    #[serde(default)]
    pub allowlist_ip_ranges: Vec<String>,

    /// Baseline priority per event type. Unrecognized priority strings fall
    /// back to low.
    #[serde(default)]
    pub alert_priority: HashMap<String, String>,
}

impl SecurityConfig {
    /// Parse configuration from a JSON string. A top-level
    /// `{"config": {...}}` wrapper is unwrapped if present.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(text)?;
        let inner = if value.get("config").is_some_and(|v| v.is_object()) {
            value["config"].take()
        } else {
            value
        };
        Ok(serde_json::from_value(inner)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
