//! Payload loading and structural validation.
//!
//! The classifier assumes well-typed input; this module is the validation
//! layer that enforces the caller contract before a run starts. A
//! structurally invalid event aborts the whole load, so callers never see
//! a silently truncated batch.

use std::path::Path;

use serde_json::Value;

use crate::config::SecurityConfig;
use crate::error::{Result, TriageError};
use crate::event::SecurityEvent;

/// Events plus configuration, ready for [`classify`](crate::classify::classify).
#[derive(Debug, Clone, Default)]
pub struct TriagePayload {
    pub events: Vec<SecurityEvent>,
    pub config: SecurityConfig,
}

impl TriagePayload {
    /// Parse a JSON payload.
    ///
    /// Accepted shapes: an object carrying `security_event_log` (or the
    /// legacy `events` key) plus an optional inline `config`, or a bare
    /// array of events.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Load a payload from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    fn from_value(value: Value) -> Result<Self> {
        let (raw_events, config) = match value {
            Value::Array(items) => (items, SecurityConfig::default()),
            Value::Object(mut map) => {
                let raw = map
                    .remove("security_event_log")
                    .or_else(|| map.remove("events"));
                let Some(Value::Array(items)) = raw else {
                    return Err(TriageError::MalformedInput(
                        "payload object has no 'security_event_log' or 'events' array".to_string(),
                    ));
                };
                let config = match map.remove("config") {
                    Some(raw_config @ Value::Object(_)) => serde_json::from_value(raw_config)?,
                    Some(_) => {
                        return Err(TriageError::MalformedInput(
                            "'config' is not an object".to_string(),
                        ))
                    }
                    None => SecurityConfig::default(),
                };
                (items, config)
            }
            _ => {
                return Err(TriageError::MalformedInput(
                    "payload must be a JSON object or array".to_string(),
                ))
            }
        };

        let mut events = Vec::with_capacity(raw_events.len());
        for (index, raw) in raw_events.into_iter().enumerate() {
            let event: SecurityEvent = serde_json::from_value(raw).map_err(|e| {
                TriageError::MalformedInput(format!(
                    "event {index} is not a valid security event: {e}"
                ))
            })?;
            validate_event(&event, index)?;
            events.push(event);
        }

        Ok(Self { events, config })
    }
}

/// Enforce the non-empty field contract on a raw event.
fn validate_event(event: &SecurityEvent, index: usize) -> Result<()> {
    let fields = [
        ("timestamp", &event.timestamp),
        ("agent", &event.agent),
        ("event", &event.event),
        ("user", &event.user),
        ("ip", &event.ip),
        ("status", &event.status),
    ];
    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(TriageError::EmptyField { index, field });
        }
    }
    Ok(())
}
