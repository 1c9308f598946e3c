//! # triage-core
//!
//! Deterministic triage engine for pipeline security events.
//!
//! The engine consumes a finite batch of [`SecurityEvent`]s plus one
//! [`SecurityConfig`], classifies each event's risk through a fixed rule
//! pipeline, escalates priority over the `low < medium < high < critical`
//! lattice, synthesizes [`IncidentAlert`]s for flagged high/critical
//! events, and reports [`RecurringRisk`]s for (event, status) pairs that
//! repeat within the batch.
//!
//! Classification ([`classify`]) is a pure function: no I/O, no clock, no
//! state across invocations. Independent batches can therefore be
//! classified concurrently without any synchronization. Loading and report
//! writing live in [`input`] and [`report`] and are the only places the
//! crate touches the filesystem.

pub mod classify;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod report;
pub mod trust;

pub use classify::classify;
pub use config::SecurityConfig;
pub use error::{Result, TriageError};
pub use event::{AnalyzedEvent, Flag, FlagCode, Priority, SecurityEvent};
pub use input::TriagePayload;
pub use report::{IncidentAlert, RecurringRisk, SecurityReport, SecurityReportMeta, SelfCheck};
