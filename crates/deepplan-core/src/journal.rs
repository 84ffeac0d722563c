//! Append-only JSONL logs for decisions, risks, and events.
//!
//! Layout:
//!   .deepplan/decisions.jsonl
//!   .deepplan/risks.jsonl
//!   .deepplan/events.jsonl
//!
//! One record per line. Lines are only ever appended. IDs are sequential
//! per log: D1, D2, … / R1, … / EV1, …

use crate::error::{PlanError, Result};
use crate::io;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// LogKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Decisions,
    Risks,
    Events,
}

impl LogKind {
    pub fn path(self, root: &Path) -> PathBuf {
        match self {
            LogKind::Decisions => paths::decisions_path(root),
            LogKind::Risks => paths::risks_path(root),
            LogKind::Events => paths::events_path(root),
        }
    }

    pub fn id_prefix(self) -> &'static str {
        match self {
            LogKind::Decisions => "D",
            LogKind::Risks => "R",
            LogKind::Events => "EV",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogKind::Decisions => "decisions",
            LogKind::Risks => "risks",
            LogKind::Events => "events",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for LogKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "decisions" | "decision" => Ok(LogKind::Decisions),
            "risks" | "risk" => Ok(LogKind::Risks),
            "events" | "event" => Ok(LogKind::Events),
            other => Err(PlanError::Validation(format!(
                "unknown log '{other}': must be decisions, risks, or events"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

pub trait LogRecord: Serialize + DeserializeOwned {
    const KIND: LogKind;

    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Options considered and not chosen.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl LogRecord for DecisionRecord {
    const KIND: LogKind = LogKind::Decisions;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub id: String,
    pub text: String,
    /// Early warning sign that the risk is materializing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LogRecord for RiskRecord {
    const KIND: LogKind = LogKind::Risks;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Initialized,
    PlanUpdated,
    Replan,
    IdeasProposed,
    IdeaApplied,
    InsightProposed,
    InsightApplied,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Initialized => "initialized",
            EventKind::PlanUpdated => "plan_updated",
            EventKind::Replan => "replan",
            EventKind::IdeasProposed => "ideas_proposed",
            EventKind::IdeaApplied => "idea_applied",
            EventKind::InsightProposed => "insight_proposed",
            EventKind::InsightApplied => "insight_applied",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl LogRecord for EventRecord {
    const KIND: LogKind = LogKind::Events;

    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// File operations
// ---------------------------------------------------------------------------

/// Append one record as a single line. Prior lines are never touched.
pub fn append<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let line = serde_json::to_string(record)?;
    io::append_line(path, &line)
}

/// Read every record in append order. A missing file is an empty log.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = io::read_file(path)?;
    let mut records = Vec::new();
    for (idx, line) in content.split(|b| *b == b'\n').enumerate() {
        if is_blank_line(line) {
            continue;
        }
        let record = serde_json::from_slice(line).map_err(|source| PlanError::CorruptLog {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Number of records in the log, without parsing them.
pub fn count(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }
    let content = io::read_file(path)?;
    Ok(content
        .split(|b| *b == b'\n')
        .filter(|l| !is_blank_line(l))
        .count())
}

fn is_blank_line(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

pub fn next_id(path: &Path, kind: LogKind) -> Result<String> {
    let n = count(path)? + 1;
    Ok(format!("{}{n}", kind.id_prefix()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
