use crate::chain;
use crate::error::TimelineError;
use chrono::{DateTime, Utc};
use refguard_types::Domain;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Applied,
    Flagged,
    Reverted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Applied => "applied",
            EventKind::Flagged => "flagged",
            EventKind::Reverted => "reverted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored, chained timeline event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub file: String,
    #[serde(default)]
    pub domain: Domain,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub cues: Value,
    #[serde(default)]
    pub result: Value,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub prev_hash: String,
    #[serde(default)]
    pub chain_hash: String,
}

/// An event before it is stamped and chained.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub kind: EventKind,
    pub file: String,
    pub domain: Domain,
    pub message: String,
    pub cues: Value,
    pub result: Value,
}

impl NewEvent {
    /// A suggestion was applied to `file`.
    pub fn applied(
        file: impl Into<String>,
        domain: Domain,
        message: impl Into<String>,
        cues: Value,
        result: Value,
    ) -> Self {
        Self {
            kind: EventKind::Applied,
            file: file.into(),
            domain,
            message: message.into(),
            cues,
            result,
        }
    }

    /// A reviewer flagged the step on `file` as suspicious.
    pub fn flagged(file: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            kind: EventKind::Flagged,
            file: file.into(),
            domain: Domain::default(),
            message: reason.clone(),
            cues: Value::Null,
            result: json!({ "reason": reason }),
        }
    }

    /// `file` was restored from `backup`.
    pub fn reverted(file: impl Into<String>, backup: impl Into<String>) -> Self {
        let file = file.into();
        let backup = backup.into();
        Self {
            kind: EventKind::Reverted,
            message: format!("reverted {file} from {backup}"),
            file,
            domain: Domain::default(),
            cues: Value::Null,
            result: json!({ "backup": backup }),
        }
    }

    /// Stamp and chain onto `prev_hash`.
    pub fn finalize(
        self,
        prev_hash: String,
        timestamp: DateTime<Utc>,
    ) -> Result<TimelineEvent, TimelineError> {
        let mut event = TimelineEvent {
            kind: self.kind,
            file: self.file,
            domain: self.domain,
            message: self.message,
            cues: self.cues,
            result: self.result,
            timestamp,
            prev_hash,
            chain_hash: String::new(),
        };
        event.chain_hash = chain::hash_event(&event)?;
        Ok(event)
    }
}

/// Lightweight per-event row for list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub ts: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub file: String,
    pub message: String,
    pub chain_hash: String,
}

impl From<&TimelineEvent> for SummaryRow {
    fn from(event: &TimelineEvent) -> Self {
        Self {
            ts: event.timestamp,
            kind: event.kind,
            file: event.file.clone(),
            message: event.message.clone(),
            chain_hash: event.chain_hash.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineListing {
    pub events: Vec<TimelineEvent>,
    pub summary: Vec<SummaryRow>,
}

impl TimelineListing {
    pub fn from_events(events: Vec<TimelineEvent>) -> Self {
        let summary = events.iter().map(SummaryRow::from).collect();
        Self { events, summary }
    }
}
