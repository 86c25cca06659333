//! Outbound alert payloads.
//!
//! A payload is built once, serialized once, and the same bytes go to
//! every delivery channel. Wire shape:
//!
//! ```json
//! { "type": "odds_update", "data": [...], "timestamp": "...", "source": "oddwatch" }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::odd::Odd;

/// What an alert is about, tagged on the wire by `type` with body in `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AlertKind {
    /// A single listing that met the escalation predicate.
    NewSuperOdd(Odd),
    /// Every new listing found in one cycle.
    OddsUpdate(Vec<Odd>),
    /// A recoverable failure worth telling subscribers about.
    Error { error: String },
}

impl AlertKind {
    /// Wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::NewSuperOdd(_) => "new_super_odd",
            AlertKind::OddsUpdate(_) => "odds_update",
            AlertKind::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPayload {
    #[serde(flatten)]
    kind: AlertKind,
    timestamp: DateTime<Utc>,
    source: String,
}

impl AlertPayload {
    pub fn new(kind: AlertKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }

    pub fn new_super_odd(odd: Odd, source: impl Into<String>) -> Self {
        Self::new(AlertKind::NewSuperOdd(odd), source)
    }

    pub fn odds_update(odds: Vec<Odd>, source: impl Into<String>) -> Self {
        Self::new(AlertKind::OddsUpdate(odds), source)
    }

    pub fn error(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(
            AlertKind::Error {
                error: message.into(),
            },
            source,
        )
    }

    pub fn kind(&self) -> &AlertKind {
        &self.kind
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Identifier of the monitoring process that produced the alert.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Serialize to the JSON body delivered on every channel.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
