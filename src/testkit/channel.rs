//! Recording [`AlertChannel`] for asserting what was delivered, and in which order.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::port::{AlertChannel, DeliveryOutcome};

/// Records every body it is asked to send.
///
/// Clones share the same log, so a test can keep one clone while the
/// dispatcher owns another.
#[derive(Clone)]
pub struct RecordingChannel {
    name: &'static str,
    failure: Option<String>,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl RecordingChannel {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            failure: None,
            bodies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A channel that records the attempt and then reports `reason` as a failure.
    pub fn failing(name: &'static str, reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::new(name)
        }
    }

    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().clone()
    }

    /// Every recorded body parsed as JSON.
    pub fn payloads(&self) -> Vec<serde_json::Value> {
        self.bodies
            .lock()
            .iter()
            .map(|b| serde_json::from_str(b).unwrap_or(serde_json::Value::Null))
            .collect()
    }

    /// The `type` field of every recorded payload, in send order.
    pub fn kinds(&self) -> Vec<String> {
        self.payloads()
            .iter()
            .map(|p| p["type"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bodies.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.lock().is_empty()
    }
}

#[async_trait]
impl AlertChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, body: &str) -> DeliveryOutcome {
        self.bodies.lock().push(body.to_string());
        match &self.failure {
            Some(reason) => DeliveryOutcome::Failed(reason.clone()),
            None => DeliveryOutcome::Delivered,
        }
    }
}
