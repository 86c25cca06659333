//! Alert channel port.
//!
//! A channel delivers an already serialized alert body to one target.
//! Delivery is best-effort: outcomes are reported, never raised.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

/// Result of one delivery attempt on one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The target accepted the alert.
    Delivered,
    /// Nothing was attempted (channel unconfigured or not connected).
    Skipped(String),
    /// The attempt was made and failed.
    Failed(String),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, DeliveryOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DeliveryOutcome::Failed(_))
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered => write!(f, "delivered"),
            DeliveryOutcome::Skipped(reason) => write!(f, "skipped: {reason}"),
            DeliveryOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Delivery target for serialized alert payloads.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    /// Short name used in logs (e.g. "webhook").
    fn name(&self) -> &'static str;

    /// Establish any long-lived connection. Stateless channels do nothing.
    async fn open(&self) -> Result<()> {
        Ok(())
    }

    /// Deliver one JSON body.
    async fn send(&self, body: &str) -> DeliveryOutcome;

    /// Tear down any long-lived connection.
    async fn close(&self) {}
}
