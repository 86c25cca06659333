//! Dual-channel alert delivery.
//!
//! Every payload is serialized once and handed to the push channel and the
//! stream channel concurrently. Either channel may be absent; an absent
//! channel is a silent no-op and the other still delivers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adapter::{StreamChannel, WebhookChannel};
use crate::app::config::AlertsConfig;
use crate::domain::{AlertPayload, Odd};
use crate::error::Result;
use crate::port::{AlertChannel, DeliveryOutcome};

/// Per-channel outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub kind: &'static str,
    pub push: DeliveryOutcome,
    pub stream: DeliveryOutcome,
}

impl DispatchReport {
    /// True if at least one channel accepted the alert.
    pub fn any_delivered(&self) -> bool {
        self.push.is_delivered() || self.stream.is_delivered()
    }
}

pub struct AlertDispatcher {
    source_tag: String,
    push: Option<Arc<dyn AlertChannel>>,
    stream: Option<Arc<dyn AlertChannel>>,
}

impl AlertDispatcher {
    pub fn new(
        source_tag: impl Into<String>,
        push: Option<Arc<dyn AlertChannel>>,
        stream: Option<Arc<dyn AlertChannel>>,
    ) -> Self {
        Self {
            source_tag: source_tag.into(),
            push,
            stream,
        }
    }

    /// Build the webhook and stream channels for whichever URLs are set.
    #[allow(clippy::result_large_err)]
    pub fn from_config(config: &AlertsConfig) -> Result<Self> {
        let push: Option<Arc<dyn AlertChannel>> = if config.webhook_url.is_empty() {
            None
        } else {
            Some(Arc::new(WebhookChannel::new(
                &config.webhook_url,
                config.webhook_timeout(),
                &config.user_agent,
            )?))
        };

        let stream: Option<Arc<dyn AlertChannel>> = if config.stream_url.is_empty() {
            None
        } else {
            Some(Arc::new(StreamChannel::new(
                &config.stream_url,
                config.reconnect_delay(),
                config.stream_send_timeout(),
            )?))
        };

        Ok(Self::new(config.source_tag.clone(), push, stream))
    }

    /// Open long-lived channel connections.
    pub async fn initialize(&self) -> Result<()> {
        for channel in self.push.iter().chain(self.stream.iter()) {
            channel.open().await?;
        }
        info!(
            push = self.push.is_some(),
            stream = self.stream.is_some(),
            "Alert dispatcher initialized"
        );
        Ok(())
    }

    /// Deliver one payload on both channels concurrently.
    pub async fn dispatch(&self, payload: &AlertPayload) -> DispatchReport {
        let kind = payload.kind().as_str();

        let body = match payload.encode() {
            Ok(body) => body,
            Err(e) => {
                warn!(kind, error = %e, "Failed to serialize alert");
                let outcome = DeliveryOutcome::Failed(e.to_string());
                return DispatchReport {
                    kind,
                    push: outcome.clone(),
                    stream: outcome,
                };
            }
        };

        let (push, stream) = tokio::join!(
            deliver(self.push.as_deref(), kind, &body),
            deliver(self.stream.as_deref(), kind, &body),
        );

        DispatchReport { kind, push, stream }
    }

    pub async fn send_odds_update(&self, odds: Vec<Odd>) -> DispatchReport {
        let count = odds.len();
        let report = self
            .dispatch(&AlertPayload::odds_update(odds, &self.source_tag))
            .await;
        info!(odds = count, delivered = report.any_delivered(), "Consolidated alert sent");
        report
    }

    pub async fn send_new_odd(&self, odd: Odd) -> DispatchReport {
        let game = odd.game().to_string();
        let report = self
            .dispatch(&AlertPayload::new_super_odd(odd, &self.source_tag))
            .await;
        info!(game = %game, delivered = report.any_delivered(), "Escalated alert sent");
        report
    }

    pub async fn send_error(&self, message: impl Into<String>) -> DispatchReport {
        let message = message.into();
        let report = self
            .dispatch(&AlertPayload::error(message.clone(), &self.source_tag))
            .await;
        info!(error = %message, delivered = report.any_delivered(), "Error alert sent");
        report
    }

    /// Tear down the stream connection. The push channel holds no connection.
    pub async fn close(&self) {
        if let Some(stream) = &self.stream {
            stream.close().await;
        }
        info!("Alert dispatcher closed");
    }

    pub fn source_tag(&self) -> &str {
        &self.source_tag
    }
}

async fn deliver(channel: Option<&dyn AlertChannel>, kind: &str, body: &str) -> DeliveryOutcome {
    let Some(channel) = channel else {
        return DeliveryOutcome::Skipped("not configured".into());
    };

    let outcome = channel.send(body).await;
    match &outcome {
        DeliveryOutcome::Delivered => {
            debug!(channel = channel.name(), kind, "Alert delivered");
        }
        DeliveryOutcome::Skipped(reason) => {
            debug!(channel = channel.name(), kind, reason = %reason, "Alert skipped");
        }
        DeliveryOutcome::Failed(reason) => {
            warn!(channel = channel.name(), kind, reason = %reason, "Alert delivery failed");
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::channel::RecordingChannel;
    use crate::testkit::domain::odd;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn sends_identical_body_to_both_channels() {
        let push = RecordingChannel::new("webhook");
        let stream = RecordingChannel::new("stream");
        let dispatcher = AlertDispatcher::new(
            "oddwatch",
            Some(Arc::new(push.clone())),
            Some(Arc::new(stream.clone())),
        );

        let report = dispatcher.send_error("Br4bet: unreachable").await;

        assert!(report.push.is_delivered());
        assert!(report.stream.is_delivered());
        assert_eq!(push.bodies(), stream.bodies());
        assert_eq!(push.payloads()[0]["source"], "oddwatch");
    }

    #[tokio::test]
    async fn missing_channel_is_a_silent_skip() {
        let stream = RecordingChannel::new("stream");
        let dispatcher = AlertDispatcher::new("oddwatch", None, Some(Arc::new(stream.clone())));

        let report = dispatcher
            .send_odds_update(vec![odd("x1", dec!(2.1), dec!(0))])
            .await;

        assert!(report.push.is_skipped());
        assert!(report.stream.is_delivered());
        assert_eq!(stream.kinds(), vec!["odds_update"]);
    }

    #[tokio::test]
    async fn failing_channel_does_not_block_the_other() {
        let push = RecordingChannel::failing("webhook", "HTTP 500");
        let stream = RecordingChannel::new("stream");
        let dispatcher = AlertDispatcher::new(
            "oddwatch",
            Some(Arc::new(push)),
            Some(Arc::new(stream.clone())),
        );

        let report = dispatcher.send_new_odd(odd("x1", dec!(3.5), dec!(0))).await;

        assert_eq!(report.push, DeliveryOutcome::Failed("HTTP 500".into()));
        assert!(report.stream.is_delivered());
        assert!(report.any_delivered());
        assert_eq!(stream.kinds(), vec!["new_super_odd"]);
    }

    #[tokio::test]
    async fn unconfigured_dispatcher_skips_everything() {
        let dispatcher = AlertDispatcher::from_config(&AlertsConfig::default()).unwrap();
        dispatcher.initialize().await.unwrap();

        let report = dispatcher.send_error("nothing listening").await;

        assert!(report.push.is_skipped());
        assert!(report.stream.is_skipped());
        assert!(!report.any_delivered());
        dispatcher.close().await;
    }
}
