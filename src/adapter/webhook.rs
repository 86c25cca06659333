//! HTTP push channel.
//!
//! One POST per alert with a JSON body. Non-2xx responses and transport
//! errors come back as [`DeliveryOutcome::Failed`]; nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::port::{AlertChannel, DeliveryOutcome};

pub struct WebhookChannel {
    client: Client,
    url: url::Url,
}

impl WebhookChannel {
    /// Build a webhook channel with a per-request timeout.
    #[allow(clippy::result_large_err)]
    pub fn new(url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let url = url::Url::parse(url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| Error::Startup(format!("invalid user agent: {e}")))?,
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl AlertChannel for WebhookChannel {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, body: &str) -> DeliveryOutcome {
        let response = self
            .client
            .post(self.url.clone())
            .body(body.to_owned())
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                debug!(status = %resp.status(), "Webhook accepted alert");
                DeliveryOutcome::Delivered
            }
            Ok(resp) => DeliveryOutcome::Failed(format!("HTTP {}", resp.status())),
            Err(e) => DeliveryOutcome::Failed(e.to_string()),
        }
    }
}
