//! Monitor, alert delivery and escalation settings.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Cycle scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitorConfig {
    /// Minutes between polling cycles.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    /// Reserved for adapter-level retries; the monitor itself never retries.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Upper bound for a single source poll.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Pause between consecutive sources within a cycle.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    /// Minutes between periodic stats log lines.
    #[serde(default = "default_stats_interval_minutes")]
    pub stats_interval_minutes: u64,
}

fn default_interval_minutes() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_pacing_ms() -> u64 {
    2_000
}

fn default_stats_interval_minutes() -> u64 {
    30
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_minutes * 60)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            max_retries: default_max_retries(),
            timeout_ms: default_timeout_ms(),
            pacing_ms: default_pacing_ms(),
            stats_interval_minutes: default_stats_interval_minutes(),
        }
    }
}

/// Alert delivery settings. An empty URL disables that channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlertsConfig {
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default)]
    pub stream_url: String,
    #[serde(default = "default_webhook_timeout_ms")]
    pub webhook_timeout_ms: u64,
    /// Fixed delay before each stream reconnect attempt.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Upper bound for writing one alert to the stream. A send that runs
    /// over drops the connection and hands it to the reconnect loop.
    #[serde(default = "default_stream_send_timeout_ms")]
    pub stream_send_timeout_ms: u64,
    /// Value of the `source` field on every alert.
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_webhook_timeout_ms() -> u64 {
    10_000
}

fn default_reconnect_delay_ms() -> u64 {
    5_000
}

fn default_stream_send_timeout_ms() -> u64 {
    10_000
}

fn default_source_tag() -> String {
    "oddwatch".into()
}

fn default_user_agent() -> String {
    format!("oddwatch/{}", env!("CARGO_PKG_VERSION"))
}

impl AlertsConfig {
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_millis(self.webhook_timeout_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn stream_send_timeout(&self) -> Duration {
        Duration::from_millis(self.stream_send_timeout_ms)
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            stream_url: String::new(),
            webhook_timeout_ms: default_webhook_timeout_ms(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            stream_send_timeout_ms: default_stream_send_timeout_ms(),
            source_tag: default_source_tag(),
            user_agent: default_user_agent(),
        }
    }
}

/// Thresholds above which a new listing gets its own alert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EscalationConfig {
    #[serde(default = "default_min_odd_value")]
    pub min_odd_value: Decimal,
    #[serde(default = "default_min_freebet")]
    pub min_freebet: Decimal,
}

fn default_min_odd_value() -> Decimal {
    Decimal::new(30, 1) // 3.0
}

fn default_min_freebet() -> Decimal {
    Decimal::from(50)
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            min_odd_value: default_min_odd_value(),
            min_freebet: default_min_freebet(),
        }
    }
}
