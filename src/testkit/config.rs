//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::app::config::{AlertsConfig, Config, MonitorConfig};

/// Monitor settings with no pacing and a short poll timeout.
pub fn monitor() -> MonitorConfig {
    MonitorConfig {
        interval_minutes: 5,
        max_retries: 3,
        timeout_ms: 500,
        pacing_ms: 0,
        stats_interval_minutes: 30,
    }
}

/// Alert settings with both channels disabled.
pub fn alerts() -> AlertsConfig {
    AlertsConfig {
        source_tag: "oddwatch-test".into(),
        ..AlertsConfig::default()
    }
}

/// Full config built from [`monitor`] and [`alerts`].
pub fn config() -> Config {
    Config {
        monitor: monitor(),
        alerts: alerts(),
        ..Config::default()
    }
}
