//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file, or built from defaults when no
//! file exists. Environment variables override either source so the monitor
//! can be run from a plain `.env`.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

mod logging;
mod service;
mod source;

pub use logging::LoggingConfig;
pub use service::{AlertsConfig, EscalationConfig, MonitorConfig};
pub use source::SourceConfig;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub escalation: EscalationConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Parse TOML content, apply environment overrides and validate.
    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a config file.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment-style lookup.
    #[allow(clippy::result_large_err)]
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, "SCRAPING_INTERVAL_MINUTES", "interval_minutes")? {
            self.monitor.interval_minutes = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_RETRIES", "max_retries")? {
            self.monitor.max_retries = v;
        }
        if let Some(v) = parse_var(&lookup, "TIMEOUT_MS", "timeout_ms")? {
            self.monitor.timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "PACING_MS", "pacing_ms")? {
            self.monitor.pacing_ms = v;
        }
        if let Some(v) = lookup("WEBHOOK_URL") {
            self.alerts.webhook_url = v;
        }
        if let Some(v) = lookup("WEBSOCKET_URL") {
            self.alerts.stream_url = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            self.logging.format = v;
        }
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.monitor.interval_minutes == 0 {
            return Err(invalid("interval_minutes", "must be at least 1"));
        }
        if self.monitor.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "must be at least 1"));
        }
        if self.alerts.stream_send_timeout_ms == 0 {
            return Err(invalid("stream_send_timeout_ms", "must be at least 1"));
        }
        if self.monitor.stats_interval_minutes == 0 {
            return Err(invalid("stats_interval_minutes", "must be at least 1"));
        }
        check_url("webhook_url", &self.alerts.webhook_url, &["http", "https"])?;
        check_url("stream_url", &self.alerts.stream_url, &["ws", "wss"])?;

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.key.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "sources.key" }.into());
            }
            if !seen.insert(source.key.as_str()) {
                return Err(invalid(
                    "sources.key",
                    format!("duplicate source key '{}'", source.key),
                ));
            }
            check_url("sources.feed_url", &source.feed_url, &["http", "https"])?;
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}

#[allow(clippy::result_large_err)]
fn parse_var<F, T>(lookup: &F, name: &str, field: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| invalid(field, format!("{name}={raw}: {e}"))),
    }
}

/// Empty URLs are allowed and mean "disabled".
#[allow(clippy::result_large_err)]
fn check_url(field: &'static str, raw: &str, schemes: &[&str]) -> Result<()> {
    if raw.is_empty() {
        return Ok(());
    }
    let parsed = url::Url::parse(raw).map_err(|e| invalid(field, e.to_string()))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(invalid(
            field,
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.monitor.interval_minutes, 5);
        assert_eq!(config.monitor.max_retries, 3);
        assert_eq!(config.monitor.timeout_ms, 30_000);
        assert_eq!(config.alerts.webhook_timeout_ms, 10_000);
        assert_eq!(config.alerts.reconnect_delay_ms, 5_000);
        assert_eq!(config.alerts.stream_send_timeout_ms, 10_000);
        assert!(config.alerts.webhook_url.is_empty());
        assert!(config.alerts.stream_url.is_empty());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("SCRAPING_INTERVAL_MINUTES", "10"),
                ("TIMEOUT_MS", "5000"),
                ("WEBHOOK_URL", "https://hooks.example.com/odds"),
                ("WEBSOCKET_URL", "wss://stream.example.com"),
            ]))
            .unwrap();

        assert_eq!(config.monitor.interval_minutes, 10);
        assert_eq!(config.monitor.timeout_ms, 5000);
        assert_eq!(config.alerts.webhook_url, "https://hooks.example.com/odds");
        assert_eq!(config.alerts.stream_url, "wss://stream.example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unparseable_env_number_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(env(&[("SCRAPING_INTERVAL_MINUTES", "five")]))
            .unwrap_err();
        assert!(err.to_string().contains("interval_minutes"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = Config::default();
        config.monitor.interval_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn wrong_scheme_is_rejected() {
        let mut config = Config::default();
        config.alerts.stream_url = "https://not-a-socket.example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn duplicate_source_keys_are_rejected() {
        let toml = r#"
            [[sources]]
            key = "betesporte"
            name = "BetEsporte"
            feed_url = "https://a.example.com/feed"

            [[sources]]
            key = "betesporte"
            name = "Again"
            feed_url = "https://b.example.com/feed"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate source key"));
    }

    #[test]
    fn parses_full_file() {
        let toml = r#"
            [monitor]
            interval_minutes = 2
            pacing_ms = 0

            [alerts]
            webhook_url = "http://localhost:3000/api/alert"

            [escalation]
            min_odd_value = 2.5
            min_freebet = 100

            [[sources]]
            key = "br4bet"
            name = "Br4bet"
            feed_url = "https://br4bet.example.com/promotions.json"
            enabled = false
            exclude_keywords = ["expirado", "expired"]
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.monitor.interval_minutes, 2);
        assert_eq!(config.monitor.timeout_ms, 30_000);
        assert_eq!(config.escalation.min_odd_value, rust_decimal_macros::dec!(2.5));
        assert_eq!(config.sources.len(), 1);
        assert!(!config.sources[0].enabled);
        assert_eq!(config.sources[0].exclude_keywords.len(), 2);
        assert_eq!(config.logging.level, "info");
    }
}
