//! Per-source settings.

use serde::Deserialize;

const fn default_true() -> bool {
    true
}

/// One monitored site, in polling order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// Stable key used in dedup keys and source tags.
    pub key: String,
    /// Display name used in logs and error alerts.
    pub name: String,
    /// JSON feed listing the site's current promotions.
    pub feed_url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Listings whose title contains any of these (case-insensitive) are dropped.
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
}
