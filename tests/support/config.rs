use std::io::Write;

use tempfile::NamedTempFile;

/// Write `contents` to a temporary `.toml` file that lives as long as the handle.
pub fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("oddwatch-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

pub const VALID: &str = r#"
[monitor]
interval_minutes = 5
pacing_ms = 0

[[sources]]
key = "betesporte"
name = "BetEsporte"
feed_url = "http://127.0.0.1:9/promotions.json"

[[sources]]
key = "br4bet"
name = "Br4bet"
feed_url = "http://127.0.0.1:9/br4bet.json"
enabled = false
"#;

/// Environment variables that would override file values.
pub const OVERRIDES: &[&str] = &[
    "SCRAPING_INTERVAL_MINUTES",
    "MAX_RETRIES",
    "TIMEOUT_MS",
    "PACING_MS",
    "WEBHOOK_URL",
    "WEBSOCKET_URL",
    "LOG_LEVEL",
    "LOG_FORMAT",
];
