mod support;

use oddwatch::app::Config;
use oddwatch::error::{ConfigError, Error};
use support::config::{write_temp_config, VALID};

#[test]
fn loads_sources_from_file() {
    let file = write_temp_config(VALID);

    let config = Config::load(file.path()).expect("valid config");

    assert_eq!(config.sources.len(), 2);
    assert_eq!(config.sources[0].key, "betesporte");
    assert!(config.sources[0].enabled);
    assert!(!config.sources[1].enabled);
    assert_eq!(config.monitor.pacing_ms, 0);
}

#[test]
fn missing_file_is_read_error() {
    let err = Config::load("/definitely/not/here/oddwatch.toml").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn malformed_toml_is_parse_error() {
    let file = write_temp_config("[monitor\ninterval_minutes = ");

    let err = Config::load(file.path()).unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn invalid_feed_url_is_rejected() {
    let file = write_temp_config(
        r#"
[[sources]]
key = "x"
name = "X"
feed_url = "ftp://x.example.com/feed"
"#,
    );

    let err = Config::load(file.path()).unwrap_err();

    assert!(err.to_string().contains("sources.feed_url"));
}

#[test]
fn empty_source_key_is_rejected() {
    let file = write_temp_config(
        r#"
[[sources]]
key = "  "
name = "Blank"
feed_url = "https://blank.example.com/feed"
"#,
    );

    let err = Config::load(file.path()).unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField { field: "sources.key" })
    ));
}
