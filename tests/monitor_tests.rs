//! End-to-end monitor behavior through the public API.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use oddwatch::app::config::SourceConfig;
use oddwatch::app::{
    AlertDispatcher, Config, CycleEngine, CycleSettings, EscalationPolicy, Monitor, MonitorState,
    SourceEntry, RETENTION,
};
use oddwatch::error::SourceError;
use oddwatch::testkit::channel::RecordingChannel;
use oddwatch::testkit::config as test_config;
use oddwatch::testkit::domain::odd;
use oddwatch::testkit::http::serve_once;
use oddwatch::testkit::source::ScriptedSource;
use rust_decimal_macros::dec;

const LONG: Duration = Duration::from_secs(3600);

fn monitor(entries: Vec<SourceEntry>, push: &RecordingChannel, stream: &RecordingChannel) -> Monitor {
    let dispatcher = AlertDispatcher::new(
        "oddwatch",
        Some(Arc::new(push.clone())),
        Some(Arc::new(stream.clone())),
    );
    let settings = CycleSettings {
        timeout: Duration::from_millis(300),
        pacing: Duration::ZERO,
        retention: RETENTION,
    };
    let engine = CycleEngine::new(
        entries,
        Arc::new(dispatcher),
        EscalationPolicy::default(),
        settings,
    );
    Monitor::new(engine, LONG, LONG)
}

#[tokio::test]
async fn two_sources_then_quiet_second_cycle() {
    let x1 = odd("x1", dec!(2.1), dec!(0));
    let a = ScriptedSource::new();
    let a_script = a.script();
    let b = ScriptedSource::new();
    a_script.push_odds(vec![x1.clone()]);
    a_script.push_odds(vec![x1]);

    let push = RecordingChannel::new("webhook");
    let stream = RecordingChannel::new("stream");
    let monitor = monitor(
        vec![
            SourceEntry::new("a", "A", Box::new(a), true),
            SourceEntry::new("b", "B", Box::new(b), true),
        ],
        &push,
        &stream,
    );

    monitor.initialize().await.unwrap();
    let first = monitor.start().await.unwrap();
    let second = monitor.run_cycle().await.unwrap();

    assert_eq!(first.new_odds, 1);
    assert_eq!(first.escalated, 0);
    assert_eq!(second.new_odds, 0);
    assert_eq!(monitor.stats().await.known_odds, 1);

    assert_eq!(push.kinds(), vec!["odds_update"]);
    assert_eq!(push.payloads()[0]["data"].as_array().unwrap().len(), 1);
    assert_eq!(push.bodies(), stream.bodies());

    monitor.stop().await;
}

#[tokio::test]
async fn consolidated_update_precedes_escalation() {
    let source = ScriptedSource::new().with_results(vec![Ok(vec![
        odd("A", dec!(3.5), dec!(0)),
        odd("B", dec!(1.8), dec!(0)),
    ])]);
    let push = RecordingChannel::new("webhook");
    let stream = RecordingChannel::new("stream");
    let monitor = monitor(
        vec![SourceEntry::new("s", "S", Box::new(source), true)],
        &push,
        &stream,
    );

    let report = monitor.start().await.unwrap();

    assert_eq!(report.escalated, 1);
    assert_eq!(push.kinds(), vec!["odds_update", "new_super_odd"]);
    let payloads = push.payloads();
    assert_eq!(payloads[0]["data"].as_array().unwrap().len(), 2);
    assert_eq!(payloads[1]["data"]["homeTeam"], "A");
    assert_eq!(payloads[1]["data"]["oddValue"], 3.5);

    monitor.stop().await;
}

#[tokio::test]
async fn failing_source_does_not_block_the_others() {
    let broken = ScriptedSource::new()
        .with_results(vec![Err(SourceError::Unreachable("connection reset".into()))]);
    let healthy = ScriptedSource::new().with_results(vec![Ok(vec![odd("x1", dec!(2.1), dec!(0))])]);
    let push = RecordingChannel::new("webhook");
    let stream = RecordingChannel::new("stream");
    let monitor = monitor(
        vec![
            SourceEntry::new("broken", "Broken", Box::new(broken), true),
            SourceEntry::new("healthy", "Healthy", Box::new(healthy), true),
        ],
        &push,
        &stream,
    );

    let report = monitor.start().await.unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.new_odds, 1);
    assert_eq!(push.kinds(), vec!["error", "odds_update"]);
    assert_eq!(
        push.payloads()[0]["data"]["error"],
        "Broken: source unreachable: connection reset"
    );

    monitor.stop().await;
}

#[tokio::test]
async fn failed_channel_does_not_block_the_other() {
    let source = ScriptedSource::new().with_results(vec![Ok(vec![odd("x1", dec!(2.1), dec!(0))])]);
    let push = RecordingChannel::failing("webhook", "HTTP 502 Bad Gateway");
    let stream = RecordingChannel::new("stream");
    let monitor = monitor(
        vec![SourceEntry::new("s", "S", Box::new(source), true)],
        &push,
        &stream,
    );

    monitor.start().await;

    assert_eq!(push.len(), 1);
    assert_eq!(stream.kinds(), vec!["odds_update"]);
    monitor.stop().await;
}

#[tokio::test]
async fn startup_failure_surfaces_from_initialize() {
    let source = ScriptedSource::new().failing_init();
    let push = RecordingChannel::new("webhook");
    let stream = RecordingChannel::new("stream");
    let monitor = monitor(
        vec![SourceEntry::new("s", "S", Box::new(source), true)],
        &push,
        &stream,
    );

    assert!(monitor.initialize().await.is_err());
    assert_eq!(monitor.state(), MonitorState::Idle);
}

#[tokio::test]
async fn stop_closes_sources_once() {
    let source = ScriptedSource::new();
    let (inits, _, closes) = source.counts();
    let push = RecordingChannel::new("webhook");
    let stream = RecordingChannel::new("stream");
    let monitor = monitor(
        vec![SourceEntry::new("s", "S", Box::new(source), true)],
        &push,
        &stream,
    );

    monitor.initialize().await.unwrap();
    monitor.start().await;
    monitor.stop().await;
    monitor.stop().await;

    assert_eq!(inits.load(Ordering::SeqCst), 1);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn feed_to_webhook_through_config() {
    let feed_body = r#"[{"title": "Palmeiras x Santos", "league": "Paulista",
                         "odd": "2,40", "promotionType": "Super Odd"}]"#;
    let (feed_base, _feed_request) = serve_once("200 OK", feed_body).await;
    let (hook_base, hook_request) = serve_once("200 OK", "").await;

    let mut config: Config = test_config::config();
    config.alerts.webhook_url = format!("{hook_base}/api/alert");
    config.sources = vec![SourceConfig {
        key: "palpites".into(),
        name: "Palpites".into(),
        feed_url: format!("{feed_base}/promotions.json"),
        enabled: true,
        exclude_keywords: vec![],
    }];

    let monitor = Monitor::from_config(&config).unwrap();
    monitor.initialize().await.unwrap();
    let report = monitor.start().await.unwrap();

    let raw = tokio::time::timeout(Duration::from_secs(5), hook_request)
        .await
        .expect("webhook called")
        .unwrap();
    let body = raw.split("\r\n\r\n").nth(1).unwrap_or_default();
    let payload: serde_json::Value = serde_json::from_str(body).unwrap();

    assert_eq!(report.new_odds, 1);
    assert_eq!(payload["type"], "odds_update");
    assert_eq!(payload["source"], "oddwatch-test");
    assert_eq!(payload["data"][0]["homeTeam"], "Palmeiras");
    assert_eq!(payload["data"][0]["oddValue"], 2.4);
    assert_eq!(payload["data"][0]["source"], "palpites");

    monitor.stop().await;
}
