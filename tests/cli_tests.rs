mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use support::config::{write_temp_config, OVERRIDES, VALID};

fn oddwatch() -> Command {
    let mut cmd = Command::cargo_bin("oddwatch").expect("binary built");
    for var in OVERRIDES {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn validate_prints_summary() {
    let file = write_temp_config(VALID);

    oddwatch()
        .arg("--config")
        .arg(file.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("betesporte (BetEsporte) enabled"))
        .stdout(predicate::str::contains("br4bet (Br4bet) disabled"));
}

#[test]
fn validate_fails_on_bad_config() {
    let file = write_temp_config("[monitor]\ninterval_minutes = 0\n");

    oddwatch()
        .arg("--config")
        .arg(file.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval_minutes"));
}

#[test]
fn check_unknown_source_fails() {
    let file = write_temp_config(VALID);

    oddwatch()
        .args(["check", "nowhere", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown source: nowhere"));
}

#[test]
fn check_reports_unreachable_source() {
    let file = write_temp_config(VALID);

    oddwatch()
        .args(["check", "betesporte", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("source unreachable"));
}

#[cfg(unix)]
#[test]
fn sigterm_during_first_cycle_stops_gracefully() {
    use assert_cmd::prelude::*;
    use std::io::{BufRead, BufReader};
    use std::process::{Command as StdCommand, Stdio};
    use std::time::{Duration, Instant};

    // Accepts at the kernel level and never answers, so the first poll hangs
    // until the source timeout.
    let silent = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let config = format!(
        r#"
[monitor]
timeout_ms = 2000
pacing_ms = 0

[[sources]]
key = "slow"
name = "Slow"
feed_url = "http://{}/promotions.json"
"#,
        silent.local_addr().expect("addr")
    );
    let file = write_temp_config(&config);

    let mut cmd = StdCommand::cargo_bin("oddwatch").expect("binary built");
    for var in OVERRIDES {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    let mut child = cmd
        .arg("--config")
        .arg(file.path())
        .arg("run")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn oddwatch");

    let mut lines = BufReader::new(child.stdout.take().expect("stdout")).lines();
    let in_cycle = lines
        .by_ref()
        .map_while(|line| line.ok())
        .any(|line| line.contains("Checking all sources"));
    assert!(in_cycle, "first cycle never started");
    std::thread::spawn(move || lines.for_each(drop));

    let killed = StdCommand::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .expect("run kill");
    assert!(killed.success());

    let deadline = Instant::now() + Duration::from_secs(15);
    let status = loop {
        if let Some(status) = child.try_wait().expect("wait") {
            break status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("oddwatch did not exit after SIGTERM");
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    assert!(status.success(), "exit status: {status:?}");
}
