//! Handlers for the `check` and `validate` commands.

use crate::app::Monitor;
use crate::cli::{load_config, CheckArgs, Cli};
use crate::error::Result;

/// Poll a single source once and print its listings.
pub async fn execute(cli: &Cli, args: &CheckArgs) -> Result<()> {
    let config = load_config(&cli.config)?;
    let monitor = Monitor::from_config(&config)?;

    let odds = monitor.check_source(&args.source).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&odds)?);
        return Ok(());
    }

    println!("{}: {} listing(s)", args.source, odds.len());
    for odd in &odds {
        println!(
            "  {:<40} {:>6}  freebet {:>7}  {}",
            odd.game(),
            odd.odd_value(),
            odd.freebet(),
            odd.promotion_type()
        );
    }
    Ok(())
}

/// Load and validate configuration, then print a summary.
pub fn execute_validate(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.config)?;

    println!("Configuration is valid");
    println!();
    println!("  Interval: {} min", config.monitor.interval_minutes);
    println!("  Timeout: {} ms", config.monitor.timeout_ms);
    println!(
        "  Webhook: {}",
        display_or(&config.alerts.webhook_url, "disabled")
    );
    println!(
        "  Stream: {}",
        display_or(&config.alerts.stream_url, "disabled")
    );
    println!("  Sources:");
    for source in &config.sources {
        let state = if source.enabled { "enabled" } else { "disabled" };
        println!("    {} ({}) {}", source.key, source.name, state);
    }
    Ok(())
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
