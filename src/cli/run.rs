//! Handler for the `run` command.

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::app::Monitor;
use crate::cli::{load_config, Cli, RunArgs};
use crate::error::{Error, Result};

/// Execute the run command.
pub async fn execute(cli: &Cli, args: &RunArgs) -> Result<()> {
    let mut config = load_config(&cli.config)?;

    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    config.init_logging();
    install_panic_hook();

    // Installed before any slow work so an early signal still stops cleanly.
    let mut signals = ShutdownSignals::install();

    info!(
        sources = config.sources.len(),
        interval_minutes = config.monitor.interval_minutes,
        webhook = !config.alerts.webhook_url.is_empty(),
        stream = !config.alerts.stream_url.is_empty(),
        "oddwatch starting"
    );

    let monitor = Monitor::from_config(&config)?;
    let mut faults = monitor.subscribe_faults();

    tokio::select! {
        result = monitor.initialize() => {
            if let Err(e) = result {
                error!(error = %e, "Startup failed");
                return Err(e);
            }
        }
        signal = signals.recv() => {
            info!(signal, "Shutdown requested during startup");
            return Ok(());
        }
    }

    let start = monitor.start();
    tokio::pin!(start);

    // `start` is polled first so the monitor is running before a signal
    // can be observed, and stop() always has something to stop.
    let fault = tokio::select! {
        biased;
        _ = &mut start => wait_for_shutdown(&mut signals, &mut faults).await,
        fault = wait_for_shutdown(&mut signals, &mut faults) => {
            info!("Finishing the first cycle before stopping");
            tokio::join!(start, monitor.stop());
            fault
        }
    };
    monitor.stop().await;

    match fault {
        Some(message) => Err(Error::Fault(message)),
        None => {
            info!("oddwatch stopped");
            Ok(())
        }
    }
}

/// Resolve on a shutdown signal or a monitor fault. Returns the fault, if any.
async fn wait_for_shutdown(
    signals: &mut ShutdownSignals,
    faults: &mut watch::Receiver<Option<String>>,
) -> Option<String> {
    tokio::select! {
        signal = signals.recv() => {
            info!(signal, "Shutdown signal received");
            None
        }
        changed = faults.changed() => match changed {
            Ok(()) => faults.borrow().clone(),
            Err(_) => None,
        },
    }
}

/// SIGINT and SIGTERM listeners, registered as soon as they are created.
struct ShutdownSignals {
    #[cfg(unix)]
    interrupt: Option<signal::unix::Signal>,
    #[cfg(unix)]
    terminate: Option<signal::unix::Signal>,
}

impl ShutdownSignals {
    fn install() -> Self {
        #[cfg(unix)]
        {
            use signal::unix::SignalKind;

            let listen = |kind: SignalKind, name: &'static str| match signal::unix::signal(kind) {
                Ok(stream) => Some(stream),
                Err(e) => {
                    warn!(signal = name, error = %e, "Cannot listen for signal");
                    None
                }
            };
            Self {
                interrupt: listen(SignalKind::interrupt(), "SIGINT"),
                terminate: listen(SignalKind::terminate(), "SIGTERM"),
            }
        }
        #[cfg(not(unix))]
        {
            Self {}
        }
    }

    /// Wait for the next signal and return its name.
    async fn recv(&mut self) -> &'static str {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = next_signal(&mut self.interrupt) => "SIGINT",
                _ = next_signal(&mut self.terminate) => "SIGTERM",
            }
        }
        #[cfg(not(unix))]
        {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            "ctrl-c"
        }
    }
}

#[cfg(unix)]
async fn next_signal(stream: &mut Option<signal::unix::Signal>) {
    match stream {
        Some(stream) => {
            stream.recv().await;
        }
        None => std::future::pending().await,
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        error!(panic = %info, "Unhandled panic");
    }));
}
