//! Monitor lifecycle and scheduling.
//!
//! ```text
//!   Idle ──start()──▶ Running ──stop()──▶ Stopping ──▶ Idle
//! ```
//!
//! `start()` runs one cycle immediately, then a scheduler task runs a cycle
//! every interval. Cycles never overlap: the engine sits behind an async
//! mutex and the scheduler waits for each cycle before the next tick.
//! `stop()` lets an in-flight cycle finish, then closes sources and channels.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::adapter::FeedSource;
use crate::app::config::Config;
use crate::app::dispatcher::AlertDispatcher;
use crate::app::engine::{CycleEngine, CycleReport, CycleSettings, SourceEntry};
use crate::app::escalation::EscalationPolicy;
use crate::app::registry::RETENTION;
use crate::domain::Odd;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    Idle,
    Running,
    Stopping,
}

/// Point-in-time view of the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStats {
    pub known_odds: usize,
    pub state: MonitorState,
    pub interval_minutes: u64,
    pub enabled_sources: Vec<String>,
}

struct Scheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct Monitor {
    engine: Arc<tokio::sync::Mutex<CycleEngine>>,
    state: Arc<RwLock<MonitorState>>,
    interval: Duration,
    stats_interval: Duration,
    scheduler: Mutex<Option<Scheduler>>,
    faults: Arc<watch::Sender<Option<String>>>,
}

impl Monitor {
    pub fn new(engine: CycleEngine, interval: Duration, stats_interval: Duration) -> Self {
        let (faults, _) = watch::channel(None);
        Self {
            engine: Arc::new(tokio::sync::Mutex::new(engine)),
            state: Arc::new(RwLock::new(MonitorState::Idle)),
            interval,
            stats_interval,
            scheduler: Mutex::new(None),
            faults: Arc::new(faults),
        }
    }

    /// Build feed sources and alert channels from configuration.
    #[allow(clippy::result_large_err)]
    pub fn from_config(config: &Config) -> Result<Self> {
        let monitor = &config.monitor;
        let sources = config
            .sources
            .iter()
            .map(|sc| -> Result<SourceEntry> {
                let feed = FeedSource::new(sc, monitor.timeout(), &config.alerts.user_agent)?;
                Ok(SourceEntry::new(
                    sc.key.as_str(),
                    sc.name.as_str(),
                    Box::new(feed),
                    sc.enabled,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let dispatcher = Arc::new(AlertDispatcher::from_config(&config.alerts)?);
        let settings = CycleSettings {
            timeout: monitor.timeout(),
            pacing: monitor.pacing(),
            retention: RETENTION,
        };
        let engine = CycleEngine::new(
            sources,
            dispatcher,
            EscalationPolicy::from(&config.escalation),
            settings,
        );

        Ok(Self::new(engine, monitor.interval(), monitor.stats_interval()))
    }

    /// Initialize enabled sources and alert channels.
    pub async fn initialize(&self) -> Result<()> {
        info!("Initializing monitor");
        self.engine.lock().await.initialize().await?;
        info!("Monitor initialized");
        Ok(())
    }

    /// Run the first cycle and arm the timer.
    ///
    /// Returns `None` without doing anything if the monitor is not idle. Also
    /// returns `None` if the first cycle panics: the panic is published on
    /// the fault channel and no timer is armed.
    pub async fn start(&self) -> Option<CycleReport> {
        {
            let mut state = self.state.write();
            if *state != MonitorState::Idle {
                warn!(state = ?*state, "Monitor already running");
                return None;
            }
            *state = MonitorState::Running;
        }
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting odds monitor"
        );

        let report = guarded_cycle(&self.engine, &self.faults).await?;

        // stop() may have begun while the first cycle ran.
        let state = self.state.read();
        if *state != MonitorState::Running {
            info!(state = ?*state, "Monitor stopped during the first cycle");
            return Some(report);
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = SchedulerTask {
            engine: Arc::clone(&self.engine),
            state: Arc::clone(&self.state),
            interval: self.interval,
            stats_interval: self.stats_interval,
            shutdown: shutdown_rx,
            faults: Arc::clone(&self.faults),
        };
        let handle = tokio::spawn(task.run());
        *self.scheduler.lock() = Some(Scheduler { shutdown, handle });
        drop(state);

        Some(report)
    }

    /// Stop scheduling, wait for any in-flight cycle, then release resources.
    pub async fn stop(&self) {
        {
            let mut state = self.state.write();
            if *state != MonitorState::Running {
                return;
            }
            *state = MonitorState::Stopping;
        }
        info!("Stopping odds monitor");

        let scheduler = self.scheduler.lock().take();
        if let Some(scheduler) = scheduler {
            let _ = scheduler.shutdown.send(true);
            if let Err(e) = scheduler.handle.await {
                warn!(error = %e, "Scheduler ended abnormally");
            }
        }

        self.engine.lock().await.close().await;
        *self.state.write() = MonitorState::Idle;
        info!("Odds monitor stopped");
    }

    /// Run one cycle now. Does nothing unless the monitor is running.
    pub async fn run_cycle(&self) -> Option<CycleReport> {
        if self.state() != MonitorState::Running {
            return None;
        }
        Some(self.engine.lock().await.run_cycle().await)
    }

    /// Poll a single source and return what it reports, without alerting.
    pub async fn check_source(&self, key: &str) -> Result<Vec<Odd>> {
        self.engine.lock().await.check_source(key).await
    }

    pub async fn enable_source(&self, key: &str) -> bool {
        self.engine.lock().await.set_enabled(key, true)
    }

    pub async fn disable_source(&self, key: &str) -> bool {
        self.engine.lock().await.set_enabled(key, false)
    }

    pub fn state(&self) -> MonitorState {
        *self.state.read()
    }

    pub async fn stats(&self) -> MonitorStats {
        let engine = self.engine.lock().await;
        stats_of(&engine, self.state(), self.interval)
    }

    /// Receives a message when a cycle panics.
    pub fn subscribe_faults(&self) -> watch::Receiver<Option<String>> {
        self.faults.subscribe()
    }
}

fn stats_of(engine: &CycleEngine, state: MonitorState, interval: Duration) -> MonitorStats {
    MonitorStats {
        known_odds: engine.registry().size(),
        state,
        interval_minutes: interval.as_secs() / 60,
        enabled_sources: engine.enabled_sources(),
    }
}

struct SchedulerTask {
    engine: Arc<tokio::sync::Mutex<CycleEngine>>,
    state: Arc<RwLock<MonitorState>>,
    interval: Duration,
    stats_interval: Duration,
    shutdown: watch::Receiver<bool>,
    faults: Arc<watch::Sender<Option<String>>>,
}

impl SchedulerTask {
    async fn run(mut self) {
        let mut cycles = interval_at(Instant::now() + self.interval, self.interval);
        cycles.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut stats = interval_at(Instant::now() + self.stats_interval, self.stats_interval);
        stats.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                result = self.shutdown.changed() => {
                    if result.is_err() || *self.shutdown.borrow() {
                        info!("Scheduler shutdown");
                        break;
                    }
                }
                _ = cycles.tick() => {
                    if *self.state.read() != MonitorState::Running {
                        break;
                    }
                    if guarded_cycle(&self.engine, &self.faults).await.is_none() {
                        break;
                    }
                }
                _ = stats.tick() => {
                    let state = *self.state.read();
                    let engine = self.engine.lock().await;
                    let snapshot = stats_of(&engine, state, self.interval);
                    info!(
                        known_odds = snapshot.known_odds,
                        state = ?snapshot.state,
                        interval_minutes = snapshot.interval_minutes,
                        enabled_sources = ?snapshot.enabled_sources,
                        "Monitor stats"
                    );
                }
            }
        }
    }
}

/// Run one cycle, turning a panic into a published fault.
async fn guarded_cycle(
    engine: &tokio::sync::Mutex<CycleEngine>,
    faults: &watch::Sender<Option<String>>,
) -> Option<CycleReport> {
    let cycle = AssertUnwindSafe(async { engine.lock().await.run_cycle().await })
        .catch_unwind()
        .await;

    match cycle {
        Ok(report) => Some(report),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(error = %message, "Cycle panicked");
            faults.send_replace(Some(message));
            None
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "cycle panicked".to_string()
    }
}
