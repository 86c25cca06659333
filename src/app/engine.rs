//! One polling cycle over the ordered source collection.
//!
//! Sources are polled one after another with a pacing pause between them.
//! A failing source is reported and skipped; it never aborts the cycle.
//! New listings are alerted in one consolidated batch first, then each
//! listing that meets the escalation policy is alerted on its own.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use tracing::{debug, error, info, warn};

use crate::app::dispatcher::AlertDispatcher;
use crate::app::escalation::EscalationPolicy;
use crate::app::registry::{DedupRegistry, RETENTION};
use crate::domain::{Odd, SourceKey};
use crate::error::{Error, Result, SourceError};
use crate::port::{OddsSource, ScrapeResult};

/// A monitored source, in polling order.
pub struct SourceEntry {
    key: SourceKey,
    name: String,
    source: Box<dyn OddsSource>,
    enabled: bool,
    initialized: bool,
}

impl SourceEntry {
    pub fn new(
        key: impl Into<SourceKey>,
        name: impl Into<String>,
        source: Box<dyn OddsSource>,
        enabled: bool,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            source,
            enabled,
            initialized: false,
        }
    }

    pub fn key(&self) -> &SourceKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn ensure_initialized(&mut self) -> Result<()> {
        if !self.initialized {
            self.source.initialize().await?;
            self.initialized = true;
            info!(source = %self.key, "Source initialized");
        }
        Ok(())
    }

    /// Poll once, bounded by `timeout`.
    async fn poll(&self, timeout: Duration) -> ScrapeResult {
        match tokio::time::timeout(timeout, self.source.scrape_odds()).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                after_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

/// Timing knobs for a cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleSettings {
    pub timeout: Duration,
    pub pacing: Duration,
    pub retention: TimeDelta,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            pacing: Duration::from_secs(2),
            retention: RETENTION,
        }
    }
}

/// What one cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub polled: usize,
    pub failed: Vec<SourceKey>,
    pub new_odds: usize,
    pub escalated: usize,
    pub evicted: usize,
}

pub struct CycleEngine {
    sources: Vec<SourceEntry>,
    registry: DedupRegistry,
    dispatcher: Arc<AlertDispatcher>,
    escalation: EscalationPolicy,
    settings: CycleSettings,
    cycles: u64,
}

impl CycleEngine {
    pub fn new(
        sources: Vec<SourceEntry>,
        dispatcher: Arc<AlertDispatcher>,
        escalation: EscalationPolicy,
        settings: CycleSettings,
    ) -> Self {
        Self {
            sources,
            registry: DedupRegistry::new(),
            dispatcher,
            escalation,
            settings,
            cycles: 0,
        }
    }

    /// Initialize every enabled source, then the dispatcher.
    ///
    /// Any failure here is a startup failure.
    pub async fn initialize(&mut self) -> Result<()> {
        for entry in self.sources.iter_mut().filter(|e| e.enabled) {
            let name = entry.name.clone();
            entry
                .ensure_initialized()
                .await
                .map_err(|e| Error::Startup(format!("{name}: {e}")))?;
        }
        self.dispatcher.initialize().await
    }

    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycles += 1;
        let mut report = CycleReport {
            cycle: self.cycles,
            ..CycleReport::default()
        };
        info!(cycle = report.cycle, "Checking all sources");

        let mut fresh: Vec<Odd> = Vec::new();
        let timeout = self.settings.timeout;
        let pacing = self.settings.pacing;
        let mut first = true;

        for entry in self.sources.iter_mut().filter(|e| e.enabled) {
            if !first && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
            first = false;
            report.polled += 1;

            let result = match entry.ensure_initialized().await {
                Ok(()) => entry.poll(timeout).await,
                Err(e) => Err(SourceError::Unreachable(e.to_string())),
            };

            match result {
                Ok(odds) => {
                    let before = fresh.len();
                    for odd in odds {
                        let odd = odd.tagged(entry.key.clone());
                        if !self.registry.has(&entry.key, odd.id()) {
                            fresh.push(odd.clone());
                        }
                        self.registry.put(&entry.key, odd);
                    }
                    let found = fresh.len() - before;
                    if found > 0 {
                        info!(source = %entry.key, new = found, "New odds found");
                    } else {
                        debug!(source = %entry.key, "No new odds");
                    }
                }
                Err(e) => {
                    error!(source = %entry.key, error = %e, "Source check failed");
                    report.failed.push(entry.key.clone());
                    self.dispatcher
                        .send_error(format!("{}: {e}", entry.name))
                        .await;
                }
            }
        }

        report.new_odds = fresh.len();
        if !fresh.is_empty() {
            info!(total = fresh.len(), "New odds this cycle");
            let escalated: Vec<Odd> = fresh
                .iter()
                .filter(|odd| self.escalation.is_escalated(odd))
                .cloned()
                .collect();
            report.escalated = escalated.len();

            self.dispatcher.send_odds_update(fresh).await;
            for odd in escalated {
                self.dispatcher.send_new_odd(odd).await;
            }
        }

        report.evicted = self.registry.evict_older_than(self.settings.retention);
        if report.evicted > 0 {
            info!(evicted = report.evicted, "Expired odds removed");
        }

        info!(
            cycle = report.cycle,
            polled = report.polled,
            failed = report.failed.len(),
            new = report.new_odds,
            escalated = report.escalated,
            known = self.registry.size(),
            "Cycle complete"
        );
        report
    }

    /// Poll one source on demand without touching the registry or alerting.
    pub async fn check_source(&mut self, key: &str) -> Result<Vec<Odd>> {
        let timeout = self.settings.timeout;
        let entry = self
            .sources
            .iter_mut()
            .find(|e| e.key.as_str() == key)
            .ok_or_else(|| Error::UnknownSource(key.to_string()))?;

        info!(source = %entry.key, "Manual check");
        entry.ensure_initialized().await?;
        Ok(entry.poll(timeout).await?)
    }

    /// Flip a source's enabled flag. Returns false for unknown keys.
    pub fn set_enabled(&mut self, key: &str, enabled: bool) -> bool {
        match self.sources.iter_mut().find(|e| e.key.as_str() == key) {
            Some(entry) => {
                entry.enabled = enabled;
                info!(source = %entry.key, enabled, "Source toggled");
                true
            }
            None => {
                warn!(source = key, "Unknown source");
                false
            }
        }
    }

    pub fn enabled_sources(&self) -> Vec<String> {
        self.sources
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn sources(&self) -> &[SourceEntry] {
        &self.sources
    }

    pub fn registry(&self) -> &DedupRegistry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Arc<AlertDispatcher> {
        &self.dispatcher
    }

    /// Close every initialized source, then the dispatcher.
    pub async fn close(&mut self) {
        for entry in self.sources.iter_mut().filter(|e| e.initialized) {
            entry.source.close().await;
            entry.initialized = false;
        }
        self.dispatcher.close().await;
    }
}
