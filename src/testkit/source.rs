//! Scripted [`OddsSource`] for driving the monitor through known cycles.
//!
//! Each `scrape_odds()` pops the next scripted result; once the script is
//! exhausted the source reports no listings. Results can be queued between
//! cycles through a [`SourceScript`] handle.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Odd;
use crate::error::{Error, Result, SourceError};
use crate::port::{OddsSource, ScrapeResult};

/// Shared handle for queuing results into a [`ScriptedSource`].
#[derive(Clone, Default)]
pub struct SourceScript {
    results: Arc<Mutex<VecDeque<ScrapeResult>>>,
}

impl SourceScript {
    pub fn push(&self, result: ScrapeResult) {
        self.results.lock().push_back(result);
    }

    pub fn push_odds(&self, odds: Vec<Odd>) {
        self.push(Ok(odds));
    }

    pub fn push_failure(&self, error: SourceError) {
        self.push(Err(error));
    }

    fn pop(&self) -> ScrapeResult {
        self.results.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Default)]
pub struct ScriptedSource {
    script: SourceScript,
    fail_init: bool,
    panic_on_scrape: bool,
    delay: Option<Duration>,
    init_count: Arc<AtomicU32>,
    scrape_count: Arc<AtomicU32>,
    close_count: Arc<AtomicU32>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(self, results: Vec<ScrapeResult>) -> Self {
        for result in results {
            self.script.push(result);
        }
        self
    }

    /// Make `initialize()` fail with a startup error.
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Make `scrape_odds()` panic.
    pub fn panicking(mut self) -> Self {
        self.panic_on_scrape = true;
        self
    }

    /// Sleep before answering each scrape.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Handle for queuing further results after the source is handed off.
    pub fn script(&self) -> SourceScript {
        self.script.clone()
    }

    /// Shared counters for `(initialize, scrape_odds, close)` calls.
    pub fn counts(&self) -> (Arc<AtomicU32>, Arc<AtomicU32>, Arc<AtomicU32>) {
        (
            Arc::clone(&self.init_count),
            Arc::clone(&self.scrape_count),
            Arc::clone(&self.close_count),
        )
    }
}

#[async_trait]
impl OddsSource for ScriptedSource {
    async fn initialize(&self) -> Result<()> {
        self.init_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(Error::Startup("scripted source refused to start".into()));
        }
        Ok(())
    }

    async fn scrape_odds(&self) -> ScrapeResult {
        self.scrape_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_on_scrape {
            panic!("scripted source panicked");
        }
        self.script.pop()
    }

    async fn close(&self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
    }
}
