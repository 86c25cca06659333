//! Source adapter port.
//!
//! One implementation per monitored site. Page mechanics live entirely
//! behind this trait.

use async_trait::async_trait;

use crate::domain::Odd;
use crate::error::{Result, SourceError};

/// Outcome of polling a source once.
pub type ScrapeResult = std::result::Result<Vec<Odd>, SourceError>;

/// A site that publishes promotional odds.
///
/// # Implementation Notes
///
/// - `initialize` failing is a startup failure and aborts the process.
/// - `scrape_odds` should return within a bounded time; the monitor also
///   wraps it in its own timeout.
/// - `close` is best-effort; implementations log rather than fail.
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Prepare whatever the source needs before the first poll.
    async fn initialize(&self) -> Result<()>;

    /// Fetch the listings currently published by the site.
    async fn scrape_odds(&self) -> ScrapeResult;

    /// Release resources held by the source.
    async fn close(&self);
}
