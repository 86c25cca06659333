//! Oddwatch - promotional odds monitor.
//!
//! Polls a fixed set of betting sites on a schedule, keeps a 24-hour
//! registry of the listings it has seen, and fans alerts out over an HTTP
//! webhook and a persistent WebSocket.
//!
//! # Architecture
//!
//! - **`domain`** - Listings, identifiers, alert payloads, text helpers
//! - **`port`** - [`OddsSource`](port::OddsSource) and [`AlertChannel`](port::AlertChannel) seams
//! - **`adapter`** - Feed source, webhook and WebSocket channels
//! - **`app`** - Dedup registry, dispatcher, cycle engine, monitor lifecycle
//! - **`cli`** - `run`, `check` and `validate` commands
//!
//! # Example
//!
//! ```no_run
//! use oddwatch::app::{Config, Monitor};
//!
//! # async fn demo() -> oddwatch::error::Result<()> {
//! let config = Config::from_env()?;
//! let monitor = Monitor::from_config(&config)?;
//! monitor.initialize().await?;
//! monitor.start().await;
//! // ...
//! monitor.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
