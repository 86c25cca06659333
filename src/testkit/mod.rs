//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] — Scripted [`OddsSource`](crate::port::OddsSource) with
//!   call counters and a handle for queuing results between cycles.
//! - [`channel`] — Recording [`AlertChannel`](crate::port::AlertChannel).
//! - [`domain`] — Builders for odds and source keys.
//! - [`config`] — Canonical test configurations.
//! - [`http`] — One-shot local HTTP responder.

pub mod channel;
pub mod config;
pub mod domain;
pub mod http;
pub mod source;
