//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams the monitor talks through; adapters implement them
//! to reach real sites and real delivery targets.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                                                       ▼
//! ┌─────────┐                                          ┌───────────┐
//! │ Source  │                                          │  Channel  │
//! │ Adapter │                                          │  Adapter  │
//! └─────────┘                                          └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`OddsSource`] - Polls one site for promotional listings
//! - [`AlertChannel`] - Delivers serialized alerts to one target

mod channel;
mod source;

pub use channel::{AlertChannel, DeliveryOutcome};
pub use source::{OddsSource, ScrapeResult};
