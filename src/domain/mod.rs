//! Source-agnostic domain types: listings, identifiers, alert payloads.

mod alert;
mod ids;
mod odd;

pub mod error;
pub mod text;

pub use alert::{AlertKind, AlertPayload};
pub use ids::{OddId, SourceKey};
pub use odd::{Odd, OddDraft};
