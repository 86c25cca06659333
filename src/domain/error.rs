//! Domain validation errors.
//!
//! Returned by `try_new` constructors when an odd listing violates the
//! basic invariants every source must respect.
//!
//! # Examples
//!
//! ```
//! use oddwatch::domain::error::DomainError;
//! use oddwatch::domain::{Odd, OddDraft};
//! use rust_decimal_macros::dec;
//!
//! let draft = OddDraft {
//!     home_team: "Flamengo".into(),
//!     away_team: "Palmeiras".into(),
//!     odd_value: dec!(0.9),
//!     url: "https://example.com/promo".into(),
//!     ..OddDraft::default()
//! };
//!
//! assert!(matches!(Odd::try_new(draft), Err(DomainError::OddValueTooLow { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Both teams must be named.
    #[error("missing team name")]
    MissingTeam,

    /// Promotional odds are decimal odds and must pay more than the stake.
    #[error("odd value must be greater than 1, got {value}")]
    OddValueTooLow {
        /// The rejected odd value.
        value: Decimal,
    },

    /// Stake limits and freebets cannot be negative.
    #[error("{field} cannot be negative, got {value}")]
    NegativeAmount {
        /// Which amount was negative.
        field: &'static str,
        /// The rejected amount.
        value: Decimal,
    },

    /// Every listing must link back to where it was observed.
    #[error("listing url cannot be empty")]
    MissingUrl,
}
