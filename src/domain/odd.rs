//! Promotional odd listings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::ids::{OddId, SourceKey};

/// Raw fields of a listing as extracted by a source, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OddDraft {
    pub game: String,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub odd_value: Decimal,
    pub min_bet: Decimal,
    pub max_bet: Decimal,
    pub freebet: Decimal,
    pub promotion_type: String,
    pub url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl OddDraft {
    /// Check the listing invariants without building an [`Odd`].
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.home_team.trim().is_empty() || self.away_team.trim().is_empty() {
            return Err(DomainError::MissingTeam);
        }
        if self.odd_value <= Decimal::ONE {
            return Err(DomainError::OddValueTooLow {
                value: self.odd_value,
            });
        }
        for (field, value) in [
            ("min_bet", self.min_bet),
            ("max_bet", self.max_bet),
            ("freebet", self.freebet),
        ] {
            if value < Decimal::ZERO {
                return Err(DomainError::NegativeAmount { field, value });
            }
        }
        if self.url.trim().is_empty() {
            return Err(DomainError::MissingUrl);
        }
        Ok(())
    }
}

/// One promotional betting listing observed from a source.
///
/// Immutable once built; the only later change is the source tag the
/// monitor attaches when the listing is first seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Odd {
    id: OddId,
    game: String,
    league: String,
    home_team: String,
    away_team: String,
    #[serde(with = "rust_decimal::serde::float")]
    odd_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    min_bet: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    max_bet: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    freebet: Decimal,
    promotion_type: String,
    url: String,
    detected_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<SourceKey>,
}

impl Odd {
    /// Validate a draft and stamp it as observed now.
    pub fn try_new(draft: OddDraft) -> Result<Self, DomainError> {
        Self::try_new_at(draft, Utc::now())
    }

    /// Validate a draft and stamp it with an explicit observation time.
    pub fn try_new_at(draft: OddDraft, detected_at: DateTime<Utc>) -> Result<Self, DomainError> {
        draft.validate()?;

        let id = OddId::fingerprint(
            &draft.home_team,
            &draft.away_team,
            draft.odd_value,
            &draft.promotion_type,
        );

        Ok(Self {
            id,
            game: draft.game,
            league: draft.league,
            home_team: draft.home_team,
            away_team: draft.away_team,
            odd_value: draft.odd_value,
            min_bet: draft.min_bet,
            max_bet: draft.max_bet,
            freebet: draft.freebet,
            promotion_type: draft.promotion_type,
            url: draft.url,
            detected_at,
            expires_at: draft.expires_at,
            source: None,
        })
    }

    /// Attach the key of the source this listing came from.
    #[must_use]
    pub fn tagged(mut self, source: SourceKey) -> Self {
        self.source = Some(source);
        self
    }

    pub fn id(&self) -> &OddId {
        &self.id
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn league(&self) -> &str {
        &self.league
    }

    pub fn home_team(&self) -> &str {
        &self.home_team
    }

    pub fn away_team(&self) -> &str {
        &self.away_team
    }

    pub fn odd_value(&self) -> Decimal {
        self.odd_value
    }

    pub fn min_bet(&self) -> Decimal {
        self.min_bet
    }

    pub fn max_bet(&self) -> Decimal {
        self.max_bet
    }

    pub fn freebet(&self) -> Decimal {
        self.freebet
    }

    pub fn promotion_type(&self) -> &str {
        &self.promotion_type
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// When this listing was first observed locally.
    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Source tag, set once the monitor has classified the listing as new.
    pub fn source(&self) -> Option<&SourceKey> {
        self.source.as_ref()
    }
}
