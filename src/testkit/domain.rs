//! Builders for domain primitives used across tests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Odd, OddDraft, SourceKey};

/// A valid draft whose fingerprint is determined by `home` and `odd_value`.
pub fn draft(home: &str, odd_value: Decimal, freebet: Decimal) -> OddDraft {
    OddDraft {
        game: format!("{home} x Visitante"),
        league: "Série A".into(),
        home_team: home.into(),
        away_team: "Visitante".into(),
        odd_value,
        min_bet: Decimal::ONE,
        max_bet: Decimal::from(100),
        freebet,
        promotion_type: "Super Odd".into(),
        url: format!("https://odds.example.com/{home}"),
        expires_at: None,
    }
}

/// Build an [`Odd`] observed now.
pub fn odd(home: &str, odd_value: Decimal, freebet: Decimal) -> Odd {
    odd_at(home, odd_value, freebet, Utc::now())
}

/// Build an [`Odd`] observed at a specific time.
pub fn odd_at(home: &str, odd_value: Decimal, freebet: Decimal, at: DateTime<Utc>) -> Odd {
    match Odd::try_new_at(draft(home, odd_value, freebet), at) {
        Ok(odd) => odd,
        Err(e) => panic!("test odd for {home} is invalid: {e}"),
    }
}

/// Create a [`SourceKey`] from a string.
pub fn key(key: &str) -> SourceKey {
    SourceKey::new(key)
}
