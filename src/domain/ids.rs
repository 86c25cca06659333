//! Domain identifier types with proper encapsulation.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Length of a derived odd fingerprint.
const FINGERPRINT_LEN: usize = 16;

/// Odd identifier - a fingerprint derived from the listing's content.
///
/// Identical `(home, away, value, promotion)` tuples always produce the same
/// id. Distinct listings that share that tuple collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OddId(String);

impl OddId {
    /// Create a new OddId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the fingerprint for a listing.
    ///
    /// Base64 of `"{home}-{away}-{value}-{promotion}"`, truncated to 16 chars.
    #[must_use]
    pub fn fingerprint(
        home_team: &str,
        away_team: &str,
        odd_value: Decimal,
        promotion_type: &str,
    ) -> Self {
        let base = format!(
            "{home_team}-{away_team}-{}-{promotion_type}",
            odd_value.normalize()
        );
        let mut encoded = STANDARD.encode(base.as_bytes());
        encoded.truncate(FINGERPRINT_LEN);
        Self(encoded)
    }

    /// Get the odd ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OddId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OddId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for OddId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Stable key of a monitored source (e.g. `betesporte`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceKey(String);

impl SourceKey {
    /// Create a new SourceKey from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the source key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SourceKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SourceKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
