//! HTTP feed source.
//!
//! Polls a JSON endpoint that lists a site's current promotions and turns
//! each entry into a validated [`Odd`]. Amounts may be published as numbers
//! or as display text (`"R$ 50,00"`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::app::config::SourceConfig;
use crate::domain::text::{extract_teams_from_title, parse_bet_value, parse_odd_value, sanitize_text};
use crate::domain::{Odd, OddDraft};
use crate::error::{Result, SourceError};
use crate::port::{OddsSource, ScrapeResult};

/// A numeric field as published by a feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    fn to_decimal(&self, parse: fn(&str) -> Decimal) -> Decimal {
        match self {
            RawAmount::Number(n) => Decimal::try_from(*n).unwrap_or(Decimal::ZERO),
            RawAmount::Text(text) => parse(text),
        }
    }
}

/// One entry of the feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedListing {
    title: String,
    #[serde(default)]
    league: String,
    home_team: Option<String>,
    away_team: Option<String>,
    odd: RawAmount,
    min_bet: Option<RawAmount>,
    max_bet: Option<RawAmount>,
    freebet: Option<RawAmount>,
    #[serde(default)]
    promotion_type: String,
    url: Option<String>,
}

pub struct FeedSource {
    name: String,
    feed_url: String,
    exclude_keywords: Vec<String>,
    client: Client,
    ready: AtomicBool,
}

impl FeedSource {
    #[allow(clippy::result_large_err)]
    pub fn new(config: &SourceConfig, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            name: config.name.clone(),
            feed_url: config.feed_url.clone(),
            exclude_keywords: config
                .exclude_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            client,
            ready: AtomicBool::new(false),
        })
    }

    fn is_excluded(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.exclude_keywords.iter().any(|k| title.contains(k))
    }

    fn to_odd(&self, listing: FeedListing) -> Option<Odd> {
        if self.is_excluded(&listing.title) {
            debug!(source = %self.name, title = %listing.title, "Listing excluded by keyword");
            return None;
        }

        let (home_team, away_team) = match (listing.home_team, listing.away_team) {
            (Some(home), Some(away)) => (home, away),
            _ => extract_teams_from_title(&listing.title),
        };
        let amount = |raw: &Option<RawAmount>| {
            raw.as_ref()
                .map(|r| r.to_decimal(parse_bet_value))
                .unwrap_or(Decimal::ZERO)
        };

        let draft = OddDraft {
            game: sanitize_text(&listing.title),
            league: listing.league,
            home_team,
            away_team,
            odd_value: listing.odd.to_decimal(parse_odd_value),
            min_bet: amount(&listing.min_bet),
            max_bet: amount(&listing.max_bet),
            freebet: amount(&listing.freebet),
            promotion_type: listing.promotion_type,
            url: listing.url.unwrap_or_else(|| self.feed_url.clone()),
            expires_at: None,
        };

        match Odd::try_new(draft) {
            Ok(odd) => Some(odd),
            Err(e) => {
                debug!(source = %self.name, title = %listing.title, error = %e, "Listing rejected");
                None
            }
        }
    }
}

#[async_trait]
impl OddsSource for FeedSource {
    async fn initialize(&self) -> Result<()> {
        url::Url::parse(&self.feed_url)?;
        self.ready.store(true, Ordering::SeqCst);
        info!(source = %self.name, url = %self.feed_url, "Feed source initialized");
        Ok(())
    }

    async fn scrape_odds(&self) -> ScrapeResult {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(SourceError::NotInitialized);
        }

        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| SourceError::Unreachable(e.to_string()))?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(SourceError::ContentNotFound(self.feed_url.clone()));
            }
            s => return Err(SourceError::Unreachable(format!("HTTP {s}"))),
        }

        let listings: Vec<FeedListing> = response
            .json()
            .await
            .map_err(|e| SourceError::Extraction(e.to_string()))?;
        let total = listings.len();

        let odds: Vec<Odd> = listings
            .into_iter()
            .filter_map(|listing| self.to_odd(listing))
            .collect();

        info!(source = %self.name, listed = total, valid = odds.len(), "Feed polled");
        Ok(odds)
    }

    async fn close(&self) {
        self.ready.store(false, Ordering::SeqCst);
        info!(source = %self.name, "Feed source closed");
    }
}
