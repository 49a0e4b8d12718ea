//! `FlightBoard` ties a feed source, the catalog cache and the query engine together.
//!
//! Each call returns either a query result (possibly absent or empty) or the
//! `FetchError` from the feed boundary, unchanged.

use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::catalog::FlightRecord;
use crate::config::BoardConfig;
use crate::error::FetchError;
use crate::feed_cache::CatalogCache;
use crate::feed_source::{FeedSource, HttpFeedSource};
use crate::query::{self, BoardEntry, BoardQuery, Direction};

#[derive(Clone)]
pub struct FlightBoard {
    cache: CatalogCache,
    query: BoardQuery,
}

impl FlightBoard {
    pub fn new(source: Arc<dyn FeedSource>, config: &BoardConfig) -> Self {
        Self {
            cache: CatalogCache::new(source, config.cache_ttl()),
            query: config.board_query(),
        }
    }

    /// Board backed by the HTTP timetable endpoint described by `config`
    pub fn from_config(client: Client, config: &BoardConfig) -> Self {
        let source = HttpFeedSource::new(client, config.feed_url.clone())
            .with_authorization(config.authorization.clone())
            .with_timeout(config.timeout());
        Self::new(Arc::new(source), config)
    }

    pub fn hub(&self) -> &str {
        &self.query.hub
    }

    /// Look up one flight by number; `Ok(None)` means not in the feed
    #[instrument(skip(self))]
    pub async fn flight(&self, flight_no: &str) -> Result<Option<FlightRecord>, FetchError> {
        let snapshot = self.cache.snapshot().await?;
        let found = query::lookup(&snapshot.catalog, flight_no).cloned();
        debug!(
            "Lookup of {} found={} (feed fetched at {})",
            flight_no,
            found.is_some(),
            snapshot.fetched_at
        );
        Ok(found)
    }

    pub async fn arrivals(&self, now: DateTime<Utc>) -> Result<Vec<BoardEntry>, FetchError> {
        self.board(Direction::Arrivals, now).await
    }

    pub async fn departures(&self, now: DateTime<Utc>) -> Result<Vec<BoardEntry>, FetchError> {
        self.board(Direction::Departures, now).await
    }

    #[instrument(skip(self))]
    pub async fn board(
        &self,
        direction: Direction,
        now: DateTime<Utc>,
    ) -> Result<Vec<BoardEntry>, FetchError> {
        let snapshot = self.cache.snapshot().await?;
        let rows = query::upcoming(&snapshot.catalog, direction, now, &self.query);
        metrics::histogram!("board.rows", "direction" => direction.to_string())
            .record(rows.len() as f64);
        debug!(
            "{} board has {} rows (feed fetched at {})",
            direction,
            rows.len(),
            snapshot.fetched_at
        );
        Ok(rows)
    }
}
