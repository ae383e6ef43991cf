//! Feed book - the oracle table and the feed table of the ledger snapshot

use crate::state::{Oracle, PriceFeed};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultline_common::{Amount, FeedId, LedgerError, LedgerResult, OracleId, PriceSource};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedBook {
    pub(crate) next_oracle_id: u32,
    pub(crate) oracles: BTreeMap<OracleId, Oracle>,
    pub(crate) feeds: BTreeMap<FeedId, PriceFeed>,
}

impl FeedBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty feed entry if none exists yet
    pub fn ensure_feed(&mut self, id: FeedId) -> &mut PriceFeed {
        self.feeds.entry(id).or_insert_with(|| PriceFeed::new(id))
    }

    pub fn feed(&self, id: &FeedId) -> Option<&PriceFeed> {
        self.feeds.get(id)
    }

    pub fn feeds(&self) -> impl Iterator<Item = &PriceFeed> {
        self.feeds.values()
    }

    pub fn oracle(&self, id: OracleId) -> Option<&Oracle> {
        self.oracles.get(&id)
    }

    pub fn oracles(&self) -> impl Iterator<Item = &Oracle> {
        self.oracles.values()
    }
}

impl PriceSource for FeedBook {
    fn live_price(&self, feed: &FeedId) -> LedgerResult<Amount> {
        self.feeds
            .get(feed)
            .and_then(PriceFeed::live)
            .ok_or(LedgerError::PriceUnavailable)
    }

    fn active_price(&self, feed: &FeedId) -> Option<Amount> {
        self.feeds.get(feed).and_then(|f| f.active)
    }
}
