//! Oracle state structures
//!
//! Oracles are appointed submitters; each one publishes timestamped
//! observations for the feeds it was appointed to. A [`PriceFeed`] keeps the
//! observations in submission order and the prices derived from them at each
//! interval boundary.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use vaultline_common::{Amount, FeedId, OracleId, Owner};

/// Maximum oracle weightage in the aggregate
pub const MAX_WEIGHTAGE: u8 = 100;

/// Aggregation parameters (a subset of the chain parameters)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleParams {
    /// Prices roll over when `height % price_interval_blocks == 0`
    pub price_interval_blocks: u64,
    /// Observation timestamps must lie within this distance of block time
    pub price_freshness_secs: i64,
    /// Relative move between active and next price that marks a feed deviating
    pub price_deviation: Amount,
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            price_interval_blocks: 6,
            price_freshness_secs: 3600,
            price_deviation: Amount::from_raw(30_000_000), // 0.3
        }
    }
}

/// Appointed price submitter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oracle {
    pub id: OracleId,
    /// Address allowed to submit for this oracle
    pub address: Owner,
    /// Weight in the aggregate (1..=100)
    pub weightage: u8,
    /// Feeds this oracle may publish
    pub feeds: BTreeSet<FeedId>,
    /// Latest accepted timestamp per feed (monotonic)
    pub last_timestamps: BTreeMap<FeedId, i64>,
}

impl Oracle {
    pub fn new(id: OracleId, address: Owner, weightage: u8, feeds: BTreeSet<FeedId>) -> Self {
        Self {
            id,
            address,
            weightage,
            feeds,
            last_timestamps: BTreeMap::new(),
        }
    }
}

/// One accepted price submission
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub oracle: OracleId,
    /// Block height in which the observation was submitted
    pub height: u64,
    /// Oracle-provided unix timestamp
    pub timestamp: i64,
    /// Price, always > 0
    pub amount: Amount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedStatus {
    /// No price has ever been activated
    Unset,
    /// Active price usable by state-changing operations
    Live,
    /// Active and next price differ by more than the deviation threshold
    Deviating,
    /// No fresh observation at the last interval boundary
    Stale,
}

/// Aggregated price feed for a `(token, currency)` pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFeed {
    pub id: FeedId,
    /// Accepted observations in submission order
    pub observations: Vec<Observation>,
    /// Price used for valuation during the current interval
    pub active: Option<Amount>,
    /// Price that becomes active at the next boundary
    pub next: Option<Amount>,
    pub status: FeedStatus,
    /// Height of the last boundary at which the feed was recomputed
    pub last_update_height: u64,
}

impl PriceFeed {
    pub fn new(id: FeedId) -> Self {
        Self {
            id,
            observations: Vec::new(),
            active: None,
            next: None,
            status: FeedStatus::Unset,
            last_update_height: 0,
        }
    }

    /// Active price if the feed is live
    pub fn live(&self) -> Option<Amount> {
        match self.status {
            FeedStatus::Live => self.active,
            _ => None,
        }
    }
}
