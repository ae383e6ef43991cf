//! Price lookup seam between the oracle aggregator and its consumers

use crate::amount::Amount;
use crate::error::LedgerResult;
use crate::types::FeedId;

/// Read access to aggregated oracle prices
///
/// State-changing operations use [`PriceSource::live_price`], which refuses
/// stale, deviating or never-set feeds. Reporting paths use
/// [`PriceSource::active_price`], which returns the last activated price
/// whenever one exists.
pub trait PriceSource {
    /// Active price of a feed that is currently live, or `PriceUnavailable`
    fn live_price(&self, feed: &FeedId) -> LedgerResult<Amount>;

    /// Last activated price, if any
    fn active_price(&self, feed: &FeedId) -> Option<Amount>;
}
