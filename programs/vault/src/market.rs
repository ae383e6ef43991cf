//! Read-only market context consulted by vault operations

use crate::state::{SchemeRegistry, TokenRegistry};
use vaultline_common::{Amount, FeedId, LedgerError, LedgerResult, PriceSource};

/// Blocks per year at a 30 second block time
pub const DEFAULT_BLOCKS_PER_YEAR: u64 = 1_051_200;

/// Which oracle price a valuation reads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceMode {
    /// Only feeds that are currently live; used by state changes
    Live,
    /// Last activated price even if stale or deviating; used by queries
    Active,
}

/// Everything outside the vault table that a vault operation reads
#[derive(Clone, Copy)]
pub struct Market<'a> {
    pub prices: &'a dyn PriceSource,
    pub tokens: &'a TokenRegistry,
    pub schemes: &'a SchemeRegistry,
    pub blocks_per_year: u64,
}

impl<'a> Market<'a> {
    pub fn new(
        prices: &'a dyn PriceSource,
        tokens: &'a TokenRegistry,
        schemes: &'a SchemeRegistry,
        blocks_per_year: u64,
    ) -> Self {
        Self { prices, tokens, schemes, blocks_per_year }
    }

    pub fn price(&self, feed: &FeedId, mode: PriceMode) -> LedgerResult<Amount> {
        match mode {
            PriceMode::Live => self.prices.live_price(feed),
            PriceMode::Active => self.prices.active_price(feed).ok_or(LedgerError::PriceUnavailable),
        }
    }
}
