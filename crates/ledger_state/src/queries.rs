//! Read-only queries over a committed snapshot

use crate::history::{HistoryEntry, HistoryKey};
use crate::snapshot::Snapshot;
use serde::Serialize;
use vaultline_amm::PoolPair;
use vaultline_common::{Amount, FeedId, LedgerResult, LoanSchemeId, Owner, PoolId, TokenId, VaultId};
use vaultline_oracle::PriceFeed;
use vaultline_vault::{AuctionBatch, VaultView};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoanSchemeView {
    pub id: LoanSchemeId,
    pub min_ratio: u32,
    pub rate: Amount,
    pub default: bool,
    /// Height at which a scheduled destruction takes effect
    pub destroy_at: Option<u64>,
}

impl Snapshot {
    /// Vault with its valuation at active prices
    pub fn get_vault(&self, id: VaultId) -> LedgerResult<VaultView> {
        self.vaults.view(id, &self.market())
    }

    /// All vaults, optionally restricted to one owner, in id order
    pub fn list_vaults(&self, owner: Option<&Owner>) -> Vec<VaultView> {
        let market = self.market();
        self.vaults
            .vaults()
            .filter(|v| owner.map_or(true, |o| &v.owner == o))
            .filter_map(|v| self.vaults.view(v.id, &market).ok())
            .collect()
    }

    pub fn list_loan_schemes(&self) -> Vec<LoanSchemeView> {
        self.schemes
            .schemes()
            .map(|s| LoanSchemeView {
                id: s.id,
                min_ratio: s.min_ratio,
                rate: s.rate,
                default: self.schemes.is_default(&s.id),
                destroy_at: self.schemes.destroy_height(&s.id),
            })
            .collect()
    }

    pub fn get_pool(&self, id: PoolId) -> LedgerResult<&PoolPair> {
        self.pools.pool(id)
    }

    /// Pool for a token pair in either order
    pub fn get_pool_by_pair(&self, a: TokenId, b: TokenId) -> Option<&PoolPair> {
        self.pools.pool_by_pair(a, b)
    }

    /// Liquidity held by `owner` in `pool`
    pub fn get_position(&self, pool: PoolId, owner: &Owner) -> Amount {
        self.pools.position(pool, owner)
    }

    pub fn balance(&self, owner: &Owner, token: &TokenId) -> Amount {
        self.balances.get(owner, token)
    }

    /// Up to `limit` history entries of `owner`, newest first
    pub fn account_history(&self, owner: &Owner, limit: usize) -> Vec<(&HistoryKey, &HistoryEntry)> {
        self.history.for_owner(owner).take(limit).collect()
    }

    pub fn feed(&self, feed: &FeedId) -> Option<&PriceFeed> {
        self.feeds.feed(feed)
    }

    pub fn auctions(&self) -> impl Iterator<Item = &AuctionBatch> {
        self.vaults.auctions()
    }
}
