//! AMM state - pool pairs and the liquidity ledger

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultline_common::{Amount, LedgerError, LedgerResult, Owner, PoolId, TokenId};

/// Two-token constant product pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPair {
    pub id: PoolId,

    pub token_a: TokenId,
    pub token_b: TokenId,

    /// Reserve of `token_a` (x in x·y=k)
    pub reserve_a: Amount,

    /// Reserve of `token_b` (y in x·y=k)
    pub reserve_b: Amount,

    /// Fraction of every swap input kept by the pool, in [0, 1)
    pub commission: Amount,

    /// Liquidity minted to providers; zero iff both reserves are zero
    pub total_liquidity: Amount,

    pub owner: Owner,
}

impl PoolPair {
    pub fn new(id: PoolId, token_a: TokenId, token_b: TokenId, commission: Amount, owner: Owner) -> Self {
        Self {
            id,
            token_a,
            token_b,
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            commission,
            total_liquidity: Amount::ZERO,
            owner,
        }
    }

    /// Spot price of A in units of B: `reserve_b / reserve_a`
    pub fn price_a_in_b(&self) -> Option<Amount> {
        if !self.reserve_a.is_positive() {
            return None;
        }
        self.reserve_b.checked_div(self.reserve_a).ok()
    }

    /// Reserves ordered as (input side, output side) for a swap of `token`
    pub fn orient(&self, token: &TokenId) -> LedgerResult<(Amount, Amount, TokenId)> {
        if *token == self.token_a {
            Ok((self.reserve_a, self.reserve_b, self.token_b))
        } else if *token == self.token_b {
            Ok((self.reserve_b, self.reserve_a, self.token_a))
        } else {
            Err(LedgerError::UnknownToken)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_liquidity.is_zero()
    }
}

/// Pool table and liquidity positions of the ledger snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolBook {
    pub(crate) next_pool_id: u32,
    pub(crate) pools: BTreeMap<PoolId, PoolPair>,
    /// Unordered pair (smaller symbol first) -> pool
    pub(crate) pairs: BTreeMap<(TokenId, TokenId), PoolId>,
    /// Pool -> owner -> liquidity
    pub(crate) positions: BTreeMap<PoolId, BTreeMap<Owner, Amount>>,
}

pub(crate) fn pair_key(a: TokenId, b: TokenId) -> (TokenId, TokenId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl PoolBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(&self, id: PoolId) -> LedgerResult<&PoolPair> {
        self.pools.get(&id).ok_or(LedgerError::UnknownPool)
    }

    pub fn pools(&self) -> impl Iterator<Item = &PoolPair> {
        self.pools.values()
    }

    /// Pool trading `a` against `b`, in either order
    pub fn pool_by_pair(&self, a: TokenId, b: TokenId) -> Option<&PoolPair> {
        self.pairs.get(&pair_key(a, b)).and_then(|id| self.pools.get(id))
    }

    /// Liquidity held by `owner` in `pool`
    pub fn position(&self, pool: PoolId, owner: &Owner) -> Amount {
        self.positions
            .get(&pool)
            .and_then(|p| p.get(owner))
            .copied()
            .unwrap_or_default()
    }

    pub fn positions(&self, pool: PoolId) -> impl Iterator<Item = (&Owner, &Amount)> {
        self.positions.get(&pool).into_iter().flat_map(|p| p.iter())
    }
}
