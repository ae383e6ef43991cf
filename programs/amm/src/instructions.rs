//! AMM instructions - create pool, add/remove liquidity, swap
//!
//! Handlers update pools and positions only; the caller moves token
//! balances according to the returned amounts.

use crate::math::{initial_liquidity, proportional_deposit, quote_swap, redeem_share, Deposit};
use crate::state::{pair_key, PoolBook, PoolPair};
use vaultline_common::{Amount, LedgerError, LedgerResult, Owner, PoolId, TokenId};

/// Tokens paid out by a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    pub output_token: TokenId,
    pub output: Amount,
}

impl PoolBook {
    /// Create an empty pool for an unordered token pair
    pub fn process_create_pool_pair(
        &mut self,
        token_a: TokenId,
        token_b: TokenId,
        commission: Amount,
        owner: Owner,
    ) -> LedgerResult<PoolId> {
        if token_a == token_b {
            return Err(LedgerError::InvalidCommand("pool tokens must differ".into()));
        }
        if commission.is_negative() || commission >= Amount::ONE {
            log::debug!("CreatePoolPair: commission {} out of [0, 1)", commission);
            return Err(LedgerError::InvalidAmount);
        }
        let key = pair_key(token_a, token_b);
        if self.pairs.contains_key(&key) {
            return Err(LedgerError::DuplicatePair);
        }

        let id = PoolId(self.next_pool_id);
        self.next_pool_id = self
            .next_pool_id
            .checked_add(1)
            .ok_or(LedgerError::AmountOutOfRange)?;
        self.pools.insert(id, PoolPair::new(id, token_a, token_b, commission, owner));
        self.pairs.insert(key, id);

        log::debug!("CreatePoolPair: {} {}-{} commission={}", id, token_a, token_b, commission);
        Ok(id)
    }

    /// Deposit both tokens (in pool order) and credit minted liquidity
    ///
    /// Returns the amounts actually taken from the provider; an unbalanced
    /// offer leaves its excess with the provider.
    pub fn process_add_liquidity(
        &mut self,
        id: PoolId,
        owner: &Owner,
        amount_a: Amount,
        amount_b: Amount,
    ) -> LedgerResult<Deposit> {
        amount_a.require_positive()?;
        amount_b.require_positive()?;
        let pool = self.pools.get_mut(&id).ok_or(LedgerError::UnknownPool)?;

        let deposit = if pool.is_empty() {
            Deposit {
                used_a: amount_a,
                used_b: amount_b,
                minted: initial_liquidity(amount_a, amount_b)?,
            }
        } else {
            proportional_deposit(pool.reserve_a, pool.reserve_b, pool.total_liquidity, amount_a, amount_b)?
        };
        if !deposit.minted.is_positive() {
            log::debug!("AddLiquidity: {} deposit too small to mint", id);
            return Err(LedgerError::InvalidAmount);
        }

        pool.reserve_a = pool.reserve_a.checked_add(deposit.used_a)?;
        pool.reserve_b = pool.reserve_b.checked_add(deposit.used_b)?;
        pool.total_liquidity = pool.total_liquidity.checked_add(deposit.minted)?;

        let position = self.positions.entry(id).or_default().entry(owner.clone()).or_default();
        *position = position.checked_add(deposit.minted)?;

        log::debug!(
            "AddLiquidity: {} owner={} used=({}, {}) minted={}",
            id,
            owner,
            deposit.used_a,
            deposit.used_b,
            deposit.minted
        );
        Ok(deposit)
    }

    /// Burn `liquidity` from the owner's position; returns `(out_a, out_b)`
    pub fn process_remove_liquidity(
        &mut self,
        id: PoolId,
        owner: &Owner,
        liquidity: Amount,
    ) -> LedgerResult<(Amount, Amount)> {
        liquidity.require_positive()?;
        let pool = self.pools.get_mut(&id).ok_or(LedgerError::UnknownPool)?;
        let positions = self.positions.get_mut(&id).ok_or(LedgerError::InsufficientBalance)?;
        let held = positions.get(owner).copied().unwrap_or_default();
        if held < liquidity {
            return Err(LedgerError::InsufficientBalance);
        }

        let out_a = redeem_share(liquidity, pool.reserve_a, pool.total_liquidity)?;
        let out_b = redeem_share(liquidity, pool.reserve_b, pool.total_liquidity)?;

        pool.reserve_a = pool.reserve_a.checked_sub(out_a)?;
        pool.reserve_b = pool.reserve_b.checked_sub(out_b)?;
        pool.total_liquidity = pool.total_liquidity.checked_sub(liquidity)?;

        let left = held.checked_sub(liquidity)?;
        if left.is_zero() {
            positions.remove(owner);
        } else {
            positions.insert(owner.clone(), left);
        }
        if positions.is_empty() {
            self.positions.remove(&id);
        }

        log::debug!("RemoveLiquidity: {} owner={} burned={} out=({}, {})", id, owner, liquidity, out_a, out_b);
        Ok((out_a, out_b))
    }

    /// Swap `input` of `input_token` for the pool's other token
    pub fn process_swap(
        &mut self,
        id: PoolId,
        input_token: TokenId,
        input: Amount,
        min_output: Amount,
    ) -> LedgerResult<SwapResult> {
        let pool = self.pools.get_mut(&id).ok_or(LedgerError::UnknownPool)?;
        let (r_in, r_out, output_token) = pool.orient(&input_token)?;
        let quote = quote_swap(r_in, r_out, pool.commission, input)?;

        if quote.output < min_output {
            log::debug!("Swap: {} output {} below minimum {}", id, quote.output, min_output);
            return Err(LedgerError::SlippageExceeded);
        }

        if input_token == pool.token_a {
            pool.reserve_a = quote.new_in;
            pool.reserve_b = quote.new_out;
        } else {
            pool.reserve_b = quote.new_in;
            pool.reserve_a = quote.new_out;
        }

        log::debug!("Swap: {} {} {} -> {} {}", id, input, input_token, quote.output, output_token);
        Ok(SwapResult { output_token, output: quote.output })
    }
}
