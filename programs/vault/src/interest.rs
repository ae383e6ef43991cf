//! Interest accrual
//!
//! Rates are annual percentages. The per-block interest of a loan is
//! `principal * (scheme rate + token rate) / (100 * blocks_per_year)`,
//! truncated at 8 decimals, so small principals accrue exactly zero.

use crate::market::Market;
use crate::state::Vault;
use vaultline_common::math::{mul_div, mul_i128, narrow_i64};
use vaultline_common::{Amount, LedgerError, LedgerResult, COIN};

/// Interest one block adds to `principal` at `annual_rate` percent
pub fn per_block_interest(principal: Amount, annual_rate: Amount, blocks_per_year: u64) -> LedgerResult<Amount> {
    if blocks_per_year == 0 {
        return Err(LedgerError::AmountOutOfRange);
    }
    let denominator = mul_i128(100 * COIN as i128, blocks_per_year as i128)?;
    let raw = mul_div(principal.raw() as i128, annual_rate.raw() as i128, denominator)?;
    narrow_i64(raw).map(Amount::from_raw)
}

impl Vault {
    /// Bring accrued interest up to `height`
    ///
    /// Idempotent at a given height; `last_interest_height` never decreases.
    /// On error no loan is touched.
    pub fn accrue_interest(&mut self, height: u64, market: &Market) -> LedgerResult<()> {
        if height <= self.last_interest_height {
            return Ok(());
        }
        let elapsed = height - self.last_interest_height;

        if !self.loans.is_empty() {
            let scheme_rate = market.schemes.get(&self.scheme)?.rate;
            let mut accrued = Vec::with_capacity(self.loans.len());
            for (token, loan) in &self.loans {
                let rate = scheme_rate.checked_add(market.tokens.loan(token)?.interest)?;
                let per_block = per_block_interest(loan.principal, rate, market.blocks_per_year)?;
                accrued.push(loan.interest.checked_add(per_block.checked_mul_int(elapsed)?)?);
            }
            for (loan, interest) in self.loans.values_mut().zip(accrued) {
                loan.interest = interest;
            }
        }

        self.last_interest_height = height;
        Ok(())
    }
}
