//! Collateral and loan valuation in the feed currency

use crate::market::{Market, PriceMode};
use crate::state::Vault;
use vaultline_common::math::{mul_div, mul_i128, narrow_i64};
use vaultline_common::{Amount, LedgerResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Valuation {
    /// Sum of collateral * price * factor
    pub collateral_value: Amount,
    /// Sum of (principal + interest) * price
    pub loan_value: Amount,
}

impl Valuation {
    /// Collateralization ratio in percent; `Ok(None)` without loans
    ///
    /// A ratio too large for an amount fails with `AmountOutOfRange`.
    pub fn ratio(&self) -> LedgerResult<Option<Amount>> {
        if !self.loan_value.is_positive() {
            return Ok(None);
        }
        let raw = mul_div(
            self.collateral_value.raw() as i128,
            100 * vaultline_common::COIN as i128,
            self.loan_value.raw() as i128,
        )?;
        narrow_i64(raw).map(|raw| Some(Amount::from_raw(raw)))
    }

    /// `collateral * 100 >= loans * min_ratio`, compared exactly
    pub fn meets(&self, min_ratio: u32) -> LedgerResult<bool> {
        let lhs = mul_i128(self.collateral_value.raw() as i128, 100)?;
        let rhs = mul_i128(self.loan_value.raw() as i128, min_ratio as i128)?;
        Ok(lhs >= rhs)
    }
}

/// Value a vault's balances, failing with `PriceUnavailable` on any unusable feed
pub fn value_vault(vault: &Vault, market: &Market, mode: PriceMode) -> LedgerResult<Valuation> {
    let mut valuation = Valuation::default();

    for (token, amount) in &vault.collateral {
        let entry = market.tokens.collateral(token)?;
        let price = market.price(&entry.feed, mode)?;
        let value = amount.checked_mul(price)?.checked_mul(entry.factor)?;
        valuation.collateral_value = valuation.collateral_value.checked_add(value)?;
    }

    for (token, loan) in &vault.loans {
        let entry = market.tokens.loan(token)?;
        let price = market.price(&entry.feed, mode)?;
        let value = loan.total()?.checked_mul(price)?;
        valuation.loan_value = valuation.loan_value.checked_add(value)?;
    }

    Ok(valuation)
}
