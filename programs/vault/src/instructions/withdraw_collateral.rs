//! Withdraw collateral from a vault

use crate::market::{Market, PriceMode};
use crate::state::VaultBook;
use crate::valuation::value_vault;
use vaultline_common::{Amount, LedgerError, LedgerResult, TokenId, VaultId};

impl VaultBook {
    /// Remove `amount` of collateral; the caller credits the vault owner
    pub fn process_withdraw_collateral(
        &mut self,
        id: VaultId,
        token: TokenId,
        amount: Amount,
        market: &Market,
        height: u64,
    ) -> LedgerResult<()> {
        amount.require_positive()?;

        let vault = self.vault_mut(id)?;
        vault.ensure_active()?;
        vault.accrue_interest(height, market)?;
        let mut trial = vault.clone();
        trial.debit_collateral(token, amount)?;

        if trial.has_loans() {
            let min_ratio = market.schemes.get(&trial.scheme)?.min_ratio;
            let valuation = value_vault(&trial, market, PriceMode::Live)?;
            if !valuation.meets(min_ratio)? {
                return Err(LedgerError::InsufficientCollateral);
            }
        }
        *vault = trial;

        log::debug!("WithdrawCollateral: {} -{} {}", id, amount, token);
        Ok(())
    }
}
