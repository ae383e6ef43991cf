//! Deposit collateral into a vault

use crate::market::Market;
use crate::state::VaultBook;
use vaultline_common::{Amount, LedgerResult, TokenId, VaultId};

impl VaultBook {
    /// Credit `amount` of a registered collateral token to the vault
    ///
    /// The caller debits the depositor's balance.
    pub fn process_deposit_collateral(
        &mut self,
        id: VaultId,
        token: TokenId,
        amount: Amount,
        market: &Market,
        height: u64,
    ) -> LedgerResult<()> {
        amount.require_positive()?;
        market.tokens.collateral(&token)?;

        let vault = self.vault_mut(id)?;
        vault.ensure_active()?;
        vault.accrue_interest(height, market)?;
        vault.credit_collateral(token, amount)?;

        log::debug!("DepositCollateral: {} +{} {}", id, amount, token);
        Ok(())
    }
}
