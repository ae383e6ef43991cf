//! Repay a loan, interest first

use crate::market::Market;
use crate::state::VaultBook;
use vaultline_common::{Amount, LedgerResult, TokenId, VaultId};

impl VaultBook {
    /// Returns the amount applied (capped at what is owed); the caller
    /// debits exactly that much from the payer.
    pub fn process_payback_loan(
        &mut self,
        id: VaultId,
        token: TokenId,
        amount: Amount,
        market: &Market,
        height: u64,
    ) -> LedgerResult<Amount> {
        amount.require_positive()?;

        let vault = self.vault_mut(id)?;
        vault.ensure_active()?;
        vault.accrue_interest(height, market)?;
        let paid = vault.repay(&token, amount)?;

        log::debug!("PaybackLoan: {} -{} {}", id, paid, token);
        Ok(paid)
    }
}
