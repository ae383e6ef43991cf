//! Mint a loan against vault collateral

use crate::market::{Market, PriceMode};
use crate::state::VaultBook;
use crate::valuation::value_vault;
use vaultline_common::{Amount, LedgerError, LedgerResult, TokenId, VaultId};

impl VaultBook {
    /// Borrow `amount` of a mintable loan token
    ///
    /// Every feed the vault depends on must be live, and the ratio after the
    /// loan must still meet the scheme minimum. The caller credits the
    /// minted tokens to the vault owner.
    pub fn process_take_loan(
        &mut self,
        id: VaultId,
        token: TokenId,
        amount: Amount,
        market: &Market,
        height: u64,
    ) -> LedgerResult<()> {
        amount.require_positive()?;
        if !market.tokens.loan(&token)?.mintable {
            return Err(LedgerError::InvalidCommand(format!("loan token {} is not mintable", token)));
        }

        let vault = self.vault_mut(id)?;
        vault.ensure_active()?;
        vault.accrue_interest(height, market)?;
        let min_ratio = market.schemes.get(&vault.scheme)?.min_ratio;

        let mut trial = vault.clone();
        trial.add_principal(token, amount)?;
        let valuation = value_vault(&trial, market, PriceMode::Live)?;
        if !valuation.meets(min_ratio)? {
            log::debug!(
                "TakeLoan: {} rejected, collateral={} loans={} min_ratio={}",
                id,
                valuation.collateral_value,
                valuation.loan_value,
                min_ratio
            );
            return Err(LedgerError::InsufficientCollateral);
        }
        *vault = trial;

        log::debug!("TakeLoan: {} +{} {}", id, amount, token);
        Ok(())
    }
}
