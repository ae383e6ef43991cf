//! Close an empty-of-loans vault and release its collateral

use crate::market::Market;
use crate::state::{Vault, VaultBook};
use vaultline_common::{LedgerError, LedgerResult, VaultId};

impl VaultBook {
    /// Remove the vault; the returned vault carries the collateral the
    /// caller credits back to its owner
    pub fn process_close_vault(&mut self, id: VaultId, market: &Market, height: u64) -> LedgerResult<Vault> {
        let vault = self.vault_mut(id)?;
        vault.ensure_active()?;
        vault.accrue_interest(height, market)?;
        if vault.has_loans() {
            return Err(LedgerError::LoansOutstanding);
        }

        let vault = self.vaults.remove(&id).ok_or(LedgerError::UnknownVault)?;
        log::debug!("CloseVault: {} released {} collateral tokens", id, vault.collateral.len());
        Ok(vault)
    }
}
