//! Change a vault's owner or loan scheme

use crate::market::Market;
use crate::state::VaultBook;
use vaultline_common::{LedgerError, LedgerResult, LoanSchemeId, Owner, VaultId};

impl VaultBook {
    /// The scheme may only change while the vault has no loans
    pub fn process_update_vault(
        &mut self,
        id: VaultId,
        owner: Option<Owner>,
        scheme: Option<LoanSchemeId>,
        market: &Market,
        height: u64,
    ) -> LedgerResult<()> {
        if owner.is_none() && scheme.is_none() {
            return Err(LedgerError::InvalidCommand("at least owner or scheme must be given".into()));
        }
        let vault = self.vault_mut(id)?;
        vault.ensure_active()?;
        vault.accrue_interest(height, market)?;

        if let Some(scheme) = scheme {
            if vault.has_loans() {
                return Err(LedgerError::LoansOutstanding);
            }
            vault.scheme = market.schemes.resolve_for_vault(Some(scheme))?.id;
        }
        if let Some(owner) = owner {
            vault.owner = owner;
        }
        log::debug!("UpdateVault: {} owner={} scheme={}", id, vault.owner, vault.scheme);
        Ok(())
    }
}
