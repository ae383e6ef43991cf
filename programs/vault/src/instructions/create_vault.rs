//! Open a new, empty vault

use crate::state::{SchemeRegistry, Vault, VaultBook};
use vaultline_common::{LedgerResult, LoanSchemeId, Owner, VaultId};

impl VaultBook {
    /// Create a vault on `scheme`, or on the default scheme when `None`
    pub fn process_create_vault(
        &mut self,
        owner: Owner,
        scheme: Option<LoanSchemeId>,
        schemes: &SchemeRegistry,
        height: u64,
    ) -> LedgerResult<VaultId> {
        let scheme = schemes.resolve_for_vault(scheme)?.id;
        let id = self.allocate_id()?;
        log::debug!("CreateVault: {} owner={} scheme={}", id, owner, scheme);
        self.vaults.insert(id, Vault::new(id, owner, scheme, height));
        Ok(id)
    }
}
