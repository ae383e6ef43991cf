//! Vault table of the ledger snapshot

use crate::state::{Loan, Vault};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultline_common::{Amount, LedgerError, LedgerResult, LoanSchemeId, Owner, TokenId, VaultId};

/// Collateral and debt seized from a liquidated vault, handed to auction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionBatch {
    pub vault: VaultId,
    pub owner: Owner,
    /// Height of the liquidation
    pub height: u64,
    pub collateral: BTreeMap<TokenId, Amount>,
    pub debt: BTreeMap<TokenId, Loan>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultBook {
    pub(crate) next_vault_id: u64,
    pub(crate) vaults: BTreeMap<VaultId, Vault>,
    pub(crate) auctions: BTreeMap<VaultId, AuctionBatch>,
}

impl VaultBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vault(&self, id: VaultId) -> LedgerResult<&Vault> {
        self.vaults.get(&id).ok_or(LedgerError::UnknownVault)
    }

    pub(crate) fn vault_mut(&mut self, id: VaultId) -> LedgerResult<&mut Vault> {
        self.vaults.get_mut(&id).ok_or(LedgerError::UnknownVault)
    }

    pub fn vaults(&self) -> impl Iterator<Item = &Vault> {
        self.vaults.values()
    }

    pub fn auctions(&self) -> impl Iterator<Item = &AuctionBatch> {
        self.auctions.values()
    }

    pub fn auction(&self, id: VaultId) -> Option<&AuctionBatch> {
        self.auctions.get(&id)
    }

    /// Move every vault on one of `destroyed` to `default`
    pub fn reassign_schemes(&mut self, destroyed: &[LoanSchemeId], default: LoanSchemeId) -> usize {
        let mut moved = 0;
        for vault in self.vaults.values_mut() {
            if destroyed.contains(&vault.scheme) {
                log::debug!("Vault: {} moved from {} to {}", vault.id, vault.scheme, default);
                vault.scheme = default;
                moved += 1;
            }
        }
        moved
    }

    pub(crate) fn allocate_id(&mut self) -> LedgerResult<VaultId> {
        let id = VaultId(self.next_vault_id);
        self.next_vault_id = self
            .next_vault_id
            .checked_add(1)
            .ok_or(LedgerError::AmountOutOfRange)?;
        Ok(id)
    }
}
