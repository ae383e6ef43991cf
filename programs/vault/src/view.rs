//! Read model of a vault for queries

use crate::market::{Market, PriceMode};
use crate::state::{Loan, VaultBook, VaultState};
use crate::valuation::value_vault;
use serde::Serialize;
use std::collections::BTreeMap;
use vaultline_common::{Amount, LedgerResult, LoanSchemeId, Owner, TokenId, VaultId};

/// Vault as reported to queries
///
/// Interest is reported as of the last accrual. Values use the last
/// activated prices and are `None` when a needed feed never had one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VaultView {
    pub id: VaultId,
    pub owner: Owner,
    pub scheme: LoanSchemeId,
    pub state: VaultState,
    pub collateral: BTreeMap<TokenId, Amount>,
    pub loans: BTreeMap<TokenId, Loan>,
    pub collateral_value: Option<Amount>,
    pub loan_value: Option<Amount>,
    /// Collateralization ratio in percent
    pub ratio: Option<Amount>,
    pub last_interest_height: u64,
}

impl VaultBook {
    pub fn view(&self, id: VaultId, market: &Market) -> LedgerResult<VaultView> {
        let vault = self.vault(id)?;
        let valuation = value_vault(vault, market, PriceMode::Active).ok();
        Ok(VaultView {
            id: vault.id,
            owner: vault.owner.clone(),
            scheme: vault.scheme,
            state: vault.state,
            collateral: vault.collateral.clone(),
            loans: vault.loans.clone(),
            collateral_value: valuation.map(|v| v.collateral_value),
            loan_value: valuation.map(|v| v.loan_value),
            ratio: valuation.and_then(|v| match v.ratio() {
                Ok(ratio) => ratio,
                Err(e) => {
                    log::warn!("View: ratio of {} not representable: {}", vault.id, e);
                    None
                }
            }),
            last_interest_height: vault.last_interest_height,
        })
    }
}
