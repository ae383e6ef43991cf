//! Vault health assessment against live prices

use crate::market::{Market, PriceMode};
use crate::state::Vault;
use crate::valuation::{value_vault, Valuation};
use vaultline_common::{LedgerError, LedgerResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Health {
    /// No loans, or ratio at or above the scheme minimum
    Healthy(Valuation),
    /// Ratio below the scheme minimum
    Undercollateralized(Valuation),
    /// Some feed the vault depends on is not live
    Unpriced,
}

/// Classify a vault; liquidated vaults are reported healthy with zero balances
pub fn assess(vault: &Vault, market: &Market) -> LedgerResult<Health> {
    if !vault.has_loans() {
        return Ok(Health::Healthy(Valuation::default()));
    }
    let min_ratio = market.schemes.get(&vault.scheme)?.min_ratio;
    let valuation = match value_vault(vault, market, PriceMode::Live) {
        Ok(valuation) => valuation,
        Err(LedgerError::PriceUnavailable) => return Ok(Health::Unpriced),
        Err(e) => return Err(e),
    };
    if valuation.meets(min_ratio)? {
        Ok(Health::Healthy(valuation))
    } else {
        Ok(Health::Undercollateralized(valuation))
    }
}
