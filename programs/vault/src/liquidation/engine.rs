//! End-of-block accrual and liquidation sweep
//!
//! The sweep runs over every vault once per block and must not fail on a
//! single vault: a vault whose interest or value cannot be computed is
//! logged and left as is for this block.

use crate::liquidation::health::{assess, Health};
use crate::market::Market;
use crate::state::{AuctionBatch, VaultBook, VaultState};
use vaultline_common::VaultId;

impl VaultBook {
    /// Accrue interest to `height` on every active vault holding loans
    pub fn accrue_all(&mut self, market: &Market, height: u64) {
        for vault in self.vaults.values_mut() {
            if vault.state != VaultState::Active || !vault.has_loans() {
                continue;
            }
            if let Err(e) = vault.accrue_interest(height, market) {
                log::warn!("Interest: {} not accrued at height {}: {}", vault.id, height, e);
            }
        }
    }

    /// Liquidate every active vault whose ratio fell below its scheme minimum
    ///
    /// Vaults with a feed that is not live are skipped for this block, as are
    /// vaults whose value does not fit an amount.
    /// Seized balances move into an [`AuctionBatch`] keyed by vault.
    pub fn run_liquidations(&mut self, market: &Market, height: u64) -> Vec<VaultId> {
        let mut liquidated = Vec::new();

        for vault in self.vaults.values_mut() {
            if vault.state != VaultState::Active {
                continue;
            }
            let health = match assess(vault, market) {
                Ok(health) => health,
                Err(e) => {
                    log::warn!("Liquidation: {} skipped at height {}: {}", vault.id, height, e);
                    continue;
                }
            };
            match health {
                Health::Healthy(_) => {}
                Health::Unpriced => {
                    log::debug!("Liquidation: {} skipped, price unavailable", vault.id);
                }
                Health::Undercollateralized(valuation) => {
                    log::info!(
                        "Liquidation: {} collateral={} loans={} at height {}",
                        vault.id,
                        valuation.collateral_value,
                        valuation.loan_value,
                        height
                    );
                    let (collateral, debt) = vault.seize();
                    self.auctions.insert(
                        vault.id,
                        AuctionBatch {
                            vault: vault.id,
                            owner: vault.owner.clone(),
                            height,
                            collateral,
                            debt,
                        },
                    );
                    liquidated.push(vault.id);
                }
            }
        }

        liquidated
    }
}
