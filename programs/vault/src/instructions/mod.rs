//! Vault instruction handlers
//!
//! Handlers mutate only the vault table. Balance movements between owner
//! accounts and vaults are applied by the caller from the handler's result.

pub mod close_vault;
pub mod create_vault;
pub mod deposit_collateral;
pub mod loan_scheme;
pub mod payback_loan;
pub mod take_loan;
pub mod update_vault;
pub mod withdraw_collateral;
