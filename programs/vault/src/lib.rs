//! Vaultline Vault Engine
//!
//! Collateralized loans against oracle prices:
//! - Collateral and loan token registry
//! - Loan schemes (minimum ratio + base rate), with scheduled changes
//! - Vault state machine with per-block interest accrual
//! - End-of-block liquidation into auction batches
//!
//! All handlers take the market context ([`Market`]) explicitly and return
//! `LedgerResult`; nothing here touches owner balances.

pub mod instructions;
pub mod interest;
pub mod liquidation;
pub mod market;
pub mod state;
pub mod valuation;
pub mod view;

pub use interest::per_block_interest;
pub use liquidation::{assess, Health};
pub use market::{Market, PriceMode, DEFAULT_BLOCKS_PER_YEAR};
pub use state::*;
pub use valuation::{value_vault, Valuation};
pub use view::VaultView;
