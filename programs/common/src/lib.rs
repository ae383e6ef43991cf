//! Shared primitives for the vaultline ledger core
//!
//! Everything the oracle, vault and AMM modules agree on lives here:
//! the fixed-point [`Amount`], the [`LedgerError`] taxonomy, entity
//! identifiers, and the [`PriceSource`] seam through which vaults read
//! oracle prices.

pub mod amount;
pub mod error;
pub mod math;
pub mod price;
pub mod types;

pub use amount::*;
pub use error::*;
pub use price::*;
pub use types::*;
