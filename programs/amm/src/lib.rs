//! Vaultline AMM - Constant Product Pool Pairs (x·y=k)
//!
//! Two-token pools with a swap commission kept in the reserves, and the
//! liquidity ledger of each pool's providers:
//! - First deposit mints the geometric mean of the amounts
//! - Later deposits are proportional; unbalanced excess is not taken
//! - Positions always sum to the pool's total liquidity

pub mod instructions;
pub mod math;
pub mod state;

pub use instructions::SwapResult;
pub use math::{Deposit, SwapQuote};
pub use state::*;
