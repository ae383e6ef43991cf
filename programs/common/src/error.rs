//! Ledger error taxonomy
//!
//! Every operation in the core returns `Result<_, LedgerError>`. A failing
//! transaction is excluded from its block and leaves the snapshot untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerError {
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Amount out of range")]
    AmountOutOfRange,

    #[error("Price unavailable")]
    PriceUnavailable,

    #[error("Insufficient collateral")]
    InsufficientCollateral,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Slippage exceeded")]
    SlippageExceeded,

    #[error("Vault is closed")]
    VaultClosed,

    #[error("Pool pair already exists")]
    DuplicatePair,

    #[error("Stale timestamp")]
    StaleTimestamp,

    #[error("Unknown price feed")]
    UnknownFeed,

    #[error("Unknown oracle")]
    UnknownOracle,

    #[error("Unknown token")]
    UnknownToken,

    #[error("Unknown vault")]
    UnknownVault,

    #[error("Unknown pool pair")]
    UnknownPool,

    #[error("Cannot find existing loan scheme")]
    UnknownScheme,

    #[error("Loan scheme already exists")]
    DuplicateScheme,

    #[error("Invalid loan scheme: {0}")]
    InvalidScheme(String),

    #[error("Vault has outstanding loans")]
    LoansOutstanding,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid block: {0}")]
    InvalidBlock(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
