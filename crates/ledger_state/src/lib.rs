//! Ledger snapshot and block transitions
//!
//! A [`Snapshot`] owns every table of the core: price feeds, token and loan
//! scheme registries, vaults, pools, balances and account history.
//! [`apply_block`] derives the next snapshot from the previous one and a
//! block of [`Command`]s; replaying the same blocks from the same genesis
//! always yields the same [`StateDigest`].

pub mod balances;
pub mod command;
pub mod history;
pub mod params;
pub mod queries;
pub mod snapshot;
pub mod transitions;

pub use balances::Balances;
pub use command::{Command, PriceEntry};
pub use history::{AccountHistory, BalanceDiff, Category, HistoryEntry, HistoryKey};
pub use params::ChainParams;
pub use queries::LoanSchemeView;
pub use snapshot::{Snapshot, StateDigest, StateError};
pub use transitions::{apply_block, apply_tx, Block, BlockReceipt};
