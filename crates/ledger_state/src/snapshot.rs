//! Ledger snapshot - every table the core owns

use crate::balances::Balances;
use crate::history::AccountHistory;
use crate::params::ChainParams;
use core::fmt;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use thiserror::Error;
use vaultline_amm::PoolBook;
use vaultline_common::LedgerError;
use vaultline_oracle::FeedBook;
use vaultline_vault::{Market, SchemeRegistry, TokenRegistry, VaultBook};

#[derive(Error, Debug)]
pub enum StateError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Committed ledger state after some block
///
/// All tables are ordered maps, so the bincode encoding (and therefore the
/// digest) depends only on content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub height: u64,
    pub time: i64,
    pub params: ChainParams,
    pub feeds: FeedBook,
    pub tokens: TokenRegistry,
    pub schemes: SchemeRegistry,
    pub vaults: VaultBook,
    pub pools: PoolBook,
    pub balances: Balances,
    pub history: AccountHistory,
}

impl Snapshot {
    /// Empty ledger at height 0
    pub fn genesis(params: ChainParams) -> Self {
        Self { params, ..Self::default() }
    }

    /// Market context over this snapshot's oracle and registries
    pub fn market(&self) -> Market<'_> {
        Market::new(&self.feeds, &self.tokens, &self.schemes, self.params.blocks_per_year)
    }

    pub fn encode(&self) -> Result<Vec<u8>, StateError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, StateError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// SHA3-256 of the bincode encoding
    pub fn digest(&self) -> Result<StateDigest, StateError> {
        let mut hasher = Sha3_256::new();
        hasher.update(self.encode()?);
        Ok(StateDigest(hasher.finalize().into()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateDigest(pub [u8; 32]);

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}
