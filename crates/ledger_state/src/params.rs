//! Chain parameters fixed at genesis

use serde::{Deserialize, Serialize};
use vaultline_common::amount::decimal;
use vaultline_common::Amount;
use vaultline_oracle::OracleParams;
use vaultline_vault::DEFAULT_BLOCKS_PER_YEAR;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    /// Converts annual interest rates into per-block rates
    pub blocks_per_year: u64,
    /// Oracle prices roll over every this many blocks
    pub price_interval_blocks: u64,
    /// Maximum distance between an observation timestamp and block time
    pub price_freshness_secs: i64,
    /// Relative active/next move that marks a feed deviating
    #[serde(with = "decimal")]
    pub price_deviation: Amount,
}

impl Default for ChainParams {
    fn default() -> Self {
        let oracle = OracleParams::default();
        Self {
            blocks_per_year: DEFAULT_BLOCKS_PER_YEAR,
            price_interval_blocks: oracle.price_interval_blocks,
            price_freshness_secs: oracle.price_freshness_secs,
            price_deviation: oracle.price_deviation,
        }
    }
}

impl ChainParams {
    pub fn oracle_params(&self) -> OracleParams {
        OracleParams {
            price_interval_blocks: self.price_interval_blocks,
            price_freshness_secs: self.price_freshness_secs,
            price_deviation: self.price_deviation,
        }
    }
}
