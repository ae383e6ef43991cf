//! Node configuration

use anyhow::{Context, Result};
use ledger_state::ChainParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// JSON array of blocks to replay
    pub blocks_path: String,

    /// Where the committed snapshot is persisted between runs
    pub snapshot_path: String,

    /// Number of vaults listed in the health report
    pub report_vaults: usize,

    /// Ratio margin (percentage points above the scheme minimum) that marks a vault at risk
    pub risk_buffer: u32,

    /// Genesis parameters; must match every other replaying node
    #[serde(default)]
    pub chain: ChainParams,
}

impl Config {
    /// Load configuration from the TOML file named by `VAULTLINE_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("VAULTLINE_CONFIG").unwrap_or_else(|_| "vaultline.toml".to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(expand(path))
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Configuration for a local replay in the working directory
    pub fn default_local() -> Self {
        Self {
            blocks_path: "blocks.json".to_string(),
            snapshot_path: "~/.vaultline/snapshot.bin".to_string(),
            report_vaults: 10,
            risk_buffer: 20,
            chain: ChainParams::default(),
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_local();
        let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        std::fs::write(expand(path), toml_str)
            .context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }

    pub fn blocks_path(&self) -> PathBuf {
        expand(&self.blocks_path)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        expand(&self.snapshot_path)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
