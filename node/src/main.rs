//! Vaultline Replay Node
//!
//! Replays a file of blocks through the ledger core, persists the resulting
//! snapshot and reports its digest together with the vaults closest to
//! liquidation. Two nodes that replay the same blocks from the same genesis
//! print the same digest.

mod config;
mod health;
mod store;

use anyhow::{Context, Result};
use config::Config;
use health::HealthQueue;
use ledger_state::{apply_block, Block, BlockReceipt, Snapshot};
use std::path::Path;
use store::SnapshotStore;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Vaultline replay node");

    if std::env::args().nth(1).as_deref() == Some("init") {
        let path = std::env::args().nth(2).unwrap_or_else(|| "vaultline.toml".to_string());
        return Config::write_default(&path);
    }

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({:#}), using defaults", e);
        Config::default_local()
    });

    let store = SnapshotStore::new(config.snapshot_path());
    let mut snapshot = match store.load()? {
        Some(snapshot) => {
            log::info!("Resuming from snapshot at height {}", snapshot.height);
            if snapshot.params != config.chain {
                log::warn!("Persisted chain parameters differ from config; keeping persisted ones");
            }
            snapshot
        }
        None => Snapshot::genesis(config.chain.clone()),
    };

    let blocks = load_blocks(&config.blocks_path())?;
    log::info!("Loaded {} blocks from {}", blocks.len(), config.blocks_path);

    let mut replayed = 0usize;
    for block in &blocks {
        if block.height <= snapshot.height {
            log::debug!("Skipping block {} (already applied)", block.height);
            continue;
        }
        let (next, receipt) = apply_block(&snapshot, block)
            .with_context(|| format!("Failed to apply block {}", block.height))?;
        report_receipt(&receipt);
        snapshot = next;
        replayed += 1;
    }

    store.save(&snapshot)?;

    let digest = snapshot.digest().context("Failed to hash snapshot")?;
    log::info!("Replayed {} blocks, height {}", replayed, snapshot.height);
    println!("height {} digest {}", snapshot.height, digest);

    let queue = HealthQueue::from_snapshot(&snapshot);
    if queue.is_empty() {
        log::info!("No priced vaults with loans");
        return Ok(());
    }
    let at_risk = queue.at_risk(config.risk_buffer).len();
    if at_risk > 0 {
        log::warn!("{} vaults within {} points of their minimum ratio", at_risk, config.risk_buffer);
    }
    for health in queue.riskiest(config.report_vaults) {
        println!(
            "vault {} owner {} ratio {}% (min {}%)",
            health.vault, health.owner, health.ratio, health.min_ratio
        );
    }

    Ok(())
}

/// Read a JSON array of blocks
fn load_blocks(path: &Path) -> Result<Vec<Block>> {
    let text = std::fs::read_to_string(path)
        .context(format!("Failed to read blocks from {}", path.display()))?;
    let blocks: Vec<Block> = serde_json::from_str(&text).context("Failed to parse blocks JSON")?;
    Ok(blocks)
}

fn report_receipt(receipt: &BlockReceipt) {
    for (txn, err) in &receipt.rejected {
        log::debug!("Block {}: tx {} excluded: {}", receipt.height, txn, err);
    }
    for vault in &receipt.liquidated {
        log::info!("Block {}: vault {} liquidated", receipt.height, vault);
    }
    for scheme in &receipt.destroyed_schemes {
        log::info!("Block {}: loan scheme {} destroyed", receipt.height, scheme);
    }
}
