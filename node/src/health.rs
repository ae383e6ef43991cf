//! Vault health queue (min-heap by collateral ratio margin)

use ledger_state::Snapshot;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use vaultline_common::{Amount, Owner, VaultId, COIN};

/// Collateralization of one vault with loans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHealth {
    pub vault: VaultId,
    pub owner: Owner,
    /// Ratio in percent at active prices
    pub ratio: Amount,
    /// Minimum ratio of the vault's scheme
    pub min_ratio: u32,
}

impl VaultHealth {
    /// Percentage points above the scheme minimum, raw 1e8 scale
    pub fn margin(&self) -> i128 {
        self.ratio.raw() as i128 - self.min_ratio as i128 * COIN as i128
    }

    /// Within `buffer` percentage points of the minimum
    pub fn at_risk(&self, buffer: u32) -> bool {
        self.margin() < buffer as i128 * COIN as i128
    }
}

pub struct HealthQueue {
    queue: PriorityQueue<VaultId, Reverse<i128>>,
    map: BTreeMap<VaultId, VaultHealth>,
}

impl HealthQueue {
    pub fn new() -> Self {
        Self {
            queue: PriorityQueue::new(),
            map: BTreeMap::new(),
        }
    }

    /// Every vault with loans and a known ratio
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut queue = Self::new();
        for view in snapshot.list_vaults(None) {
            if view.loans.is_empty() {
                continue;
            }
            let Some(ratio) = view.ratio else {
                log::debug!("Vault {} has no price, left out of health queue", view.id);
                continue;
            };
            let Ok(scheme) = snapshot.schemes.get(&view.scheme) else {
                continue;
            };
            queue.push(VaultHealth {
                vault: view.id,
                owner: view.owner,
                ratio,
                min_ratio: scheme.min_ratio,
            });
        }
        queue
    }

    /// Push or update vault health
    pub fn push(&mut self, health: VaultHealth) {
        let vault = health.vault;
        let margin = health.margin();
        self.map.insert(vault, health);
        self.queue.push(vault, Reverse(margin));
    }

    /// Pop the vault closest to liquidation
    pub fn pop(&mut self) -> Option<VaultHealth> {
        let (vault, _priority) = self.queue.pop()?;
        self.map.remove(&vault)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Vaults within `buffer` points of their minimum, in id order
    pub fn at_risk(&self, buffer: u32) -> Vec<VaultHealth> {
        self.map.values().filter(|h| h.at_risk(buffer)).cloned().collect()
    }

    /// Up to `n` vaults, riskiest first
    pub fn riskiest(mut self, n: usize) -> Vec<VaultHealth> {
        let mut out = Vec::with_capacity(n.min(self.len()));
        while out.len() < n {
            match self.pop() {
                Some(h) => out.push(h),
                None => break,
            }
        }
        out
    }
}
