//! Account history: one entry per owner per committed transaction

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultline_common::{Amount, LedgerResult, Owner, TokenId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    MintToken,
    DepositToVault,
    TakeLoan,
    PaybackLoan,
    WithdrawFromVault,
    CloseVault,
    AddPoolLiquidity,
    RemovePoolLiquidity,
    PoolSwap,
}

/// Ordered by owner first, so one owner's entries are a contiguous range
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HistoryKey {
    pub owner: Owner,
    pub height: u64,
    /// Position of the transaction in its block
    pub txn: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub category: Category,
    /// Signed balance change per token
    pub diff: BTreeMap<TokenId, Amount>,
}

/// Signed balance changes collected while a transaction executes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceDiff {
    changes: BTreeMap<Owner, BTreeMap<TokenId, Amount>>,
}

impl BalanceDiff {
    pub fn add(&mut self, owner: &Owner, token: TokenId, delta: Amount) -> LedgerResult<()> {
        let entry = self
            .changes
            .entry(owner.clone())
            .or_default()
            .entry(token)
            .or_default();
        *entry = entry.checked_add(delta)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountHistory {
    entries: BTreeMap<HistoryKey, HistoryEntry>,
}

impl AccountHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one entry per owner whose balances moved; net-zero tokens are dropped
    pub fn record(&mut self, height: u64, txn: u32, category: Category, diff: BalanceDiff) {
        for (owner, tokens) in diff.changes {
            let tokens: BTreeMap<TokenId, Amount> =
                tokens.into_iter().filter(|(_, delta)| !delta.is_zero()).collect();
            if tokens.is_empty() {
                continue;
            }
            self.entries.insert(
                HistoryKey { owner, height, txn },
                HistoryEntry { category, diff: tokens },
            );
        }
    }

    /// Entries of `owner`, newest first
    pub fn for_owner<'a>(
        &'a self,
        owner: &Owner,
    ) -> impl DoubleEndedIterator<Item = (&'a HistoryKey, &'a HistoryEntry)> + 'a {
        let first = HistoryKey { owner: owner.clone(), height: 0, txn: 0 };
        let last = HistoryKey { owner: owner.clone(), height: u64::MAX, txn: u32::MAX };
        self.entries.range(first..=last).rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
