//! State transition functions
//!
//! `apply_block` is the only way the ledger moves forward. It never mutates
//! its input. Inside a block each transaction runs in place on the working
//! snapshot; the tables it can write are saved first and put back if it
//! fails, together with every balance it touched.
//!
//! Block order:
//! 1. Oracle interval rollover (boundary heights only)
//! 2. Scheduled loan scheme updates and destructions
//! 3. Transactions, in block order
//! 4. Interest accrual on every vault with loans, then liquidation

use crate::balances::Balances;
use crate::command::Command;
use crate::history::{BalanceDiff, Category};
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultline_amm::PoolBook;
use vaultline_common::{Amount, FeedId, LedgerError, LedgerResult, LoanSchemeId, Owner, TokenId, VaultId};
use vaultline_oracle::{FeedBook, FeedStatus};
use vaultline_vault::{Market, SchemeRegistry, TokenRegistry, VaultBook};

/// Ordered, already authenticated transactions at one height
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    /// Block time, unix seconds
    pub time: i64,
    #[serde(default)]
    pub txs: Vec<Command>,
}

/// What a block did
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BlockReceipt {
    pub height: u64,
    /// Indexes of committed transactions
    pub applied: Vec<u32>,
    /// Indexes of excluded transactions with the reason
    pub rejected: Vec<(u32, LedgerError)>,
    pub price_updates: Vec<(FeedId, FeedStatus)>,
    pub destroyed_schemes: Vec<LoanSchemeId>,
    pub liquidated: Vec<VaultId>,
}

/// Balance moves of one transaction
#[derive(Debug, Default)]
struct Journal {
    /// Net change per owner, written to history on commit
    diff: BalanceDiff,
    /// Balance before the first move, per touched entry
    prior: BTreeMap<(Owner, TokenId), Amount>,
}

impl Journal {
    fn rollback(self, balances: &mut Balances) {
        for ((owner, token), amount) in self.prior {
            balances.restore(&owner, token, amount);
        }
    }
}

/// Balance moves of one transaction, mirrored into its journal
struct Ledger<'a> {
    balances: &'a mut Balances,
    journal: &'a mut Journal,
}

impl Ledger<'_> {
    fn remember(&mut self, owner: &Owner, token: TokenId) {
        let held = self.balances.get(owner, &token);
        self.journal.prior.entry((owner.clone(), token)).or_insert(held);
    }

    fn credit(&mut self, owner: &Owner, token: TokenId, amount: Amount) -> LedgerResult<()> {
        self.remember(owner, token);
        self.balances.credit(owner, token, amount)?;
        self.journal.diff.add(owner, token, amount)
    }

    fn debit(&mut self, owner: &Owner, token: TokenId, amount: Amount) -> LedgerResult<()> {
        self.remember(owner, token);
        self.balances.debit(owner, token, amount)?;
        self.journal.diff.add(owner, token, amount.neg()?)
    }
}

/// Copies of the tables a command can write, taken before it runs
#[derive(Debug, Default)]
struct Checkpoint {
    feeds: Option<FeedBook>,
    tokens: Option<TokenRegistry>,
    schemes: Option<SchemeRegistry>,
    vaults: Option<VaultBook>,
    pools: Option<PoolBook>,
}

impl Checkpoint {
    /// Balances are journaled separately and history is only written on success
    fn capture(snap: &Snapshot, cmd: &Command) -> Self {
        let mut checkpoint = Self::default();
        match cmd {
            Command::MintTokens { .. } => {}
            Command::AppointOracle { .. } | Command::RemoveOracle { .. } | Command::SubmitPrices { .. } => {
                checkpoint.feeds = Some(snap.feeds.clone());
            }
            Command::RegisterCollateralToken { .. } | Command::RegisterLoanToken { .. } => {
                checkpoint.tokens = Some(snap.tokens.clone());
                checkpoint.feeds = Some(snap.feeds.clone());
            }
            Command::CreateLoanScheme { .. }
            | Command::UpdateLoanScheme { .. }
            | Command::SetDefaultLoanScheme { .. } => {
                checkpoint.schemes = Some(snap.schemes.clone());
            }
            Command::DestroyLoanScheme { .. } => {
                checkpoint.schemes = Some(snap.schemes.clone());
                checkpoint.vaults = Some(snap.vaults.clone());
            }
            Command::CreateVault { .. }
            | Command::UpdateVault { .. }
            | Command::DepositCollateral { .. }
            | Command::TakeLoan { .. }
            | Command::PaybackLoan { .. }
            | Command::WithdrawCollateral { .. }
            | Command::CloseVault { .. } => {
                checkpoint.vaults = Some(snap.vaults.clone());
            }
            Command::CreatePoolPair { .. }
            | Command::AddLiquidity { .. }
            | Command::RemoveLiquidity { .. }
            | Command::Swap { .. } => {
                checkpoint.pools = Some(snap.pools.clone());
            }
        }
        checkpoint
    }

    fn restore(self, snap: &mut Snapshot) {
        if let Some(feeds) = self.feeds {
            snap.feeds = feeds;
        }
        if let Some(tokens) = self.tokens {
            snap.tokens = tokens;
        }
        if let Some(schemes) = self.schemes {
            snap.schemes = schemes;
        }
        if let Some(vaults) = self.vaults {
            snap.vaults = vaults;
        }
        if let Some(pools) = self.pools {
            snap.pools = pools;
        }
    }
}

/// Disjoint borrows: read-only market, mutable vault table, mutable ledger
fn vault_parts<'a>(
    snap: &'a mut Snapshot,
    journal: &'a mut Journal,
) -> (Market<'a>, &'a mut VaultBook, Ledger<'a>) {
    let Snapshot { params, feeds, tokens, schemes, vaults, balances, .. } = snap;
    let market = Market::new(&*feeds, &*tokens, &*schemes, params.blocks_per_year);
    (market, vaults, Ledger { balances, journal })
}

/// Execute one command in place; returns the history category when balances moved
fn execute(snap: &mut Snapshot, cmd: &Command, journal: &mut Journal) -> LedgerResult<Option<Category>> {
    let height = snap.height;

    match cmd {
        Command::MintTokens { to, token, amount } => {
            amount.require_positive()?;
            Ledger { balances: &mut snap.balances, journal }.credit(to, *token, *amount)?;
            Ok(Some(Category::MintToken))
        }

        Command::AppointOracle { address, feeds, weightage } => {
            snap.feeds.process_appoint_oracle(address.clone(), feeds, *weightage)?;
            Ok(None)
        }

        Command::RemoveOracle { oracle } => {
            snap.feeds.process_remove_oracle(*oracle)?;
            Ok(None)
        }

        Command::SubmitPrices { oracle, timestamp, prices } => {
            let entries: Vec<(FeedId, Amount)> = prices.iter().map(|p| (p.feed(), p.amount)).collect();
            let params = snap.params.oracle_params();
            snap.feeds
                .process_submit_prices(*oracle, height, snap.time, *timestamp, &entries, &params)?;
            Ok(None)
        }

        Command::RegisterCollateralToken { token, factor, feed } => {
            snap.tokens.register_collateral(*token, *factor, *feed)?;
            snap.feeds.ensure_feed(*feed);
            Ok(None)
        }

        Command::RegisterLoanToken { token, feed, interest, mintable } => {
            snap.tokens.register_loan(*token, *feed, *interest, *mintable)?;
            snap.feeds.ensure_feed(*feed);
            Ok(None)
        }

        Command::CreateLoanScheme { id, min_ratio, rate } => {
            snap.schemes.process_create_loan_scheme(*id, *min_ratio, *rate)?;
            Ok(None)
        }

        Command::UpdateLoanScheme { id, min_ratio, rate, activate_at } => {
            snap.schemes
                .process_update_loan_scheme(*id, *min_ratio, *rate, *activate_at, height)?;
            Ok(None)
        }

        Command::SetDefaultLoanScheme { id } => {
            snap.schemes.process_set_default_loan_scheme(*id)?;
            Ok(None)
        }

        Command::DestroyLoanScheme { id, at } => {
            let destroyed = snap.schemes.process_destroy_loan_scheme(*id, *at, height)?;
            if destroyed {
                if let Some(default) = snap.schemes.default_id() {
                    snap.vaults.reassign_schemes(&[*id], default);
                }
            }
            Ok(None)
        }

        Command::CreateVault { owner, scheme } => {
            snap.vaults
                .process_create_vault(owner.clone(), *scheme, &snap.schemes, height)?;
            Ok(None)
        }

        Command::UpdateVault { vault, owner, scheme } => {
            let (market, vaults, _) = vault_parts(snap, journal);
            vaults.process_update_vault(*vault, owner.clone(), *scheme, &market, height)?;
            Ok(None)
        }

        Command::DepositCollateral { vault, from, token, amount } => {
            let (market, vaults, mut ledger) = vault_parts(snap, journal);
            vaults.process_deposit_collateral(*vault, *token, *amount, &market, height)?;
            ledger.debit(from, *token, *amount)?;
            Ok(Some(Category::DepositToVault))
        }

        Command::TakeLoan { vault, token, amount } => {
            let (market, vaults, mut ledger) = vault_parts(snap, journal);
            vaults.process_take_loan(*vault, *token, *amount, &market, height)?;
            let owner = vaults.vault(*vault)?.owner.clone();
            ledger.credit(&owner, *token, *amount)?;
            Ok(Some(Category::TakeLoan))
        }

        Command::PaybackLoan { vault, from, token, amount } => {
            let (market, vaults, mut ledger) = vault_parts(snap, journal);
            let paid = vaults.process_payback_loan(*vault, *token, *amount, &market, height)?;
            ledger.debit(from, *token, paid)?;
            Ok(Some(Category::PaybackLoan))
        }

        Command::WithdrawCollateral { vault, token, amount } => {
            let (market, vaults, mut ledger) = vault_parts(snap, journal);
            vaults.process_withdraw_collateral(*vault, *token, *amount, &market, height)?;
            let owner = vaults.vault(*vault)?.owner.clone();
            ledger.credit(&owner, *token, *amount)?;
            Ok(Some(Category::WithdrawFromVault))
        }

        Command::CloseVault { vault } => {
            let (market, vaults, mut ledger) = vault_parts(snap, journal);
            let closed = vaults.process_close_vault(*vault, &market, height)?;
            for (token, amount) in &closed.collateral {
                ledger.credit(&closed.owner, *token, *amount)?;
            }
            Ok(Some(Category::CloseVault))
        }

        Command::CreatePoolPair { token_a, token_b, commission, owner } => {
            snap.pools
                .process_create_pool_pair(*token_a, *token_b, *commission, owner.clone())?;
            Ok(None)
        }

        Command::AddLiquidity { pool, owner, amount_a, amount_b } => {
            let deposit = snap.pools.process_add_liquidity(*pool, owner, *amount_a, *amount_b)?;
            let (token_a, token_b) = {
                let pair = snap.pools.pool(*pool)?;
                (pair.token_a, pair.token_b)
            };
            let mut ledger = Ledger { balances: &mut snap.balances, journal };
            ledger.debit(owner, token_a, deposit.used_a)?;
            ledger.debit(owner, token_b, deposit.used_b)?;
            Ok(Some(Category::AddPoolLiquidity))
        }

        Command::RemoveLiquidity { pool, owner, liquidity } => {
            let (out_a, out_b) = snap.pools.process_remove_liquidity(*pool, owner, *liquidity)?;
            let (token_a, token_b) = {
                let pair = snap.pools.pool(*pool)?;
                (pair.token_a, pair.token_b)
            };
            let mut ledger = Ledger { balances: &mut snap.balances, journal };
            ledger.credit(owner, token_a, out_a)?;
            ledger.credit(owner, token_b, out_b)?;
            Ok(Some(Category::RemovePoolLiquidity))
        }

        Command::Swap { pool, from, token, amount, min_output } => {
            let swap = snap.pools.process_swap(*pool, *token, *amount, *min_output)?;
            let mut ledger = Ledger { balances: &mut snap.balances, journal };
            ledger.debit(from, *token, *amount)?;
            ledger.credit(from, swap.output_token, swap.output)?;
            Ok(Some(Category::PoolSwap))
        }
    }
}

/// Run one transaction on `snap` in place
///
/// Costs a copy of the tables `cmd` can write, never of the whole snapshot.
/// On failure those tables and the touched balances are put back.
fn commit_tx(snap: &mut Snapshot, cmd: &Command, txn: u32) -> LedgerResult<()> {
    let checkpoint = Checkpoint::capture(snap, cmd);
    let mut journal = Journal::default();
    match execute(snap, cmd, &mut journal) {
        Ok(category) => {
            if let Some(category) = category {
                snap.history.record(snap.height, txn, category, journal.diff);
            }
            Ok(())
        }
        Err(e) => {
            journal.rollback(&mut snap.balances);
            checkpoint.restore(snap);
            Err(e)
        }
    }
}

/// Apply one transaction to a copy of `snap`
///
/// On success the new snapshot (with its history entries) is returned;
/// `snap` itself is never touched.
pub fn apply_tx(snap: &Snapshot, cmd: &Command, txn: u32) -> LedgerResult<Snapshot> {
    let mut staged = snap.clone();
    commit_tx(&mut staged, cmd, txn)?;
    Ok(staged)
}

/// Derive the snapshot after `block` from `prev`
///
/// Rejected transactions are excluded and reported in the receipt. The
/// whole block fails with `InvalidBlock` when its height or time does not
/// increase.
pub fn apply_block(prev: &Snapshot, block: &Block) -> LedgerResult<(Snapshot, BlockReceipt)> {
    if block.height <= prev.height {
        return Err(LedgerError::InvalidBlock(format!(
            "height {} does not follow {}",
            block.height, prev.height
        )));
    }
    if block.time <= prev.time {
        return Err(LedgerError::InvalidBlock(format!(
            "time {} does not follow {}",
            block.time, prev.time
        )));
    }

    let height = block.height;
    let mut next = prev.clone();
    next.height = height;
    next.time = block.time;
    let mut receipt = BlockReceipt { height, ..BlockReceipt::default() };

    let oracle_params = next.params.oracle_params();
    receipt.price_updates = next.feeds.on_block_start(height, block.time, &oracle_params)?;
    if !receipt.price_updates.is_empty() {
        log::info!("Block {}: recomputed {} price feeds", height, receipt.price_updates.len());
    }

    receipt.destroyed_schemes = next.schemes.on_block_start(height);
    if let Some(default) = next.schemes.default_id() {
        next.vaults.reassign_schemes(&receipt.destroyed_schemes, default);
    }

    for (index, cmd) in block.txs.iter().enumerate() {
        let txn = u32::try_from(index).map_err(|_| LedgerError::InvalidBlock("too many transactions".into()))?;
        match commit_tx(&mut next, cmd, txn) {
            Ok(()) => receipt.applied.push(txn),
            Err(e) => {
                log::warn!("Block {}: tx {} ({}) rejected: {}", height, txn, cmd.name(), e);
                receipt.rejected.push((txn, e));
            }
        }
    }

    {
        let Snapshot { params, feeds, tokens, schemes, vaults, .. } = &mut next;
        let market = Market::new(&*feeds, &*tokens, &*schemes, params.blocks_per_year);
        vaults.accrue_all(&market, height);
        receipt.liquidated = vaults.run_liquidations(&market, height);
    }
    if !receipt.liquidated.is_empty() {
        log::info!("Block {}: liquidated {} vaults", height, receipt.liquidated.len());
    }

    log::debug!(
        "Block {}: applied={} rejected={}",
        height,
        receipt.applied.len(),
        receipt.rejected.len()
    );
    Ok((next, receipt))
}
