//! Vaultline Integration Tests
//!
//! Scenario tests drive the ledger through `apply_block` only, one block per
//! height with block time `10 · height`. [`Chain`] keeps the committed
//! snapshot, every block applied and its receipt.

use ledger_state::{apply_block, Block, BlockReceipt, ChainParams, Command, PriceEntry, Snapshot};
use vaultline_common::{Amount, FeedId, LoanSchemeId, OracleId, Owner, TokenId, VaultId};

pub fn amt(s: &str) -> Amount {
    s.parse().unwrap()
}

pub fn owner(s: &str) -> Owner {
    Owner::new(s).unwrap()
}

pub fn token(s: &str) -> TokenId {
    s.parse().unwrap()
}

pub fn feed(s: &str) -> FeedId {
    s.parse().unwrap()
}

pub fn scheme(s: &str) -> LoanSchemeId {
    s.parse().unwrap()
}

pub fn time_at(height: u64) -> i64 {
    height as i64 * 10
}

pub fn mint(to: &str, tok: &str, amount: &str) -> Command {
    Command::MintTokens { to: owner(to), token: token(tok), amount: amt(amount) }
}

/// Price submission from `oracle` at `timestamp`; entries are `("TOKEN/CUR", "price")`
pub fn submit(oracle: u32, timestamp: i64, prices: &[(&str, &str)]) -> Command {
    Command::SubmitPrices {
        oracle: OracleId(oracle),
        timestamp,
        prices: prices
            .iter()
            .map(|(f, p)| {
                let id = feed(f);
                PriceEntry { token: id.token, currency: id.currency, amount: amt(p) }
            })
            .collect(),
    }
}

/// Oracle 0 for DFI/USD and GOOGL/USD, DFI as collateral, GOOGL as a 1%
/// mintable loan token, scheme LOAN150 (150%, 5%), and vault 0 for alice
/// holding 1 DFI of the 10 minted to her
pub fn bootstrap_loans() -> Vec<Command> {
    vec![
        mint("alice", "DFI", "10"),
        Command::AppointOracle {
            address: owner("oracle"),
            feeds: vec![feed("DFI/USD"), feed("GOOGL/USD")],
            weightage: 1,
        },
        Command::RegisterCollateralToken { token: token("DFI"), factor: amt("1"), feed: feed("DFI/USD") },
        Command::RegisterLoanToken {
            token: token("GOOGL"),
            feed: feed("GOOGL/USD"),
            interest: amt("1"),
            mintable: true,
        },
        Command::CreateLoanScheme { id: scheme("LOAN150"), min_ratio: 150, rate: amt("5") },
        Command::CreateVault { owner: owner("alice"), scheme: None },
        Command::DepositCollateral { vault: VaultId(0), from: owner("alice"), token: token("DFI"), amount: amt("1") },
    ]
}

pub struct Chain {
    pub snapshot: Snapshot,
    pub blocks: Vec<Block>,
    pub receipts: Vec<BlockReceipt>,
}

impl Chain {
    pub fn new() -> Self {
        Self::with_params(ChainParams::default())
    }

    pub fn with_params(params: ChainParams) -> Self {
        Self { snapshot: Snapshot::genesis(params), blocks: Vec::new(), receipts: Vec::new() }
    }

    pub fn height(&self) -> u64 {
        self.snapshot.height
    }

    /// Apply `txs` as the next block and return its receipt
    pub fn block(&mut self, txs: Vec<Command>) -> BlockReceipt {
        let height = self.height() + 1;
        let block = Block { height, time: time_at(height), txs };
        let (next, receipt) = apply_block(&self.snapshot, &block).unwrap();
        self.snapshot = next;
        self.blocks.push(block);
        self.receipts.push(receipt.clone());
        receipt
    }

    /// Apply empty blocks until `height` is committed
    pub fn advance_to(&mut self, height: u64) {
        while self.height() < height {
            self.block(Vec::new());
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

/// Replay `blocks` from genesis with `params`
pub fn replay(params: ChainParams, blocks: &[Block]) -> Snapshot {
    let mut snapshot = Snapshot::genesis(params);
    for block in blocks {
        snapshot = apply_block(&snapshot, block).unwrap().0;
    }
    snapshot
}
