//! Transaction commands
//!
//! The closed set of state changes a block may carry. Commands decode from
//! JSON tagged by `"op"`; identifiers and decimal amounts are validated
//! while decoding, so a command that exists is well-formed.

use serde::{Deserialize, Serialize};
use vaultline_common::amount::decimal;
use vaultline_common::{Amount, Currency, FeedId, LoanSchemeId, OracleId, Owner, PoolId, TokenId, VaultId};

/// One `(token, currency, amount)` entry of a price submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub token: TokenId,
    pub currency: Currency,
    #[serde(with = "decimal")]
    pub amount: Amount,
}

impl PriceEntry {
    pub fn feed(&self) -> FeedId {
        FeedId::new(self.token, self.currency)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Command {
    /// Credit freshly issued tokens to an account
    MintTokens {
        to: Owner,
        token: TokenId,
        #[serde(with = "decimal")]
        amount: Amount,
    },
    AppointOracle {
        address: Owner,
        feeds: Vec<FeedId>,
        weightage: u8,
    },
    RemoveOracle {
        oracle: OracleId,
    },
    SubmitPrices {
        oracle: OracleId,
        timestamp: i64,
        prices: Vec<PriceEntry>,
    },
    RegisterCollateralToken {
        token: TokenId,
        #[serde(with = "decimal")]
        factor: Amount,
        feed: FeedId,
    },
    RegisterLoanToken {
        token: TokenId,
        feed: FeedId,
        #[serde(with = "decimal")]
        interest: Amount,
        mintable: bool,
    },
    CreateLoanScheme {
        id: LoanSchemeId,
        min_ratio: u32,
        #[serde(with = "decimal")]
        rate: Amount,
    },
    UpdateLoanScheme {
        id: LoanSchemeId,
        min_ratio: u32,
        #[serde(with = "decimal")]
        rate: Amount,
        activate_at: Option<u64>,
    },
    SetDefaultLoanScheme {
        id: LoanSchemeId,
    },
    DestroyLoanScheme {
        id: LoanSchemeId,
        at: Option<u64>,
    },
    CreateVault {
        owner: Owner,
        scheme: Option<LoanSchemeId>,
    },
    UpdateVault {
        vault: VaultId,
        owner: Option<Owner>,
        scheme: Option<LoanSchemeId>,
    },
    DepositCollateral {
        vault: VaultId,
        from: Owner,
        token: TokenId,
        #[serde(with = "decimal")]
        amount: Amount,
    },
    TakeLoan {
        vault: VaultId,
        token: TokenId,
        #[serde(with = "decimal")]
        amount: Amount,
    },
    PaybackLoan {
        vault: VaultId,
        from: Owner,
        token: TokenId,
        #[serde(with = "decimal")]
        amount: Amount,
    },
    WithdrawCollateral {
        vault: VaultId,
        token: TokenId,
        #[serde(with = "decimal")]
        amount: Amount,
    },
    CloseVault {
        vault: VaultId,
    },
    CreatePoolPair {
        token_a: TokenId,
        token_b: TokenId,
        #[serde(with = "decimal")]
        commission: Amount,
        owner: Owner,
    },
    /// Amounts are given in the pool's `(token_a, token_b)` order
    AddLiquidity {
        pool: PoolId,
        owner: Owner,
        #[serde(with = "decimal")]
        amount_a: Amount,
        #[serde(with = "decimal")]
        amount_b: Amount,
    },
    RemoveLiquidity {
        pool: PoolId,
        owner: Owner,
        #[serde(with = "decimal")]
        liquidity: Amount,
    },
    Swap {
        pool: PoolId,
        from: Owner,
        token: TokenId,
        #[serde(with = "decimal")]
        amount: Amount,
        #[serde(with = "decimal")]
        min_output: Amount,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::MintTokens { .. } => "MintTokens",
            Command::AppointOracle { .. } => "AppointOracle",
            Command::RemoveOracle { .. } => "RemoveOracle",
            Command::SubmitPrices { .. } => "SubmitPrices",
            Command::RegisterCollateralToken { .. } => "RegisterCollateralToken",
            Command::RegisterLoanToken { .. } => "RegisterLoanToken",
            Command::CreateLoanScheme { .. } => "CreateLoanScheme",
            Command::UpdateLoanScheme { .. } => "UpdateLoanScheme",
            Command::SetDefaultLoanScheme { .. } => "SetDefaultLoanScheme",
            Command::DestroyLoanScheme { .. } => "DestroyLoanScheme",
            Command::CreateVault { .. } => "CreateVault",
            Command::UpdateVault { .. } => "UpdateVault",
            Command::DepositCollateral { .. } => "DepositCollateral",
            Command::TakeLoan { .. } => "TakeLoan",
            Command::PaybackLoan { .. } => "PaybackLoan",
            Command::WithdrawCollateral { .. } => "WithdrawCollateral",
            Command::CloseVault { .. } => "CloseVault",
            Command::CreatePoolPair { .. } => "CreatePoolPair",
            Command::AddLiquidity { .. } => "AddLiquidity",
            Command::RemoveLiquidity { .. } => "RemoveLiquidity",
            Command::Swap { .. } => "Swap",
        }
    }
}
