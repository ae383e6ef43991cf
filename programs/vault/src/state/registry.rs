//! Collateral and loan token registry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultline_common::{Amount, FeedId, LedgerError, LedgerResult, TokenId};

/// Token accepted as vault collateral
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralToken {
    pub token: TokenId,
    /// Share of the USD value that counts towards the ratio, in (0, 1]
    pub factor: Amount,
    pub feed: FeedId,
}

/// Token that vaults may borrow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanToken {
    pub token: TokenId,
    pub feed: FeedId,
    /// Annual interest in percent, added to the scheme rate
    pub interest: Amount,
    pub mintable: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistry {
    collateral: BTreeMap<TokenId, CollateralToken>,
    loans: BTreeMap<TokenId, LoanToken>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or re-parameterize a collateral token
    pub fn register_collateral(&mut self, token: TokenId, factor: Amount, feed: FeedId) -> LedgerResult<()> {
        if !factor.is_positive() || factor > Amount::ONE {
            log::debug!("Registry: collateral factor {} out of (0, 1]", factor);
            return Err(LedgerError::InvalidAmount);
        }
        self.collateral.insert(token, CollateralToken { token, factor, feed });
        log::debug!("Registry: collateral {} factor={} feed={}", token, factor, feed);
        Ok(())
    }

    /// Register or re-parameterize a loan token
    pub fn register_loan(
        &mut self,
        token: TokenId,
        feed: FeedId,
        interest: Amount,
        mintable: bool,
    ) -> LedgerResult<()> {
        if interest.is_negative() {
            return Err(LedgerError::InvalidAmount);
        }
        self.loans.insert(token, LoanToken { token, feed, interest, mintable });
        log::debug!("Registry: loan token {} interest={} feed={}", token, interest, feed);
        Ok(())
    }

    pub fn collateral(&self, token: &TokenId) -> LedgerResult<&CollateralToken> {
        self.collateral.get(token).ok_or(LedgerError::UnknownToken)
    }

    pub fn loan(&self, token: &TokenId) -> LedgerResult<&LoanToken> {
        self.loans.get(token).ok_or(LedgerError::UnknownToken)
    }

    pub fn collateral_tokens(&self) -> impl Iterator<Item = &CollateralToken> {
        self.collateral.values()
    }

    pub fn loan_tokens(&self) -> impl Iterator<Item = &LoanToken> {
        self.loans.values()
    }
}
