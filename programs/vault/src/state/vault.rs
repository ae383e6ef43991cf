//! Vault account: collateral balances and outstanding loans of one owner

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultline_common::{Amount, LedgerError, LedgerResult, LoanSchemeId, Owner, TokenId, VaultId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultState {
    /// Accepts operations; empty while it holds no collateral and no loans
    Active,
    /// Terminal, collateral seized for auction
    Liquidated,
}

/// Outstanding balance of one loan token
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub principal: Amount,
    pub interest: Amount,
}

impl Loan {
    /// Principal plus accrued interest
    pub fn total(&self) -> LedgerResult<Amount> {
        self.principal.checked_add(self.interest)
    }

    pub fn is_zero(&self) -> bool {
        self.principal.is_zero() && self.interest.is_zero()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub id: VaultId,
    pub owner: Owner,
    pub scheme: LoanSchemeId,
    pub state: VaultState,
    pub collateral: BTreeMap<TokenId, Amount>,
    pub loans: BTreeMap<TokenId, Loan>,
    /// Height up to which interest has been accrued
    pub last_interest_height: u64,
}

impl Vault {
    pub fn new(id: VaultId, owner: Owner, scheme: LoanSchemeId, height: u64) -> Self {
        Self {
            id,
            owner,
            scheme,
            state: VaultState::Active,
            collateral: BTreeMap::new(),
            loans: BTreeMap::new(),
            last_interest_height: height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.collateral.is_empty() && self.loans.is_empty()
    }

    pub fn has_loans(&self) -> bool {
        !self.loans.is_empty()
    }

    pub fn ensure_active(&self) -> LedgerResult<()> {
        match self.state {
            VaultState::Active => Ok(()),
            VaultState::Liquidated => Err(LedgerError::VaultClosed),
        }
    }

    pub fn collateral_of(&self, token: &TokenId) -> Amount {
        self.collateral.get(token).copied().unwrap_or_default()
    }

    pub fn credit_collateral(&mut self, token: TokenId, amount: Amount) -> LedgerResult<()> {
        let entry = self.collateral.entry(token).or_default();
        *entry = entry.checked_add(amount)?;
        Ok(())
    }

    pub fn debit_collateral(&mut self, token: TokenId, amount: Amount) -> LedgerResult<()> {
        let held = self.collateral_of(&token);
        if held < amount {
            return Err(LedgerError::InsufficientBalance);
        }
        let left = held.checked_sub(amount)?;
        if left.is_zero() {
            self.collateral.remove(&token);
        } else {
            self.collateral.insert(token, left);
        }
        Ok(())
    }

    pub fn add_principal(&mut self, token: TokenId, amount: Amount) -> LedgerResult<()> {
        let loan = self.loans.entry(token).or_default();
        loan.principal = loan.principal.checked_add(amount)?;
        Ok(())
    }

    /// Repay up to `amount` of a loan, interest first
    ///
    /// Returns the amount actually applied, which never exceeds what is owed.
    /// A fully repaid loan is removed.
    pub fn repay(&mut self, token: &TokenId, amount: Amount) -> LedgerResult<Amount> {
        let loan = self.loans.get_mut(token).ok_or(LedgerError::UnknownToken)?;
        let paid = amount.min(loan.total()?);

        let to_interest = paid.min(loan.interest);
        loan.interest = loan.interest.checked_sub(to_interest)?;
        loan.principal = loan.principal.checked_sub(paid.checked_sub(to_interest)?)?;

        if loan.is_zero() {
            self.loans.remove(token);
        }
        Ok(paid)
    }

    /// Zero every balance and mark the vault liquidated
    pub fn seize(&mut self) -> (BTreeMap<TokenId, Amount>, BTreeMap<TokenId, Loan>) {
        self.state = VaultState::Liquidated;
        (
            core::mem::take(&mut self.collateral),
            core::mem::take(&mut self.loans),
        )
    }
}
