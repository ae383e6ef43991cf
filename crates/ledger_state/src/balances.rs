//! Token balances per owner

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultline_common::{Amount, LedgerError, LedgerResult, Owner, TokenId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    accounts: BTreeMap<Owner, BTreeMap<TokenId, Amount>>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, owner: &Owner, token: &TokenId) -> Amount {
        self.accounts
            .get(owner)
            .and_then(|tokens| tokens.get(token))
            .copied()
            .unwrap_or_default()
    }

    /// All non-zero balances of `owner`
    pub fn of(&self, owner: &Owner) -> impl Iterator<Item = (&TokenId, &Amount)> {
        self.accounts.get(owner).into_iter().flat_map(|tokens| tokens.iter())
    }

    pub fn credit(&mut self, owner: &Owner, token: TokenId, amount: Amount) -> LedgerResult<()> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount);
        }
        if amount.is_zero() {
            return Ok(());
        }
        let entry = self
            .accounts
            .entry(owner.clone())
            .or_default()
            .entry(token)
            .or_default();
        *entry = entry.checked_add(amount)?;
        Ok(())
    }

    pub fn debit(&mut self, owner: &Owner, token: TokenId, amount: Amount) -> LedgerResult<()> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount);
        }
        let held = self.get(owner, &token);
        if held < amount {
            return Err(LedgerError::InsufficientBalance);
        }
        let left = held.checked_sub(amount)?;
        if let Some(tokens) = self.accounts.get_mut(owner) {
            if left.is_zero() {
                tokens.remove(&token);
            } else {
                tokens.insert(token, left);
            }
            if tokens.is_empty() {
                self.accounts.remove(owner);
            }
        }
        Ok(())
    }

    /// Put an entry back to a previously read value
    pub(crate) fn restore(&mut self, owner: &Owner, token: TokenId, amount: Amount) {
        if amount.is_zero() {
            if let Some(tokens) = self.accounts.get_mut(owner) {
                tokens.remove(&token);
                if tokens.is_empty() {
                    self.accounts.remove(owner);
                }
            }
        } else {
            self.accounts.entry(owner.clone()).or_default().insert(token, amount);
        }
    }
}
