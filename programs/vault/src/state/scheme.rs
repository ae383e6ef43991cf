//! Loan scheme registry
//!
//! A loan scheme is a named risk profile: the minimum collateralization
//! ratio a vault must keep and the base annual interest rate it pays.
//! Exactly one scheme is the default once any scheme exists. Updates and
//! destructions may be scheduled for a future block height.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultline_common::{Amount, LedgerError, LedgerResult, LoanSchemeId};

/// Lowest accepted minimum collateralization ratio, in percent
pub const MIN_COLLATERAL_RATIO: u32 = 100;

/// Lowest accepted annual rate (0.01 %)
pub const MIN_SCHEME_RATE: Amount = Amount::from_raw(1_000_000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanScheme {
    pub id: LoanSchemeId,
    /// Minimum collateralization ratio in percent
    pub min_ratio: u32,
    /// Annual interest in percent
    pub rate: Amount,
}

impl LoanScheme {
    pub fn new(id: LoanSchemeId, min_ratio: u32, rate: Amount) -> LedgerResult<Self> {
        if min_ratio < MIN_COLLATERAL_RATIO {
            return Err(LedgerError::InvalidScheme(format!(
                "minimum collateral ratio cannot be less than {}",
                MIN_COLLATERAL_RATIO
            )));
        }
        if rate < MIN_SCHEME_RATE {
            return Err(LedgerError::InvalidScheme(format!(
                "interest rate cannot be less than {}",
                MIN_SCHEME_RATE
            )));
        }
        Ok(Self { id, min_ratio, rate })
    }

    /// Same economic terms, regardless of id
    pub fn same_terms(&self, other: &LoanScheme) -> bool {
        self.min_ratio == other.min_ratio && self.rate == other.rate
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeRegistry {
    pub(crate) schemes: BTreeMap<LoanSchemeId, LoanScheme>,
    pub(crate) default: Option<LoanSchemeId>,
    /// Activation height -> updates taking effect at that height
    pub(crate) pending_updates: BTreeMap<u64, BTreeMap<LoanSchemeId, LoanScheme>>,
    /// Scheme -> height at which it is destroyed
    pub(crate) pending_destroys: BTreeMap<LoanSchemeId, u64>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &LoanSchemeId) -> LedgerResult<&LoanScheme> {
        self.schemes.get(id).ok_or(LedgerError::UnknownScheme)
    }

    pub fn default_id(&self) -> Option<LoanSchemeId> {
        self.default
    }

    pub fn schemes(&self) -> impl Iterator<Item = &LoanScheme> {
        self.schemes.values()
    }

    /// Height at which `id` is scheduled for destruction
    pub fn destroy_height(&self, id: &LoanSchemeId) -> Option<u64> {
        self.pending_destroys.get(id).copied()
    }

    pub fn is_default(&self, id: &LoanSchemeId) -> bool {
        self.default.as_ref() == Some(id)
    }

    /// Scheme a vault may be attached to; `None` selects the default
    pub fn resolve_for_vault(&self, id: Option<LoanSchemeId>) -> LedgerResult<&LoanScheme> {
        let id = match id {
            Some(id) => id,
            None => self.default.ok_or(LedgerError::UnknownScheme)?,
        };
        let scheme = self.get(&id)?;
        if let Some(at) = self.destroy_height(&id) {
            return Err(LedgerError::InvalidScheme(format!(
                "cannot set {} as loan scheme, set to be destroyed on block {}",
                id, at
            )));
        }
        Ok(scheme)
    }

    /// Another scheme (or a pending update of another scheme) with the same terms
    pub(crate) fn find_same_terms(&self, candidate: &LoanScheme) -> Option<LoanSchemeId> {
        let existing = self
            .schemes
            .values()
            .find(|s| s.id != candidate.id && s.same_terms(candidate));
        let pending = || {
            self.pending_updates
                .values()
                .flat_map(|updates| updates.values())
                .find(|s| s.id != candidate.id && s.same_terms(candidate))
        };
        existing.or_else(pending).map(|s| s.id)
    }
}
