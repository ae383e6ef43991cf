//! Entity identifiers
//!
//! Entities are addressed by opaque identifiers carried in transactions,
//! never by references, so the snapshot stays serializable and replayable.
//! Symbol-like ids are validated when they are decoded.

use crate::error::LedgerError;
use arrayvec::ArrayString;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Maximum symbol length (token symbols, currencies, loan scheme ids)
pub const MAX_SYMBOL_LEN: usize = 8;

pub type Symbol = ArrayString<MAX_SYMBOL_LEN>;

fn parse_symbol(kind: &str, s: &str) -> Result<Symbol, LedgerError> {
    if s.is_empty() || s.len() > MAX_SYMBOL_LEN {
        return Err(LedgerError::InvalidCommand(format!(
            "{} cannot be empty or more than {} chars long",
            kind, MAX_SYMBOL_LEN
        )));
    }
    if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(LedgerError::InvalidCommand(format!("{} must be alphanumeric", kind)));
    }
    Symbol::from(s).map_err(|_| LedgerError::InvalidCommand(format!("{} too long", kind)))
}

macro_rules! symbol_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Symbol);

        impl $name {
            pub fn new(s: &str) -> Result<Self, LedgerError> {
                parse_symbol($kind, s).map(Self)
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl FromStr for $name {
            type Err = LedgerError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = LedgerError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0.to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }
    };
}

symbol_id!(
    /// Token symbol, e.g. `DFI`, `GOOGL`
    TokenId,
    "token"
);
symbol_id!(
    /// Quote currency of a price feed, e.g. `USD`
    Currency,
    "currency"
);
symbol_id!(
    /// Loan scheme id, e.g. `LOAN150`
    LoanSchemeId,
    "id"
);

/// Price feed identifier: `(token, currency)`, written `TOKEN/CURRENCY`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedId {
    pub token: TokenId,
    pub currency: Currency,
}

impl FeedId {
    pub fn new(token: TokenId, currency: Currency) -> Self {
        Self { token, currency }
    }
}

impl FromStr for FeedId {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (token, currency) = s
            .split_once('/')
            .ok_or_else(|| LedgerError::InvalidCommand(format!("price feed '{}' must be TOKEN/CURRENCY", s)))?;
        Ok(Self::new(token.parse()?, currency.parse()?))
    }
}

impl TryFrom<String> for FeedId {
    type Error = LedgerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FeedId> for String {
    fn from(id: FeedId) -> String {
        id.to_string()
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token, self.currency)
    }
}

/// Account address that owns balances, vaults and liquidity positions
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Owner(String);

impl Owner {
    pub fn new(address: &str) -> Result<Self, LedgerError> {
        if address.is_empty() {
            return Err(LedgerError::InvalidCommand("owner address cannot be empty".into()));
        }
        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Owner {
    type Error = LedgerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<Owner> for String {
    fn from(owner: Owner) -> String {
        owner.0
    }
}

impl FromStr for Owner {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential vault identifier allocated by the snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultId(pub u64);

/// Sequential pool pair identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub u32);

/// Sequential oracle identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OracleId(pub u32);

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vault-{}", self.0)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool-{}", self.0)
    }
}

impl fmt::Display for OracleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oracle-{}", self.0)
    }
}
