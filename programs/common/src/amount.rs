//! Fixed-point decimal amount (8 fractional digits)
//!
//! Every monetary value in the ledger is an [`Amount`]: a signed `i64`
//! scaled by 10^8. Multiplication and division widen to `i128` and truncate
//! toward zero; any result that does not fit back into `i64` is reported as
//! [`LedgerError::AmountOutOfRange`] instead of wrapping.

use crate::error::{LedgerError, LedgerResult};
use crate::math::{mul_div, narrow_i64};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Number of fractional decimal digits
pub const DECIMALS: u32 = 8;

/// Raw units per whole token (10^8)
pub const COIN: i64 = 100_000_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const ONE: Amount = Amount(COIN);
    pub const MAX: Amount = Amount(i64::MAX);

    /// Wrap a raw value already scaled by 10^8
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw value scaled by 10^8
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Whole units, e.g. `from_units(150)` is 150.00000000
    pub fn from_units(units: i64) -> LedgerResult<Self> {
        units
            .checked_mul(COIN)
            .map(Self)
            .ok_or(LedgerError::AmountOutOfRange)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Reject anything that is not strictly positive
    pub fn require_positive(self) -> LedgerResult<Self> {
        if self.0 <= 0 {
            return Err(LedgerError::InvalidAmount);
        }
        Ok(self)
    }

    pub fn checked_add(self, other: Amount) -> LedgerResult<Amount> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or(LedgerError::AmountOutOfRange)
    }

    pub fn checked_sub(self, other: Amount) -> LedgerResult<Amount> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or(LedgerError::AmountOutOfRange)
    }

    /// self * other, truncated toward zero at 8 decimals
    pub fn checked_mul(self, other: Amount) -> LedgerResult<Amount> {
        let product = mul_div(self.0 as i128, other.0 as i128, COIN as i128)?;
        narrow_i64(product).map(Amount)
    }

    /// self / other, truncated toward zero at 8 decimals
    pub fn checked_div(self, other: Amount) -> LedgerResult<Amount> {
        let quotient = mul_div(self.0 as i128, COIN as i128, other.0 as i128)?;
        narrow_i64(quotient).map(Amount)
    }

    /// self * n for an integer count (e.g. elapsed blocks)
    pub fn checked_mul_int(self, n: u64) -> LedgerResult<Amount> {
        let n = i64::try_from(n).map_err(|_| LedgerError::AmountOutOfRange)?;
        self.0
            .checked_mul(n)
            .map(Amount)
            .ok_or(LedgerError::AmountOutOfRange)
    }

    pub fn abs_diff(self, other: Amount) -> LedgerResult<Amount> {
        let diff = (self.0 as i128 - other.0 as i128).abs();
        narrow_i64(diff).map(Amount)
    }

    pub fn neg(self) -> LedgerResult<Amount> {
        self.0.checked_neg().map(Amount).ok_or(LedgerError::AmountOutOfRange)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // i128 so that i64::MIN has an absolute value
        let raw = self.0 as i128;
        let abs = raw.abs();
        let int = abs / COIN as i128;
        let frac = abs % COIN as i128;
        let sign = if raw < 0 { "-" } else { "" };
        if frac == 0 {
            return write!(f, "{}{}", sign, int);
        }
        let digits = format!("{:08}", frac);
        write!(f, "{}{}.{}", sign, int, digits.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    /// Parse `[-]int[.frac]` with at most 8 fractional digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };

        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(LedgerError::InvalidAmount);
        }
        if body.contains('.') && frac_part.is_empty() {
            return Err(LedgerError::InvalidAmount);
        }
        if frac_part.len() > DECIMALS as usize {
            return Err(LedgerError::InvalidAmount);
        }

        let mut raw: i128 = 0;
        for b in int_part.bytes() {
            raw = raw
                .checked_mul(10)
                .and_then(|r| r.checked_add((b - b'0') as i128))
                .ok_or(LedgerError::AmountOutOfRange)?;
            if raw > i64::MAX as i128 {
                return Err(LedgerError::AmountOutOfRange);
            }
        }
        raw *= COIN as i128;

        let mut frac: i128 = 0;
        for b in frac_part.bytes() {
            frac = frac * 10 + (b - b'0') as i128;
        }
        frac *= 10i128.pow(DECIMALS - frac_part.len() as u32);
        raw += frac;

        if negative {
            raw = -raw;
        }
        narrow_i64(raw).map(Amount)
    }
}

/// Serde adapter that encodes an [`Amount`] as its decimal string
///
/// Used on command payloads so that amounts are validated when a command is
/// decoded; storage keeps the raw integer form.
pub mod decimal {
    use super::Amount;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Amount, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Amount, D::Error> {
        let text = String::deserialize(d)?;
        text.parse::<Amount>().map_err(de::Error::custom)
    }
}
