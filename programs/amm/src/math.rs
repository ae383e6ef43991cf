//! Constant product AMM math (x·y=k)
//!
//! All reserves are raw [`Amount`] units (1e8 scale). Intermediates are
//! i128; every rounding step favours the pool.

use vaultline_common::math::{isqrt, mul_div, mul_div_ceil, narrow_i64};
use vaultline_common::{Amount, LedgerError, LedgerResult, COIN};

/// Result of a swap quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Amount paid out of the output reserve
    pub output: Amount,

    /// Input reserve after the swap (full input, commission included)
    pub new_in: Amount,

    /// Output reserve after the swap
    pub new_out: Amount,
}

/// Quote a swap of `input` into the `r_in` side
///
/// With commission on input:
/// - net = input · (1 - commission), truncated
/// - out_after = ceil(r_in · r_out / (r_in + net))
/// - output = r_out - out_after
/// - reserves become (r_in + input, out_after)
///
/// The commission stays in the input reserve, so `r_in · r_out` never
/// decreases.
pub fn quote_swap(r_in: Amount, r_out: Amount, commission: Amount, input: Amount) -> LedgerResult<SwapQuote> {
    if !r_in.is_positive() || !r_out.is_positive() {
        return Err(LedgerError::InvalidCommand("pool has no liquidity".into()));
    }
    input.require_positive()?;

    let x0 = r_in.raw() as i128;
    let y0 = r_out.raw() as i128;
    let dx = input.raw() as i128;

    let net = mul_div(dx, (COIN - commission.raw()) as i128, COIN as i128)?;
    let y1 = mul_div_ceil(x0, y0, x0 + net)?;
    let dy = y0 - y1;
    if dy <= 0 {
        return Err(LedgerError::InvalidAmount);
    }

    Ok(SwapQuote {
        output: Amount::from_raw(narrow_i64(dy)?),
        new_in: r_in.checked_add(input)?,
        new_out: Amount::from_raw(narrow_i64(y1)?),
    })
}

/// Liquidity minted by the first deposit: geometric mean of the raw amounts
pub fn initial_liquidity(a: Amount, b: Amount) -> LedgerResult<Amount> {
    let product = (a.raw() as u128)
        .checked_mul(b.raw() as u128)
        .ok_or(LedgerError::AmountOutOfRange)?;
    narrow_i64(isqrt(product) as i128).map(Amount::from_raw)
}

/// Outcome of a deposit into a funded pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    pub used_a: Amount,
    pub used_b: Amount,
    pub minted: Amount,
}

/// Proportional deposit into a pool with reserves `(r_a, r_b)` and `total` liquidity
///
/// The side with the smaller ratio to its reserve is used in full. The
/// other side is used only in proportion, rounded up; the excess stays with
/// the provider. Minted liquidity is truncated.
pub fn proportional_deposit(
    r_a: Amount,
    r_b: Amount,
    total: Amount,
    a: Amount,
    b: Amount,
) -> LedgerResult<Deposit> {
    let (ra, rb, t) = (r_a.raw() as i128, r_b.raw() as i128, total.raw() as i128);
    let (a_raw, b_raw) = (a.raw() as i128, b.raw() as i128);

    // a/ra <= b/rb  <=>  a·rb <= b·ra
    let a_limits = a_raw * rb <= b_raw * ra;
    let (used_a, used_b, minted) = if a_limits {
        (a_raw, mul_div_ceil(a_raw, rb, ra)?, mul_div(a_raw, t, ra)?)
    } else {
        (mul_div_ceil(b_raw, ra, rb)?, b_raw, mul_div(b_raw, t, rb)?)
    };

    Ok(Deposit {
        used_a: Amount::from_raw(narrow_i64(used_a)?),
        used_b: Amount::from_raw(narrow_i64(used_b)?),
        minted: Amount::from_raw(narrow_i64(minted)?),
    })
}

/// Reserve share redeemed by `liquidity` out of `total`, truncated
pub fn redeem_share(liquidity: Amount, reserve: Amount, total: Amount) -> LedgerResult<Amount> {
    let share = mul_div(liquidity.raw() as i128, reserve.raw() as i128, total.raw() as i128)?;
    narrow_i64(share).map(Amount::from_raw)
}
