//! Checked arithmetic helpers - widen to i128, never wrap

use crate::error::{LedgerError, LedgerResult};

/// Narrow an i128 intermediate back to the i64 storage width
pub fn narrow_i64(x: i128) -> LedgerResult<i64> {
    i64::try_from(x).map_err(|_| LedgerError::AmountOutOfRange)
}

/// Multiply i128 with overflow detection
pub fn mul_i128(a: i128, b: i128) -> LedgerResult<i128> {
    a.checked_mul(b).ok_or(LedgerError::AmountOutOfRange)
}

/// Add i128 with overflow detection
pub fn add_i128(a: i128, b: i128) -> LedgerResult<i128> {
    a.checked_add(b).ok_or(LedgerError::AmountOutOfRange)
}

/// a * b / d, truncated toward zero
pub fn mul_div(a: i128, b: i128, d: i128) -> LedgerResult<i128> {
    if d == 0 {
        return Err(LedgerError::AmountOutOfRange);
    }
    Ok(mul_i128(a, b)? / d)
}

/// a * b / d, rounded up (non-negative operands only)
pub fn mul_div_ceil(a: i128, b: i128, d: i128) -> LedgerResult<i128> {
    if d <= 0 || a < 0 || b < 0 {
        return Err(LedgerError::AmountOutOfRange);
    }
    let n = mul_i128(a, b)?;
    Ok(n / d + i128::from(n % d != 0))
}

/// Integer square root, floor(sqrt(n))
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Newton iteration from an over-estimate converges monotonically downwards
    let mut x = 1u128 << ((128 - n.leading_zeros()).div_ceil(2));
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}
