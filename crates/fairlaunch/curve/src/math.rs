//! Wide integer arithmetic for fixed-point curve evaluation.
//!
//! Curve inputs are `u128` base units with 18 decimals, so intermediate
//! products exceed 128 bits. Rather than pulling in a bigint crate, the two
//! operations the curve needs are implemented directly: a 128x128->256
//! widening multiply with limb arithmetic, and a floor square root via
//! Newton's method.

const LIMB_MASK: u128 = (1u128 << 64) - 1;

/// Floor of `a * b / denom`, computed over a 256-bit intermediate product.
///
/// Returns `None` when `denom` is zero or the quotient does not fit in
/// `u128`.
pub fn mul_div(a: u128, b: u128, denom: u128) -> Option<u128> {
    if denom == 0 {
        return None;
    }
    let (hi, lo) = mul_wide(a, b);
    if hi == 0 {
        return Some(lo / denom);
    }
    if hi >= denom {
        // Quotient would need more than 128 bits.
        return None;
    }
    Some(div_wide(hi, lo, denom))
}

/// Floor square root over `u128`, Newton's method.
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n / 2 + 1;
    let mut y = (x + n / x) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// 128x128 -> 256 multiply via 64-bit limbs; returns `(hi, lo)`.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    let (a1, a0) = (a >> 64, a & LIMB_MASK);
    let (b1, b0) = (b >> 64, b & LIMB_MASK);

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    let mid = (p00 >> 64) + (p01 & LIMB_MASK) + (p10 & LIMB_MASK);
    let lo = (p00 & LIMB_MASK) | (mid << 64);
    let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    (hi, lo)
}

/// Divide the 256-bit value `(hi, lo)` by `denom`.
///
/// Caller guarantees `hi < denom`, so the quotient fits in 128 bits.
/// Shift-subtract long division, one bit of `lo` per step; the remainder
/// stays below `denom` so a dropped carry bit always forces a subtraction.
fn div_wide(hi: u128, lo: u128, denom: u128) -> u128 {
    debug_assert!(hi < denom);
    let mut rem = hi;
    let mut quot = 0u128;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        if carry == 1 || rem >= denom {
            rem = rem.wrapping_sub(denom);
            quot |= 1 << i;
        }
    }
    quot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_small_values() {
        assert_eq!(mul_div(6, 7, 3), Some(14));
        assert_eq!(mul_div(10, 10, 3), Some(33));
        assert_eq!(mul_div(0, u128::MAX, 5), Some(0));
    }

    #[test]
    fn mul_div_zero_denominator() {
        assert_eq!(mul_div(1, 1, 0), None);
    }

    #[test]
    fn mul_div_wide_intermediate() {
        // 5e26 * 1e36 overflows u128 but divides back down cleanly.
        let a = 500_000_000u128 * 10u128.pow(18);
        let scale = 10u128.pow(36);
        assert_eq!(mul_div(a, scale, scale), Some(a));
        assert_eq!(mul_div(a, scale, a), Some(scale));
    }

    #[test]
    fn mul_div_identity_at_max() {
        assert_eq!(mul_div(u128::MAX, u128::MAX, u128::MAX), Some(u128::MAX));
    }

    #[test]
    fn mul_div_overflowing_quotient() {
        assert_eq!(mul_div(u128::MAX, 2, 1), None);
    }

    #[test]
    fn isqrt_exact_squares() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(10u128.pow(36)), 10u128.pow(18));
    }

    #[test]
    fn isqrt_rounds_down() {
        assert_eq!(isqrt(2), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(8), 2);
        assert_eq!(isqrt(10u128.pow(36) - 1), 10u128.pow(18) - 1);
    }

    #[test]
    fn isqrt_at_max() {
        // floor(sqrt(2^128 - 1)) == 2^64 - 1
        assert_eq!(isqrt(u128::MAX), u64::MAX as u128);
    }
}
