//! Fixed-point unit constants.
//!
//! All token and settlement amounts in the engine are `u128` base units with
//! 18 decimals, so `1 WAD` is one whole unit.

/// One whole unit in 18-decimal fixed point (10^18 base units).
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Total tokens issuable by the bonding curve: 500,000,000 whole tokens.
///
/// The curve is calibrated so issuance reaches exactly this value when the
/// campaign's funding goal is reached.
pub const DEFAULT_MAX_SUPPLY: u128 = 500_000_000 * WAD;

/// Convert a whole-unit count into base units.
pub const fn wad(whole: u64) -> u128 {
    whole as u128 * WAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wad_scales_whole_units() {
        assert_eq!(wad(1), WAD);
        assert_eq!(wad(100_000), 100_000 * WAD);
    }
}
