use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Basis-point denominator: 10,000 bps = 100%.
pub const BPS_DENOM: u128 = 10_000;

/// Errors raised when a share table does not describe a complete split.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShareTableError {
    #[error("share table sums to {total} bps, expected {expected}")]
    IncompleteSplit { total: u128, expected: u128 },
    #[error("buyer share of {buyer_bps} bps does not divide the curve supply evenly")]
    IndivisibleBuyerShare { buyer_bps: u128 },
    #[error("share computation overflowed for curve supply {curve_supply}")]
    Overflow { curve_supply: u128 },
}

/// Fixed stakeholder split of the token's final total supply, applied once
/// at campaign close.
///
/// The buyer share is never minted at close: it accumulates through
/// purchases, and the curve is calibrated to issue exactly the buyer tranche
/// when `raised` reaches the goal. The creator, platform, and liquidity
/// shares are minted at close, bringing total supply to exactly the implied
/// final total. Settlement proceeds split evenly between the creator and the
/// liquidity venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareTable {
    /// Share of final supply minted to the campaign creator at close.
    pub creator_bps: u128,
    /// Share of final supply minted to the platform at close.
    pub platform_bps: u128,
    /// Share of final supply minted to campaign custody at close, for
    /// liquidity seeding.
    pub liquidity_bps: u128,
    /// Share of final supply issued to buyers over the life of the curve.
    pub buyer_bps: u128,
}

/// Exact token amounts implied by a share table for one campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAllocations {
    /// Final total supply once the campaign closes.
    pub total: u128,
    pub creator: u128,
    pub platform: u128,
    pub liquidity: u128,
    /// Equals the curve supply: what purchases mint in aggregate.
    pub buyers: u128,
}

impl Default for ShareTable {
    /// The canonical split: 50% buyers, 20% creator, 5% platform,
    /// 25% liquidity.
    fn default() -> Self {
        Self {
            creator_bps: 2_000,
            platform_bps: 500,
            liquidity_bps: 2_500,
            buyer_bps: 5_000,
        }
    }
}

impl ShareTable {
    /// Check that the four shares account for the entire final supply.
    pub fn validate(&self) -> Result<(), ShareTableError> {
        let total = self.creator_bps + self.platform_bps + self.liquidity_bps + self.buyer_bps;
        if total != BPS_DENOM {
            return Err(ShareTableError::IncompleteSplit {
                total,
                expected: BPS_DENOM,
            });
        }
        Ok(())
    }

    /// Resolve exact per-stakeholder token amounts from the curve supply
    /// (the buyer tranche the curve issues in full when the goal is reached).
    ///
    /// Returns an error unless the implied final total splits exactly, so
    /// close-time minting can never create or destroy dust.
    pub fn allocations(&self, curve_supply: u128) -> Result<TokenAllocations, ShareTableError> {
        self.validate()?;
        if self.buyer_bps == 0 {
            return Err(ShareTableError::IndivisibleBuyerShare {
                buyer_bps: self.buyer_bps,
            });
        }

        let overflow = || ShareTableError::Overflow { curve_supply };
        // total * buyer_bps / BPS_DENOM == curve_supply, exactly.
        let scaled = curve_supply.checked_mul(BPS_DENOM).ok_or_else(overflow)?;
        if scaled % self.buyer_bps != 0 {
            return Err(ShareTableError::IndivisibleBuyerShare {
                buyer_bps: self.buyer_bps,
            });
        }
        let total = scaled / self.buyer_bps;

        let creator = checked_share(total, self.creator_bps).ok_or_else(overflow)?;
        let platform = checked_share(total, self.platform_bps).ok_or_else(overflow)?;
        let liquidity = checked_share(total, self.liquidity_bps).ok_or_else(overflow)?;
        if creator + platform + liquidity + curve_supply != total {
            return Err(ShareTableError::IndivisibleBuyerShare {
                buyer_bps: self.buyer_bps,
            });
        }

        Ok(TokenAllocations {
            total,
            creator,
            platform,
            liquidity,
            buyers: curve_supply,
        })
    }

    /// Settlement proceeds split: half of the goal to the creator, the
    /// remainder to the liquidity venue.
    pub fn settlement_split(&self, goal: u128) -> (u128, u128) {
        let creator = goal / 2;
        (creator, goal - creator)
    }
}

/// Basis-point share of an amount, rounded down.
pub fn share_of(amount: u128, bps: u128) -> u128 {
    amount * bps / BPS_DENOM
}

fn checked_share(amount: u128, bps: u128) -> Option<u128> {
    amount.checked_mul(bps).map(|scaled| scaled / BPS_DENOM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{DEFAULT_MAX_SUPPLY, WAD};

    #[test]
    fn default_allocations_double_the_curve_supply() {
        let table = ShareTable::default();
        let alloc = table.allocations(DEFAULT_MAX_SUPPLY).unwrap();

        assert_eq!(alloc.total, 2 * DEFAULT_MAX_SUPPLY);
        assert_eq!(alloc.buyers, DEFAULT_MAX_SUPPLY);
        assert_eq!(alloc.creator, 200_000_000 * WAD);
        assert_eq!(alloc.platform, 50_000_000 * WAD);
        assert_eq!(alloc.liquidity, 250_000_000 * WAD);
        assert_eq!(
            alloc.creator + alloc.platform + alloc.liquidity + alloc.buyers,
            alloc.total
        );
    }

    #[test]
    fn invalid_table_rejected() {
        let table = ShareTable {
            creator_bps: 2_000,
            platform_bps: 500,
            liquidity_bps: 2_500,
            buyer_bps: 4_000,
        };
        assert!(matches!(
            table.validate(),
            Err(ShareTableError::IncompleteSplit { total: 9_000, .. })
        ));
        assert!(table.allocations(DEFAULT_MAX_SUPPLY).is_err());
    }

    #[test]
    fn settlement_split_is_half_and_half() {
        let table = ShareTable::default();
        let (creator, venue) = table.settlement_split(100_000 * WAD);
        assert_eq!(creator, 50_000 * WAD);
        assert_eq!(venue, 50_000 * WAD);
    }

    #[test]
    fn settlement_split_conserves_odd_goal() {
        let table = ShareTable::default();
        let (creator, venue) = table.settlement_split(100_001);
        assert_eq!(creator + venue, 100_001);
    }

    #[test]
    fn share_of_rounds_down() {
        assert_eq!(share_of(10_001, 5_000), 5_000);
    }
}
