use thiserror::Error;

use crate::math::{isqrt, mul_div};

/// Fixed-point scale of the square-rooted funding ratio (10^18).
pub const RATIO_ONE: u128 = 1_000_000_000_000_000_000;

/// Pre-sqrt scale: the funding ratio is expanded to 10^36 so its integer
/// square root lands back on the `RATIO_ONE` scale.
const RATIO_SQUARED: u128 = RATIO_ONE * RATIO_ONE;

/// Errors from curve evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("funding goal must be positive")]
    InvalidGoal,

    #[error("curve supply must be positive")]
    InvalidSupply,

    #[error("raised amount {raised} exceeds goal {goal}")]
    RaisedExceedsGoal { raised: u128, goal: u128 },

    #[error("fixed-point overflow while evaluating the curve")]
    Overflow,
}

/// Pricing seam between a campaign and its active issuance schedule.
///
/// A campaign holds its curve behind this trait so the schedule can be
/// swapped by an authorized administrator without touching campaign state.
/// Implementations must be pure: same inputs, same output, no side effects.
pub trait IssuanceCurve: Send + Sync {
    /// Cumulative tokens issued once `raised` settlement units are in, for
    /// a curve calibrated to issue exactly `supply` when `raised == goal`.
    ///
    /// Must be monotone non-decreasing in `raised` and never exceed
    /// `supply`.
    fn issued_for_raised(&self, raised: u128, goal: u128, supply: u128)
        -> Result<u128, CurveError>;

    /// Stable label for the schedule, used in logs and receipts.
    fn version(&self) -> &'static str;
}

/// The canonical square-root issuance schedule:
/// `issued = supply * sqrt(raised / goal)`.
///
/// A square-root cumulative schedule is equivalent to a linearly increasing
/// marginal price: the cost of the next token grows in proportion to tokens
/// already issued, so cumulative cost grows quadratically in the issuance
/// fraction and earlier buyers always receive more tokens per settlement
/// unit than later ones.
///
/// Evaluation is integer-only. The funding ratio is scaled to 10^36 before
/// the integer square root (headroom fits the 256-bit intermediate of
/// [`mul_div`]), rooted down to the 10^18 scale, then rescaled to the
/// token's base units. All rounding is floor, so results never overshoot
/// `supply` and `raised == goal` lands on `supply` exactly; the final clamp
/// guards the boundary regardless.
#[derive(Clone, Copy, Debug, Default)]
pub struct SqrtCurve;

impl IssuanceCurve for SqrtCurve {
    fn issued_for_raised(
        &self,
        raised: u128,
        goal: u128,
        supply: u128,
    ) -> Result<u128, CurveError> {
        if goal == 0 {
            return Err(CurveError::InvalidGoal);
        }
        if supply == 0 {
            return Err(CurveError::InvalidSupply);
        }
        if raised > goal {
            return Err(CurveError::RaisedExceedsGoal { raised, goal });
        }

        // ratio <= 10^36 since raised <= goal.
        let ratio = mul_div(raised, RATIO_SQUARED, goal).ok_or(CurveError::Overflow)?;
        // root <= 10^18.
        let root = isqrt(ratio);
        let issued = mul_div(supply, root, RATIO_ONE).ok_or(CurveError::Overflow)?;

        Ok(issued.min(supply))
    }

    fn version(&self) -> &'static str {
        "sqrt-v1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairlaunch_types::{DEFAULT_MAX_SUPPLY, WAD};
    use proptest::prelude::*;

    const GOAL: u128 = 100_000 * WAD;

    fn issued(raised: u128) -> u128 {
        SqrtCurve
            .issued_for_raised(raised, GOAL, DEFAULT_MAX_SUPPLY)
            .unwrap()
    }

    #[test]
    fn zero_raised_issues_nothing() {
        assert_eq!(issued(0), 0);
    }

    #[test]
    fn completion_is_exact() {
        assert_eq!(issued(GOAL), DEFAULT_MAX_SUPPLY);
    }

    #[test]
    fn near_completion_stays_below_supply() {
        assert!(issued(GOAL - 1) < DEFAULT_MAX_SUPPLY);
    }

    #[test]
    fn sixty_percent_raised_matches_sqrt_schedule() {
        // sqrt(0.6) = 0.7745966692...; 500M * sqrt(0.6) ~= 387,298,334.62
        let at_60k = issued(60_000 * WAD);
        assert!(at_60k > 387_298_334 * WAD);
        assert!(at_60k < 387_298_335 * WAD);
    }

    #[test]
    fn quarter_goal_issues_half_supply() {
        // sqrt(1/4) = 1/2 exactly.
        assert_eq!(issued(GOAL / 4), DEFAULT_MAX_SUPPLY / 2);
    }

    #[test]
    fn zero_goal_rejected() {
        assert_eq!(
            SqrtCurve.issued_for_raised(0, 0, DEFAULT_MAX_SUPPLY),
            Err(CurveError::InvalidGoal)
        );
    }

    #[test]
    fn zero_supply_rejected() {
        assert_eq!(
            SqrtCurve.issued_for_raised(0, GOAL, 0),
            Err(CurveError::InvalidSupply)
        );
    }

    #[test]
    fn raised_above_goal_rejected() {
        assert!(matches!(
            SqrtCurve.issued_for_raised(GOAL + 1, GOAL, DEFAULT_MAX_SUPPLY),
            Err(CurveError::RaisedExceedsGoal { .. })
        ));
    }

    proptest! {
        /// Issuance is monotone non-decreasing in the raised amount.
        #[test]
        fn monotone_in_raised(
            goal in 1u128..=10u128.pow(30),
            num1 in 0u64..=1_000_000,
            num2 in 0u64..=1_000_000,
        ) {
            let (lo, hi) = if num1 <= num2 { (num1, num2) } else { (num2, num1) };
            let r1 = mul_div(goal, lo as u128, 1_000_000).unwrap();
            let r2 = mul_div(goal, hi as u128, 1_000_000).unwrap();

            let s1 = SqrtCurve.issued_for_raised(r1, goal, DEFAULT_MAX_SUPPLY).unwrap();
            let s2 = SqrtCurve.issued_for_raised(r2, goal, DEFAULT_MAX_SUPPLY).unwrap();
            prop_assert!(s1 <= s2);
        }

        /// Output never exceeds the curve supply, and hits it exactly at the
        /// goal.
        #[test]
        fn bounded_and_complete(
            goal in 1u128..=10u128.pow(30),
            supply in 1u128..=10u128.pow(30),
            num in 0u64..=1_000_000,
        ) {
            let raised = mul_div(goal, num as u128, 1_000_000).unwrap();
            let s = SqrtCurve.issued_for_raised(raised, goal, supply).unwrap();
            prop_assert!(s <= supply);

            let at_goal = SqrtCurve.issued_for_raised(goal, goal, supply).unwrap();
            prop_assert_eq!(at_goal, supply);
        }

        /// Two equal-sized purchases: the earlier one always yields strictly
        /// more tokens.
        #[test]
        fn early_buyer_advantage(
            // Whole-unit amounts keep deltas far above integer rounding.
            goal_units in 2u64..=1_000_000_000,
            fraction in 1u64..=500_000,
        ) {
            let goal = goal_units as u128 * WAD;
            // 2a <= goal by construction of the fraction range.
            let a = mul_div(goal, fraction as u128, 1_000_000).unwrap();
            prop_assume!(a > 0);

            let first = SqrtCurve.issued_for_raised(a, goal, DEFAULT_MAX_SUPPLY).unwrap();
            let second = SqrtCurve.issued_for_raised(2 * a, goal, DEFAULT_MAX_SUPPLY).unwrap()
                - first;
            prop_assert!(first > second);
        }
    }
}
