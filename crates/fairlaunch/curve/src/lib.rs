//! Bonding-curve issuance engine for Fairlaunch campaigns.
//!
//! This crate provides:
//! - the `IssuanceCurve` trait: the versioned pricing seam a campaign holds
//!   its active curve behind
//! - `SqrtCurve`: the canonical square-root issuance schedule, evaluated in
//!   integer-only fixed point
//! - wide integer helpers (`math::mul_div`, `math::isqrt`) used to evaluate
//!   the curve without overflow at 18-decimal magnitudes
//!
//! The engine is pure: it owns no state and is safe to evaluate
//! speculatively without committing anything.

pub mod engine;
pub mod math;

pub use engine::{CurveError, IssuanceCurve, SqrtCurve, RATIO_ONE};
