use thiserror::Error;

use fairlaunch_curve::CurveError;
use fairlaunch_types::{AccountId, ShareTableError};

/// Errors surfaced by campaign operations.
///
/// Every variant is returned synchronously with no state change persisted:
/// guard failures reject before mutation, and collaborator failures unwind
/// the enclosing transition before surfacing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CampaignError {
    #[error("offered contribution must be positive")]
    InvalidAmount,

    #[error("campaign is already finalized")]
    AlreadyFinalized,

    #[error("campaign has already issued its full curve supply")]
    CampaignComplete,

    #[error("campaign has not yet issued its full curve supply")]
    NotComplete,

    #[error("contribution too small to mint any tokens at current precision")]
    NoTokensToMint,

    #[error("token mint rejected: {reason}")]
    MintFailed { reason: String },

    #[error("settlement transfer failed: {reason}")]
    SettlementTransferFailed { reason: String },

    #[error("liquidity seeding failed: {reason}")]
    LiquiditySeedingFailed { reason: String },

    #[error("caller {caller} is not authorized for this operation")]
    Unauthorized { caller: AccountId },

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Shares(#[from] ShareTableError),
}
