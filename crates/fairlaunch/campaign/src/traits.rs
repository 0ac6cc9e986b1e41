use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fairlaunch_types::AccountId;

/// Errors returned by token and settlement ledger collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("account {account} holds {available}, operation needs {required}")]
    InsufficientBalance {
        account: AccountId,
        required: u128,
        available: u128,
    },

    #[error("spender {spender} has allowance {available}, operation needs {required}")]
    InsufficientAllowance {
        spender: AccountId,
        required: u128,
        available: u128,
    },

    #[error("{caller} is not an authorized minter")]
    NotAuthorizedMinter { caller: AccountId },

    #[error("ledger rejected the operation: {reason}")]
    Rejected { reason: String },
}

/// Errors returned by the liquidity venue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VenueError {
    #[error("seeding deadline {deadline} has passed")]
    DeadlineExpired { deadline: DateTime<Utc> },

    #[error("venue would accept {offered} but the configured minimum is {minimum}")]
    BelowMinimum { offered: u128, minimum: u128 },

    #[error("venue rejected the seeding: {reason}")]
    Rejected { reason: String },
}

/// Project-token ledger boundary.
///
/// Minting is capability-restricted: implementations authorize exactly one
/// minter identity, the campaign custody account, and reject every other
/// caller. `burn` is the unwind half of the same capability — the campaign
/// uses it only to reverse its own mints when an enclosing transition
/// aborts; it is never a user-facing operation.
pub trait TokenLedger: Send + Sync {
    fn mint(&self, minter: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError>;

    fn burn(&self, minter: &AccountId, from: &AccountId, amount: u128) -> Result<(), LedgerError>;

    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError>;

    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: u128)
        -> Result<(), LedgerError>;

    fn balance_of(&self, account: &AccountId) -> u128;

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128;

    fn total_supply(&self) -> u128;
}

/// Settlement-asset ledger boundary.
///
/// `transfer_from` requires the payer's prior approval of the spender. Both
/// transfer forms return typed failures the campaign treats as
/// transaction-aborting.
pub trait SettlementLedger: Send + Sync {
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError>;

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError>;

    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: u128)
        -> Result<(), LedgerError>;

    fn balance_of(&self, account: &AccountId) -> u128;

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128;
}

/// Request to seed a liquidity pool with the campaign's token/asset pair.
///
/// The venue pulls both legs from `recipient`'s accounts (the campaign
/// custody), which must have approved the venue beforehand; `recipient`
/// also receives any pool-position receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityRequest {
    pub token_amount: u128,
    pub asset_amount: u128,
    pub min_token_accepted: u128,
    pub min_asset_accepted: u128,
    pub recipient: AccountId,
    pub deadline: DateTime<Utc>,
}

/// What the venue actually did with a seeding request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityReceipt {
    pub token_used: u128,
    pub asset_used: u128,
    /// Size of the pool position credited to the request's recipient.
    pub position: u128,
}

/// Liquidity venue boundary.
pub trait LiquidityVenue: Send + Sync {
    /// Identity the venue spends with; owners grant this account spending
    /// rights before seeding.
    fn account(&self) -> &AccountId;

    fn add_liquidity(&self, request: AddLiquidityRequest) -> Result<LiquidityReceipt, VenueError>;
}
