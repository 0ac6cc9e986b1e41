//! Campaign state machine for Fairlaunch bonding-curve fundraising.
//!
//! This crate provides:
//! - [`Campaign`]: the single mutable aggregate owning `raised`/`issued`/
//!   `finalized` and orchestrating purchases and the one-shot close
//! - [`DistributionPolicy`]: the fixed stakeholder split applied exactly
//!   once when the curve supply is fully issued
//! - collaborator trait boundaries ([`TokenLedger`], [`SettlementLedger`],
//!   [`LiquidityVenue`]) the aggregate calls out to, with in-memory
//!   implementations for tests, demos, and embedding
//! - [`SharedCampaign`]: a single-writer handle for hosts that do not
//!   serialize state-mutating calls themselves
//!
//! Every `purchase`/`finalize` invocation is an atomic unit of work: internal
//! counters commit before any collaborator call, and a rejected external
//! transfer unwinds the whole transition. Callers either observe the
//! completed transition or no trace of it.

pub mod distribution;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod traits;

pub use distribution::DistributionPolicy;
pub use error::CampaignError;
pub use ledger::{Campaign, CampaignConfig, SharedCampaign};
pub use memory::{InMemoryLiquidityVenue, InMemorySettlementLedger, InMemoryTokenLedger};
pub use traits::{
    AddLiquidityRequest, LedgerError, LiquidityReceipt, LiquidityVenue, SettlementLedger,
    TokenLedger, VenueError,
};
