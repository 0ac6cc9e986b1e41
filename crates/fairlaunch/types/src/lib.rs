//! Core type definitions for the Fairlaunch campaign engine.
//!
//! This crate provides:
//! - canonical identities (`AccountId`, `CampaignId`)
//! - 18-decimal fixed-point unit constants (`WAD`, `DEFAULT_MAX_SUPPLY`)
//! - the stakeholder share table applied at campaign close
//! - campaign events, receipts, and liquidity-seeding bounds

pub mod events;
pub mod ids;
pub mod shares;
pub mod units;

// Re-export primary types at crate root for ergonomic use.
pub use events::{CampaignEvent, FinalizeReceipt, LiquidityBounds, PurchaseReceipt};
pub use ids::{AccountId, CampaignId};
pub use shares::{ShareTable, ShareTableError, TokenAllocations, BPS_DENOM};
pub use units::{DEFAULT_MAX_SUPPLY, WAD};

#[cfg(test)]
mod tests {
    use super::{AccountId, CampaignId, ShareTable, DEFAULT_MAX_SUPPLY, WAD};

    #[test]
    fn default_max_supply_is_500m_wad() {
        assert_eq!(DEFAULT_MAX_SUPPLY, 500_000_000 * WAD);
    }

    #[test]
    fn identities_are_available() {
        let _ = AccountId::new("buyer-1");
        let _ = CampaignId::new();
    }

    #[test]
    fn default_share_table_is_valid() {
        assert!(ShareTable::default().validate().is_ok());
    }
}
