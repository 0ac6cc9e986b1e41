use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, CampaignId};

/// Events recorded by a campaign as its state machine advances.
///
/// The campaign keeps these in an append-only log, queryable after close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignEvent {
    /// A purchase was committed: `accepted` settlement units pulled,
    /// `minted` tokens issued to the buyer.
    Purchase {
        buyer: AccountId,
        accepted: u128,
        minted: u128,
        at: DateTime<Utc>,
    },
    /// The campaign closed and distribution completed.
    Finalized {
        total_raised: u128,
        at: DateTime<Utc>,
    },
}

/// Returned to the caller of a successful purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub campaign: CampaignId,
    pub buyer: AccountId,
    /// Settlement units actually pulled (an overshooting offer is capped to
    /// the remaining headroom).
    pub accepted: u128,
    /// Tokens minted to the buyer for this purchase.
    pub minted: u128,
    pub raised_after: u128,
    pub issued_after: u128,
    /// True when this purchase completed the campaign and triggered
    /// distribution in the same call.
    pub finalized: bool,
}

/// Returned when a campaign closes, summarizing the one-shot distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeReceipt {
    pub campaign: CampaignId,
    pub total_raised: u128,
    pub creator_tokens: u128,
    pub platform_tokens: u128,
    pub liquidity_tokens: u128,
    pub creator_settlement: u128,
    pub liquidity_settlement: u128,
    /// Pool position issued by the liquidity venue for the seeded pair.
    pub position: u128,
}

/// Minimum-received guards forwarded to the liquidity venue at close.
///
/// Zero minimums disable the guard and leave the seeding step exposed to
/// adverse venue pricing; operators who care set explicit bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityBounds {
    pub min_token_accepted: u128,
    pub min_asset_accepted: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_event_serde_roundtrip() {
        let event = CampaignEvent::Purchase {
            buyer: AccountId::new("buyer-1"),
            accepted: 42,
            minted: 7,
            at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: CampaignEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn liquidity_bounds_default_to_zero() {
        let bounds = LiquidityBounds::default();
        assert_eq!(bounds.min_token_accepted, 0);
        assert_eq!(bounds.min_asset_accepted, 0);
    }
}
