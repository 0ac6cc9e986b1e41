use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque account identity used across the token ledger, settlement ledger,
/// and liquidity venue boundaries.
///
/// The campaign engine never interprets the contents; collaborators key
/// balances, allowances, and minting capabilities on it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier for a fundraising campaign instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(Uuid);

impl CampaignId {
    /// Generate a fresh campaign id.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_display_roundtrip() {
        let id = AccountId::new("creator-7");
        assert_eq!(id.to_string(), "creator-7");
        assert_eq!(id.as_str(), "creator-7");
    }

    #[test]
    fn campaign_ids_are_unique() {
        assert_ne!(CampaignId::new(), CampaignId::new());
    }

    #[test]
    fn account_id_serde_roundtrip() {
        let id = AccountId::new("platform");
        let json = serde_json::to_string(&id).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
