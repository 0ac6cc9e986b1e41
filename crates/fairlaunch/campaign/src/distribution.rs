//! One-shot stakeholder distribution, run when the curve supply is fully
//! issued.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use fairlaunch_types::{
    AccountId, CampaignId, FinalizeReceipt, LiquidityBounds, ShareTable, TokenAllocations,
};

use crate::error::CampaignError;
use crate::traits::{AddLiquidityRequest, LiquidityVenue, SettlementLedger, TokenLedger};

/// Everything the distribution step needs from the enclosing campaign.
pub(crate) struct DistributionContext<'a> {
    pub campaign: CampaignId,
    pub creator: &'a AccountId,
    pub platform: &'a AccountId,
    pub custody: &'a AccountId,
    pub goal: u128,
    pub curve_supply: u128,
    pub total_raised: u128,
    pub token: &'a dyn TokenLedger,
    pub settlement: &'a dyn SettlementLedger,
    pub venue: &'a dyn LiquidityVenue,
}

/// Fixed percentage split applied exactly once per campaign.
///
/// The policy is pure configuration; the `finalized` transition in the
/// campaign guards it from running twice. Any collaborator rejection
/// mid-distribution compensates the steps already taken, in reverse order,
/// so no partial distribution persists.
#[derive(Clone, Copy, Debug)]
pub struct DistributionPolicy {
    shares: ShareTable,
    bounds: LiquidityBounds,
}

impl DistributionPolicy {
    pub fn new(shares: ShareTable, bounds: LiquidityBounds) -> Self {
        Self { shares, bounds }
    }

    pub fn shares(&self) -> &ShareTable {
        &self.shares
    }

    /// Minimum-received guards forwarded to the venue.
    pub fn bounds(&self) -> &LiquidityBounds {
        &self.bounds
    }

    /// Token amounts this policy will mint at close for a given curve
    /// supply.
    pub fn allocations(&self, curve_supply: u128) -> Result<TokenAllocations, CampaignError> {
        Ok(self.shares.allocations(curve_supply)?)
    }

    pub(crate) fn distribute(
        &self,
        ctx: &DistributionContext<'_>,
    ) -> Result<FinalizeReceipt, CampaignError> {
        let alloc = self.allocations(ctx.curve_supply)?;
        let (creator_settlement, venue_settlement) = self.shares.settlement_split(ctx.goal);

        // Close-time mints: creator, platform, then the liquidity tranche
        // into custody for seeding.
        ctx.token
            .mint(ctx.custody, ctx.creator, alloc.creator)
            .map_err(|err| CampaignError::MintFailed {
                reason: err.to_string(),
            })?;
        if let Err(err) = ctx.token.mint(ctx.custody, ctx.platform, alloc.platform) {
            self.unwind_mints(ctx, &alloc, 1);
            return Err(CampaignError::MintFailed {
                reason: err.to_string(),
            });
        }
        if let Err(err) = ctx.token.mint(ctx.custody, ctx.custody, alloc.liquidity) {
            self.unwind_mints(ctx, &alloc, 2);
            return Err(CampaignError::MintFailed {
                reason: err.to_string(),
            });
        }

        // Creator's half of the proceeds.
        if let Err(err) = ctx
            .settlement
            .transfer(ctx.custody, ctx.creator, creator_settlement)
        {
            self.unwind_mints(ctx, &alloc, 3);
            return Err(CampaignError::SettlementTransferFailed {
                reason: err.to_string(),
            });
        }

        // Grant the venue spending rights over both legs, then seed.
        let seeding = self
            .approve_and_seed(ctx, alloc.liquidity, venue_settlement)
            .inspect_err(|_| {
                self.unwind_creator_settlement(ctx, creator_settlement);
                self.unwind_mints(ctx, &alloc, 3);
            })?;

        info!(
            campaign = %ctx.campaign,
            total_raised = ctx.total_raised,
            creator_tokens = alloc.creator,
            platform_tokens = alloc.platform,
            liquidity_tokens = alloc.liquidity,
            position = seeding.position,
            "campaign distribution completed"
        );

        Ok(FinalizeReceipt {
            campaign: ctx.campaign,
            total_raised: ctx.total_raised,
            creator_tokens: alloc.creator,
            platform_tokens: alloc.platform,
            liquidity_tokens: alloc.liquidity,
            creator_settlement,
            liquidity_settlement: venue_settlement,
            position: seeding.position,
        })
    }

    fn approve_and_seed(
        &self,
        ctx: &DistributionContext<'_>,
        liquidity_tokens: u128,
        venue_settlement: u128,
    ) -> Result<crate::traits::LiquidityReceipt, CampaignError> {
        let venue_account = ctx.venue.account();

        ctx.token
            .approve(ctx.custody, venue_account, liquidity_tokens)
            .map_err(|err| CampaignError::LiquiditySeedingFailed {
                reason: err.to_string(),
            })?;
        ctx.settlement
            .approve(ctx.custody, venue_account, venue_settlement)
            .map_err(|err| CampaignError::LiquiditySeedingFailed {
                reason: err.to_string(),
            })?;

        ctx.venue
            .add_liquidity(AddLiquidityRequest {
                token_amount: liquidity_tokens,
                asset_amount: venue_settlement,
                min_token_accepted: self.bounds.min_token_accepted,
                min_asset_accepted: self.bounds.min_asset_accepted,
                recipient: ctx.custody.clone(),
                // Short forward-looking deadline for the seeding call.
                deadline: Utc::now() + Duration::hours(1),
            })
            .map_err(|err| CampaignError::LiquiditySeedingFailed {
                reason: err.to_string(),
            })
    }

    /// Burn the first `steps` close-time mints, newest first.
    fn unwind_mints(&self, ctx: &DistributionContext<'_>, alloc: &TokenAllocations, steps: u8) {
        let mints = [
            (ctx.creator, alloc.creator),
            (ctx.platform, alloc.platform),
            (ctx.custody, alloc.liquidity),
        ];
        for (account, amount) in mints.iter().take(steps as usize).rev() {
            if let Err(err) = ctx.token.burn(ctx.custody, account, *amount) {
                warn!(
                    campaign = %ctx.campaign,
                    account = %account,
                    amount,
                    error = %err,
                    "failed to unwind close-time mint"
                );
            }
        }
    }

    fn unwind_creator_settlement(&self, ctx: &DistributionContext<'_>, amount: u128) {
        if let Err(err) = ctx.settlement.transfer(ctx.creator, ctx.custody, amount) {
            warn!(
                campaign = %ctx.campaign,
                amount,
                error = %err,
                "failed to unwind creator settlement transfer"
            );
        }
    }
}
