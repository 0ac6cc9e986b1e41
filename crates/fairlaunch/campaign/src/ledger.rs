use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, info, warn};

use fairlaunch_curve::{IssuanceCurve, SqrtCurve};
use fairlaunch_types::{
    AccountId, CampaignEvent, CampaignId, FinalizeReceipt, LiquidityBounds, PurchaseReceipt,
    ShareTable, DEFAULT_MAX_SUPPLY,
};

use crate::distribution::{DistributionContext, DistributionPolicy};
use crate::error::CampaignError;
use crate::traits::{LiquidityVenue, SettlementLedger, TokenLedger};

/// Immutable campaign parameters, supplied by the factory at creation.
#[derive(Clone, Debug)]
pub struct CampaignConfig {
    pub creator: AccountId,
    /// The identity that created the campaign; also holds the curve-swap
    /// authority.
    pub platform: AccountId,
    /// The campaign's own account on the token and settlement ledgers. Must
    /// hold the token's minting capability.
    pub custody: AccountId,
    /// Settlement amount the curve is calibrated to; must be positive.
    pub goal: u128,
    /// Tokens issuable by the curve (the buyer tranche of final supply).
    pub max_supply: u128,
    pub shares: ShareTable,
    pub liquidity_bounds: LiquidityBounds,
}

impl CampaignConfig {
    pub fn new(
        creator: AccountId,
        platform: AccountId,
        custody: AccountId,
        goal: u128,
    ) -> Self {
        Self {
            creator,
            platform,
            custody,
            goal,
            max_supply: DEFAULT_MAX_SUPPLY,
            shares: ShareTable::default(),
            liquidity_bounds: LiquidityBounds::default(),
        }
    }

    pub fn with_max_supply(mut self, max_supply: u128) -> Self {
        self.max_supply = max_supply;
        self
    }

    pub fn with_liquidity_bounds(mut self, bounds: LiquidityBounds) -> Self {
        self.liquidity_bounds = bounds;
        self
    }
}

/// The campaign aggregate: one fundraising round.
///
/// `raised`, `issued`, and `finalized` advance only through [`purchase`] and
/// [`finalize`], each an atomic unit of work. Internal counters commit
/// before any collaborator call, and a rejected external transfer unwinds
/// the whole transition, so no caller ever observes a half-applied
/// purchase or a goal reached but not yet distributed.
///
/// The aggregate expects serialized access: methods take `&mut self`. Hosts
/// without their own serialization wrap it in [`SharedCampaign`].
///
/// [`purchase`]: Campaign::purchase
/// [`finalize`]: Campaign::finalize
pub struct Campaign {
    id: CampaignId,
    config: CampaignConfig,
    curve: Box<dyn IssuanceCurve>,
    policy: DistributionPolicy,
    token: Arc<dyn TokenLedger>,
    settlement: Arc<dyn SettlementLedger>,
    venue: Arc<dyn LiquidityVenue>,
    raised: u128,
    issued: u128,
    finalized: bool,
    events: Vec<CampaignEvent>,
}

impl Campaign {
    /// Create a campaign with the canonical square-root issuance schedule.
    ///
    /// Validates the goal, curve supply, and share table up front so a
    /// misconfigured campaign can never accept funds.
    pub fn new(
        config: CampaignConfig,
        token: Arc<dyn TokenLedger>,
        settlement: Arc<dyn SettlementLedger>,
        venue: Arc<dyn LiquidityVenue>,
    ) -> Result<Self, CampaignError> {
        if config.goal == 0 {
            return Err(fairlaunch_curve::CurveError::InvalidGoal.into());
        }
        if config.max_supply == 0 {
            return Err(fairlaunch_curve::CurveError::InvalidSupply.into());
        }
        // Fail on an indivisible share split now, not at close.
        config.shares.allocations(config.max_supply)?;

        let policy = DistributionPolicy::new(config.shares, config.liquidity_bounds);
        Ok(Self {
            id: CampaignId::new(),
            config,
            curve: Box::new(SqrtCurve),
            policy,
            token,
            settlement,
            venue,
            raised: 0,
            issued: 0,
            finalized: false,
            events: Vec::new(),
        })
    }

    /// Accept a contribution and issue curve tokens to `buyer`.
    ///
    /// An offer above the remaining headroom is capped to exactly the
    /// headroom; the excess is never pulled. When the purchase completes the
    /// curve supply, the campaign finalizes and distributes in the same
    /// atomic unit of work.
    pub fn purchase(
        &mut self,
        buyer: &AccountId,
        offered: u128,
    ) -> Result<PurchaseReceipt, CampaignError> {
        if self.finalized {
            return Err(CampaignError::AlreadyFinalized);
        }
        // Defensive: unreachable while auto-finalize is correct.
        if self.issued >= self.config.max_supply {
            return Err(CampaignError::CampaignComplete);
        }
        if offered == 0 {
            return Err(CampaignError::InvalidAmount);
        }

        let accepted = offered.min(self.config.goal - self.raised);
        let new_raised = self.raised + accepted;
        let new_issued = self
            .curve
            .issued_for_raised(new_raised, self.config.goal, self.config.max_supply)?
            .min(self.config.max_supply);

        // A contribution too small to move the curve pulls nothing; this
        // closes the precision-abuse hole where funds are taken for zero
        // issuance.
        let delta = new_issued.saturating_sub(self.issued);
        if delta == 0 {
            debug!(
                campaign = %self.id,
                buyer = %buyer,
                offered,
                raised = self.raised,
                "contribution rounds to zero issuance"
            );
            return Err(CampaignError::NoTokensToMint);
        }

        // Commit counters before any collaborator call: a reentrant caller
        // observes post-purchase state and cannot double-issue.
        let (prev_raised, prev_issued) = (self.raised, self.issued);
        self.raised = new_raised;
        self.issued = new_issued;

        if let Err(err) = self.token.mint(&self.config.custody, buyer, delta) {
            self.raised = prev_raised;
            self.issued = prev_issued;
            warn!(campaign = %self.id, buyer = %buyer, error = %err, "mint rejected, purchase unwound");
            return Err(CampaignError::MintFailed {
                reason: err.to_string(),
            });
        }

        if let Err(err) =
            self.settlement
                .transfer_from(&self.config.custody, buyer, &self.config.custody, accepted)
        {
            if let Err(burn_err) = self.token.burn(&self.config.custody, buyer, delta) {
                warn!(campaign = %self.id, buyer = %buyer, error = %burn_err, "failed to unwind purchase mint");
            }
            self.raised = prev_raised;
            self.issued = prev_issued;
            warn!(campaign = %self.id, buyer = %buyer, error = %err, "settlement pull rejected, purchase unwound");
            return Err(CampaignError::SettlementTransferFailed {
                reason: err.to_string(),
            });
        }

        info!(
            campaign = %self.id,
            buyer = %buyer,
            accepted,
            minted = delta,
            raised = self.raised,
            issued = self.issued,
            "purchase committed"
        );
        self.events.push(CampaignEvent::Purchase {
            buyer: buyer.clone(),
            accepted,
            minted: delta,
            at: Utc::now(),
        });

        let mut finalized_now = false;
        if self.issued >= self.config.max_supply {
            self.finalized = true;
            if let Err(err) = self.run_distribution() {
                // The whole purchase is one unit of work: unwind the event,
                // the settlement pull, the mint, and the counters.
                self.finalized = false;
                self.events.pop();
                if let Err(refund_err) =
                    self.settlement
                        .transfer(&self.config.custody, buyer, accepted)
                {
                    warn!(campaign = %self.id, buyer = %buyer, error = %refund_err, "failed to refund settlement pull");
                }
                if let Err(burn_err) = self.token.burn(&self.config.custody, buyer, delta) {
                    warn!(campaign = %self.id, buyer = %buyer, error = %burn_err, "failed to unwind purchase mint");
                }
                self.raised = prev_raised;
                self.issued = prev_issued;
                return Err(err);
            }
            finalized_now = true;
        }

        Ok(PurchaseReceipt {
            campaign: self.id,
            buyer: buyer.clone(),
            accepted,
            minted: delta,
            raised_after: self.raised,
            issued_after: self.issued,
            finalized: finalized_now,
        })
    }

    /// Manual close path: an idempotence safety valve for a campaign whose
    /// curve supply is fully issued but whose auto-finalize did not run.
    pub fn finalize(&mut self) -> Result<FinalizeReceipt, CampaignError> {
        if self.finalized {
            return Err(CampaignError::AlreadyFinalized);
        }
        if self.issued < self.config.max_supply {
            return Err(CampaignError::NotComplete);
        }

        self.finalized = true;
        match self.run_distribution() {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                self.finalized = false;
                Err(err)
            }
        }
    }

    /// Swap the issuance schedule behind the pricing seam.
    ///
    /// Administrative operation gated on the platform identity; refused once
    /// the campaign has closed.
    pub fn set_curve(
        &mut self,
        caller: &AccountId,
        curve: Box<dyn IssuanceCurve>,
    ) -> Result<(), CampaignError> {
        if caller != &self.config.platform {
            warn!(campaign = %self.id, caller = %caller, "unauthorized curve swap attempt");
            return Err(CampaignError::Unauthorized {
                caller: caller.clone(),
            });
        }
        if self.finalized {
            return Err(CampaignError::AlreadyFinalized);
        }
        info!(
            campaign = %self.id,
            from = self.curve.version(),
            to = curve.version(),
            "issuance curve swapped"
        );
        self.curve = curve;
        Ok(())
    }

    fn run_distribution(&mut self) -> Result<FinalizeReceipt, CampaignError> {
        let receipt = {
            let ctx = DistributionContext {
                campaign: self.id,
                creator: &self.config.creator,
                platform: &self.config.platform,
                custody: &self.config.custody,
                goal: self.config.goal,
                curve_supply: self.config.max_supply,
                total_raised: self.raised,
                token: self.token.as_ref(),
                settlement: self.settlement.as_ref(),
                venue: self.venue.as_ref(),
            };
            self.policy.distribute(&ctx)?
        };
        self.events.push(CampaignEvent::Finalized {
            total_raised: self.raised,
            at: Utc::now(),
        });
        Ok(receipt)
    }

    pub fn id(&self) -> CampaignId {
        self.id
    }

    pub fn raised(&self) -> u128 {
        self.raised
    }

    pub fn issued(&self) -> u128 {
        self.issued
    }

    pub fn finalized(&self) -> bool {
        self.finalized
    }

    pub fn goal(&self) -> u128 {
        self.config.goal
    }

    pub fn max_supply(&self) -> u128 {
        self.config.max_supply
    }

    pub fn creator(&self) -> &AccountId {
        &self.config.creator
    }

    pub fn platform(&self) -> &AccountId {
        &self.config.platform
    }

    pub fn custody(&self) -> &AccountId {
        &self.config.custody
    }

    pub fn curve_version(&self) -> &'static str {
        self.curve.version()
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> &[CampaignEvent] {
        &self.events
    }
}

/// Single-writer handle for hosts that do not serialize state-mutating
/// calls themselves.
///
/// Campaign transitions never unwind mid-commit (collaborator rejections
/// are handled, not propagated as panics), so a poisoned lock still holds
/// consistent state and is simply reclaimed.
#[derive(Clone)]
pub struct SharedCampaign {
    inner: Arc<Mutex<Campaign>>,
}

impl SharedCampaign {
    pub fn new(campaign: Campaign) -> Self {
        Self {
            inner: Arc::new(Mutex::new(campaign)),
        }
    }

    pub fn purchase(
        &self,
        buyer: &AccountId,
        offered: u128,
    ) -> Result<PurchaseReceipt, CampaignError> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .purchase(buyer, offered)
    }

    pub fn finalize(&self) -> Result<FinalizeReceipt, CampaignError> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .finalize()
    }

    /// Run a read-only query under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Campaign) -> R) -> R {
        f(&self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
