//! In-memory collaborator implementations used for tests, local demos, and
//! embedding. State lives behind an `RwLock`; a poisoned lock surfaces as a
//! rejected operation rather than a panic.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::debug;

use fairlaunch_curve::math::isqrt;
use fairlaunch_types::AccountId;

use crate::traits::{
    AddLiquidityRequest, LedgerError, LiquidityReceipt, LiquidityVenue, SettlementLedger,
    TokenLedger, VenueError,
};

fn poisoned() -> LedgerError {
    LedgerError::Rejected {
        reason: "ledger lock poisoned".into(),
    }
}

/// Double-entry balance book shared by both in-memory ledgers.
#[derive(Default)]
struct BalanceBook {
    balances: HashMap<AccountId, u128>,
    allowances: HashMap<(AccountId, AccountId), u128>,
    total_supply: u128,
}

impl BalanceBook {
    fn credit(&mut self, account: &AccountId, amount: u128) {
        *self.balances.entry(account.clone()).or_default() += amount;
    }

    fn debit(&mut self, account: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let balance = self.balances.entry(account.clone()).or_default();
        if *balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: account.clone(),
                required: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    fn spend_allowance(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let key = (owner.clone(), spender.clone());
        let allowance = self.allowances.entry(key).or_default();
        if *allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                spender: spender.clone(),
                required: amount,
                available: *allowance,
            });
        }
        *allowance -= amount;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        // An owner spending their own funds needs no allowance.
        if spender != from {
            self.spend_allowance(from, spender, amount)?;
        }
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(())
    }
}

/// In-memory project-token ledger with a single authorized minter.
pub struct InMemoryTokenLedger {
    authorized_minter: AccountId,
    inner: RwLock<BalanceBook>,
}

impl InMemoryTokenLedger {
    /// Create a ledger whose minting capability is held exclusively by
    /// `authorized_minter` (the campaign custody account).
    pub fn new(authorized_minter: AccountId) -> Self {
        Self {
            authorized_minter,
            inner: RwLock::new(BalanceBook::default()),
        }
    }

    fn authorize(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if caller != &self.authorized_minter {
            return Err(LedgerError::NotAuthorizedMinter {
                caller: caller.clone(),
            });
        }
        Ok(())
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn mint(&self, minter: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.authorize(minter)?;
        let mut book = self.inner.write().map_err(|_| poisoned())?;
        book.credit(to, amount);
        book.total_supply += amount;
        debug!(to = %to, amount, total_supply = book.total_supply, "tokens minted");
        Ok(())
    }

    fn burn(&self, minter: &AccountId, from: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.authorize(minter)?;
        let mut book = self.inner.write().map_err(|_| poisoned())?;
        book.debit(from, amount)?;
        book.total_supply -= amount;
        debug!(from = %from, amount, total_supply = book.total_supply, "tokens burned");
        Ok(())
    }

    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut book = self.inner.write().map_err(|_| poisoned())?;
        book.transfer_from(spender, from, to, amount)
    }

    fn approve(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut book = self.inner.write().map_err(|_| poisoned())?;
        book.allowances
            .insert((owner.clone(), spender.clone()), amount);
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.inner
            .read()
            .map(|book| book.balances.get(account).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.inner
            .read()
            .map(|book| {
                book.allowances
                    .get(&(owner.clone(), spender.clone()))
                    .copied()
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    fn total_supply(&self) -> u128 {
        self.inner
            .read()
            .map(|book| book.total_supply)
            .unwrap_or_default()
    }
}

/// In-memory settlement-asset ledger.
#[derive(Default)]
pub struct InMemorySettlementLedger {
    inner: RwLock<BalanceBook>,
}

impl InMemorySettlementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account balance; bootstrap for tests and demos.
    pub fn credit(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut book = self.inner.write().map_err(|_| poisoned())?;
        book.credit(account, amount);
        Ok(())
    }
}

impl SettlementLedger for InMemorySettlementLedger {
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut book = self.inner.write().map_err(|_| poisoned())?;
        book.transfer_from(spender, from, to, amount)
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut book = self.inner.write().map_err(|_| poisoned())?;
        book.debit(from, amount)?;
        book.credit(to, amount);
        Ok(())
    }

    fn approve(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut book = self.inner.write().map_err(|_| poisoned())?;
        book.allowances
            .insert((owner.clone(), spender.clone()), amount);
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.inner
            .read()
            .map(|book| book.balances.get(account).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.inner
            .read()
            .map(|book| {
                book.allowances
                    .get(&(owner.clone(), spender.clone()))
                    .copied()
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }
}

/// In-memory liquidity venue: pulls both legs from the request's recipient
/// into a pool account and credits a geometric-mean position size.
pub struct InMemoryLiquidityVenue {
    account: AccountId,
    pool: AccountId,
    token: Arc<dyn TokenLedger>,
    settlement: Arc<dyn SettlementLedger>,
    seedings: RwLock<Vec<LiquidityReceipt>>,
}

impl InMemoryLiquidityVenue {
    pub fn new(
        account: AccountId,
        pool: AccountId,
        token: Arc<dyn TokenLedger>,
        settlement: Arc<dyn SettlementLedger>,
    ) -> Self {
        Self {
            account,
            pool,
            token,
            settlement,
            seedings: RwLock::new(Vec::new()),
        }
    }

    /// Account holding pooled reserves.
    pub fn pool(&self) -> &AccountId {
        &self.pool
    }

    /// Seedings accepted so far.
    pub fn seedings(&self) -> Vec<LiquidityReceipt> {
        self.seedings
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl LiquidityVenue for InMemoryLiquidityVenue {
    fn account(&self) -> &AccountId {
        &self.account
    }

    fn add_liquidity(&self, request: AddLiquidityRequest) -> Result<LiquidityReceipt, VenueError> {
        if request.deadline < Utc::now() {
            return Err(VenueError::DeadlineExpired {
                deadline: request.deadline,
            });
        }
        // This venue takes both legs in full; a fuller implementation would
        // rebalance against pool reserves before comparing to the minimums.
        if request.token_amount < request.min_token_accepted {
            return Err(VenueError::BelowMinimum {
                offered: request.token_amount,
                minimum: request.min_token_accepted,
            });
        }
        if request.asset_amount < request.min_asset_accepted {
            return Err(VenueError::BelowMinimum {
                offered: request.asset_amount,
                minimum: request.min_asset_accepted,
            });
        }

        // Pre-validate both legs so the two pulls below cannot fail
        // independently and leave a half-seeded pool.
        if self.token.allowance(&request.recipient, &self.account) < request.token_amount
            || self.token.balance_of(&request.recipient) < request.token_amount
        {
            return Err(VenueError::Rejected {
                reason: "token leg not covered by balance and approval".into(),
            });
        }
        if self.settlement.allowance(&request.recipient, &self.account) < request.asset_amount
            || self.settlement.balance_of(&request.recipient) < request.asset_amount
        {
            return Err(VenueError::Rejected {
                reason: "asset leg not covered by balance and approval".into(),
            });
        }

        self.token
            .transfer_from(
                &self.account,
                &request.recipient,
                &self.pool,
                request.token_amount,
            )
            .map_err(|err| VenueError::Rejected {
                reason: err.to_string(),
            })?;
        self.settlement
            .transfer_from(
                &self.account,
                &request.recipient,
                &self.pool,
                request.asset_amount,
            )
            .map_err(|err| VenueError::Rejected {
                reason: err.to_string(),
            })?;

        // Position sized on the geometric mean of the two legs.
        let receipt = LiquidityReceipt {
            token_used: request.token_amount,
            asset_used: request.asset_amount,
            position: isqrt(request.token_amount) * isqrt(request.asset_amount),
        };

        debug!(
            token_used = receipt.token_used,
            asset_used = receipt.asset_used,
            position = receipt.position,
            "liquidity pool seeded"
        );

        if let Ok(mut seedings) = self.seedings.write() {
            seedings.push(receipt.clone());
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custody() -> AccountId {
        AccountId::new("campaign:custody")
    }

    fn alice() -> AccountId {
        AccountId::new("alice")
    }

    fn bob() -> AccountId {
        AccountId::new("bob")
    }

    #[test]
    fn mint_requires_capability() {
        let ledger = InMemoryTokenLedger::new(custody());
        assert!(matches!(
            ledger.mint(&alice(), &alice(), 100),
            Err(LedgerError::NotAuthorizedMinter { .. })
        ));
        assert_eq!(ledger.total_supply(), 0);

        ledger.mint(&custody(), &alice(), 100).unwrap();
        assert_eq!(ledger.balance_of(&alice()), 100);
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn burn_reverses_mint() {
        let ledger = InMemoryTokenLedger::new(custody());
        ledger.mint(&custody(), &alice(), 100).unwrap();
        ledger.burn(&custody(), &alice(), 40).unwrap();
        assert_eq!(ledger.balance_of(&alice()), 60);
        assert_eq!(ledger.total_supply(), 60);

        assert!(matches!(
            ledger.burn(&custody(), &alice(), 1_000),
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn settlement_transfer_from_needs_approval() {
        let ledger = InMemorySettlementLedger::new();
        ledger.credit(&alice(), 500).unwrap();

        assert!(matches!(
            ledger.transfer_from(&custody(), &alice(), &custody(), 200),
            Err(LedgerError::InsufficientAllowance { .. })
        ));

        ledger.approve(&alice(), &custody(), 200).unwrap();
        ledger
            .transfer_from(&custody(), &alice(), &custody(), 200)
            .unwrap();
        assert_eq!(ledger.balance_of(&alice()), 300);
        assert_eq!(ledger.balance_of(&custody()), 200);
    }

    #[test]
    fn transfer_rejects_overdraft() {
        let ledger = InMemorySettlementLedger::new();
        ledger.credit(&alice(), 10).unwrap();
        assert!(matches!(
            ledger.transfer(&alice(), &bob(), 11),
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(ledger.balance_of(&alice()), 10);
    }

    #[test]
    fn venue_enforces_minimums() {
        let token: Arc<dyn TokenLedger> = Arc::new(InMemoryTokenLedger::new(custody()));
        let settlement = Arc::new(InMemorySettlementLedger::new());
        let venue = InMemoryLiquidityVenue::new(
            AccountId::new("venue:amm"),
            AccountId::new("venue:amm:pool"),
            token,
            settlement,
        );

        let result = venue.add_liquidity(AddLiquidityRequest {
            token_amount: 100,
            asset_amount: 100,
            min_token_accepted: 101,
            min_asset_accepted: 0,
            recipient: custody(),
            deadline: Utc::now() + chrono::Duration::hours(1),
        });
        assert!(matches!(result, Err(VenueError::BelowMinimum { .. })));
    }

    #[test]
    fn venue_pulls_both_legs_into_pool() {
        let token = Arc::new(InMemoryTokenLedger::new(custody()));
        let settlement = Arc::new(InMemorySettlementLedger::new());
        let venue = InMemoryLiquidityVenue::new(
            AccountId::new("venue:amm"),
            AccountId::new("venue:amm:pool"),
            token.clone() as Arc<dyn TokenLedger>,
            settlement.clone() as Arc<dyn SettlementLedger>,
        );

        token.mint(&custody(), &custody(), 400).unwrap();
        token.approve(&custody(), venue.account(), 400).unwrap();
        settlement.credit(&custody(), 100).unwrap();
        settlement.approve(&custody(), venue.account(), 100).unwrap();

        let receipt = venue
            .add_liquidity(AddLiquidityRequest {
                token_amount: 400,
                asset_amount: 100,
                min_token_accepted: 0,
                min_asset_accepted: 0,
                recipient: custody(),
                deadline: Utc::now() + chrono::Duration::hours(1),
            })
            .unwrap();

        assert_eq!(receipt.token_used, 400);
        assert_eq!(receipt.asset_used, 100);
        assert_eq!(receipt.position, 200); // sqrt(400) * sqrt(100)
        assert_eq!(token.balance_of(venue.pool()), 400);
        assert_eq!(settlement.balance_of(venue.pool()), 100);
        assert_eq!(venue.seedings().len(), 1);
    }
}
