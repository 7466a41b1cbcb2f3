use alloy_primitives::U256;

use crate::utils::error::ManagerResult;

/// Lending market account of the strategy.
///
/// Collateral is denominated in want, debt in the base asset. Every view projects interest up
/// to the moment it is called; `accrue_account` writes that interest into the market's books.
#[cfg_attr(test, mockall::automock)]
pub trait LendingMarket {
    /// Accrues interest on the strategy's account
    fn accrue_account(&mut self) -> ManagerResult<()>;

    /// Collateral supplied by the strategy
    fn collateral_balance_of(&self) -> U256;

    /// Base asset owed by the strategy, interest included
    fn borrow_balance_of(&self) -> U256;

    /// Reward tokens accrued to the strategy and not claimed yet
    fn rewards_owed(&self) -> U256;

    /// Base asset that can currently be borrowed from the pool
    fn borrow_liquidity(&self) -> U256;

    /// Collateral that the pool can currently hand back
    fn collateral_liquidity(&self) -> U256;

    /// Remaining room under the collateral supply cap
    fn supply_headroom(&self) -> U256;

    /// Highest LTV accepted by the market on borrows and collateral withdrawals
    fn borrow_collateral_factor_bps(&self) -> u64;

    fn supply(&mut self, amount: U256) -> ManagerResult<()>;

    /// Returns the collateral actually withdrawn
    fn withdraw(&mut self, amount: U256) -> ManagerResult<U256>;

    /// Returns the base asset actually borrowed
    fn borrow(&mut self, amount: U256) -> ManagerResult<U256>;

    /// Returns the debt actually repaid. Never repays more than what is owed.
    fn repay(&mut self, amount: U256) -> ManagerResult<U256>;

    /// A new, empty account on the same market
    fn fresh_account(&self) -> Box<dyn LendingMarket>;
}
