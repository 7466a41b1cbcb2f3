use alloy_primitives::{Address, U256};

use crate::utils::error::ManagerResult;

/// Secondary position holding the borrowed base asset.
/// One sink belongs to exactly one strategy for its whole lifetime.
#[cfg_attr(test, mockall::automock)]
pub trait YieldSink {
    /// Binds the sink to its owning strategy. Can only be called once.
    fn initialize(&mut self, owner: Address) -> ManagerResult<()>;

    fn owner(&self) -> Option<Address>;

    /// Accrues interest on the underlying position
    fn accrue(&mut self) -> ManagerResult<()>;

    /// Owner only
    fn deposit(&mut self, caller: Address, amount: U256) -> ManagerResult<()>;

    /// Owner only. Returns the amount actually freed, which is lower than `amount` when the
    /// underlying position lacks liquidity.
    fn withdraw(&mut self, caller: Address, amount: U256) -> ManagerResult<U256>;

    /// Principal plus accrued interest, without mutating state
    fn accrued_balance(&self) -> U256;

    /// Amount deposited and not withdrawn yet
    fn principal(&self) -> U256;

    /// Part of the accrued balance that can be withdrawn right now
    fn withdrawable(&self) -> U256;

    /// Reward tokens earned by the position
    fn pending_rewards(&self) -> U256;

    /// Governance only escape hatch. Withdraws everything to governance and returns the amount.
    fn manual_withdraw(&mut self, caller: Address) -> ManagerResult<U256>;
}

/// Base asset supply position underneath a [`YieldSink`]
#[cfg_attr(test, mockall::automock)]
pub trait SupplyPosition {
    fn accrue(&mut self) -> ManagerResult<()>;

    fn supply(&mut self, amount: U256) -> ManagerResult<()>;

    /// Returns the amount actually withdrawn
    fn withdraw(&mut self, amount: U256) -> ManagerResult<U256>;

    /// Supplied amount, interest included
    fn balance_of(&self) -> U256;

    /// Base asset the pool can currently hand back
    fn liquidity(&self) -> U256;

    fn rewards_owed(&self) -> U256;

    /// A new, empty position on the same market
    fn fresh_account(&self) -> Box<dyn SupplyPosition>;
}
