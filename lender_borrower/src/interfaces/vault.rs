use alloy_primitives::{Address, U256};

use crate::{
    types::{HarvestReport, StrategyParams},
    utils::error::ManagerResult,
};

/// Outer ledger that lends want to the strategy.
#[cfg_attr(test, mockall::automock)]
pub trait AccountingVault {
    /// Ledger entry of `strategy`
    fn strategy_params(&self, strategy: Address) -> ManagerResult<StrategyParams>;

    /// Want the vault expects `strategy` to return, following a debt ratio decrease or revocation
    fn debt_outstanding(&self, strategy: Address) -> U256;

    /// Want the vault is willing to lend `strategy` on top of its current debt
    fn credit_available(&self, strategy: Address) -> U256;

    /// Settles a harvest.
    /// Receives `report.profit + report.debt_payment` want from the strategy and returns the
    /// credit sent back to it.
    fn report(&mut self, strategy: Address, report: &HarvestReport) -> ManagerResult<U256>;

    /// Sets the debt ratio of `strategy` to zero
    fn revoke_strategy(&mut self, strategy: Address) -> ManagerResult<()>;

    /// Moves the debt and debt ratio of `old` to `new`
    fn migrate_strategy(&mut self, old: Address, new: Address) -> ManagerResult<()>;
}
