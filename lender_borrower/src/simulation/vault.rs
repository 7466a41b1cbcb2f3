use std::{collections::HashMap, rc::Rc};

use alloy_primitives::{Address, U256};

use crate::{
    constants::max_bps,
    interfaces::AccountingVault,
    strategy::LeverageController,
    types::{HarvestReport, StrategyParams, WithdrawOutcome},
    utils::{
        clock::Clock,
        error::{ManagerError, ManagerResult},
    },
};

use super::oracle::ManualClock;

/// Vault ledger lending want to its strategies
pub struct SimulatedVault {
    pub address: Address,
    /// Want held by the vault itself
    idle: U256,
    strategies: HashMap<Address, StrategyParams>,
    clock: Rc<ManualClock>,
}

impl SimulatedVault {
    pub fn new(address: Address, clock: Rc<ManualClock>) -> Self {
        Self {
            address,
            idle: U256::ZERO,
            strategies: HashMap::new(),
            clock,
        }
    }

    pub fn deposit(&mut self, amount: U256) {
        self.idle += amount;
    }

    pub fn add_strategy(&mut self, strategy: Address, debt_ratio: u64) {
        let now = self.clock.now();
        self.strategies.insert(
            strategy,
            StrategyParams {
                debt_ratio,
                activation: now,
                last_report: now,
                ..Default::default()
            },
        );
    }

    pub fn update_debt_ratio(&mut self, strategy: Address, debt_ratio: u64) {
        if let Some(params) = self.strategies.get_mut(&strategy) {
            params.debt_ratio = debt_ratio;
        }
    }

    pub fn params(&self, strategy: Address) -> StrategyParams {
        self.strategies.get(&strategy).copied().unwrap_or_default()
    }

    pub fn idle(&self) -> U256 {
        self.idle
    }

    pub fn total_assets(&self) -> U256 {
        self.strategies
            .values()
            .fold(self.idle, |total, params| total + params.total_debt)
    }

    /// Pulls `amount` want out of `strategy` the way a user withdrawal would
    pub fn withdraw_from(
        &mut self,
        strategy: &mut LeverageController,
        amount: U256,
    ) -> ManagerResult<WithdrawOutcome> {
        let outcome = strategy.withdraw(self.address, amount)?;
        let params = self
            .strategies
            .get_mut(&strategy.address())
            .ok_or(ManagerError::NonExistentValue)?;
        let settled = (outcome.freed + outcome.loss).min(params.total_debt);
        params.total_debt -= settled;
        params.total_loss += outcome.loss;
        self.idle += outcome.freed;
        Ok(outcome)
    }

    fn debt_limit(&self, params: &StrategyParams) -> U256 {
        self.total_assets() * U256::from(params.debt_ratio) / max_bps()
    }
}

impl AccountingVault for SimulatedVault {
    fn strategy_params(&self, strategy: Address) -> ManagerResult<StrategyParams> {
        self.strategies
            .get(&strategy)
            .copied()
            .ok_or(ManagerError::NonExistentValue)
    }

    fn debt_outstanding(&self, strategy: Address) -> U256 {
        let params = self.params(strategy);
        params.total_debt.saturating_sub(self.debt_limit(&params))
    }

    fn credit_available(&self, strategy: Address) -> U256 {
        let params = self.params(strategy);
        self.debt_limit(&params)
            .saturating_sub(params.total_debt)
            .min(self.idle)
    }

    fn report(&mut self, strategy: Address, report: &HarvestReport) -> ManagerResult<U256> {
        if !report.profit.is_zero() && !report.loss.is_zero() {
            return Err(ManagerError::Custom(
                "A report carries either a profit or a loss.".to_string(),
            ));
        }
        let mut params = self.strategy_params(strategy)?;
        if report.loss > params.total_debt {
            return Err(ManagerError::Custom("Loss exceeds the debt.".to_string()));
        }

        params.total_gain += report.profit;
        params.total_loss += report.loss;
        params.total_debt -= report.loss;
        self.strategies.insert(strategy, params);

        let debt_payment = report.debt_payment.min(self.debt_outstanding(strategy));
        params.total_debt -= debt_payment;
        self.idle += report.profit + report.debt_payment;
        self.strategies.insert(strategy, params);

        let credit = self.credit_available(strategy);
        params.total_debt += credit;
        params.last_report = self.clock.now();
        self.idle -= credit;
        self.strategies.insert(strategy, params);
        Ok(credit)
    }

    fn revoke_strategy(&mut self, strategy: Address) -> ManagerResult<()> {
        let params = self
            .strategies
            .get_mut(&strategy)
            .ok_or(ManagerError::NonExistentValue)?;
        params.debt_ratio = 0;
        Ok(())
    }

    fn migrate_strategy(&mut self, old: Address, new: Address) -> ManagerResult<()> {
        let previous = self.strategy_params(old)?;
        if self.strategies.contains_key(&new) {
            return Err(ManagerError::Custom(
                "The new strategy is already active.".to_string(),
            ));
        }
        self.strategies.insert(
            new,
            StrategyParams {
                debt_ratio: previous.debt_ratio,
                total_debt: previous.total_debt,
                activation: previous.last_report,
                last_report: previous.last_report,
                ..Default::default()
            },
        );
        self.strategies.insert(
            old,
            StrategyParams {
                debt_ratio: 0,
                total_debt: U256::ZERO,
                ..previous
            },
        );
        Ok(())
    }
}
