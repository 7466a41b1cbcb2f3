//! Mutable strategy data

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::utils::error::{arithmetic_err, ManagerResult};

use super::config::{HarvestTriggerSettings, HealthCheckSettings, LeverageConfig};

/// Lifecycle of a strategy. The emergency exit is one-way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrategyState {
    #[default]
    Active,
    EmergencyExiting,
}

impl StrategyState {
    pub fn is_active(&self) -> bool {
        matches!(self, StrategyState::Active)
    }
}

impl std::fmt::Display for StrategyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyState::Active => write!(f, "Active"),
            StrategyState::EmergencyExiting => write!(f, "EmergencyExiting"),
        }
    }
}

/// Loose token balances held by the strategy
#[derive(Clone, Debug, Default)]
pub struct Wallet {
    balances: HashMap<Address, U256>,
}

impl Wallet {
    pub fn balance_of(&self, token: Address) -> U256 {
        self.balances.get(&token).copied().unwrap_or_default()
    }

    pub fn credit(&mut self, token: Address, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let balance = self.balances.entry(token).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn debit(&mut self, token: Address, amount: U256) -> ManagerResult<()> {
        let balance = self.balance_of(token);
        let remaining = balance.checked_sub(amount).ok_or_else(|| {
            arithmetic_err(format!(
                "Balance of {} is lower than the debited amount {}.",
                token, amount
            ))
        })?;
        self.balances.insert(token, remaining);
        Ok(())
    }

    /// Empties the balance of `token` and returns it
    pub fn take_all(&mut self, token: Address) -> U256 {
        self.balances.remove(&token).unwrap_or_default()
    }
}

/// Struct containing all mutable data of a strategy
#[derive(Clone, Debug)]
pub struct StrategyData {
    pub state: StrategyState,
    pub config: LeverageConfig,
    pub health_check: HealthCheckSettings,
    /// Whether the next harvest runs the health check
    pub do_health_check: bool,
    pub harvest_trigger: HarvestTriggerSettings,
    pub wallet: Wallet,
    pub initialized: bool,
    /// Timestamp of the latest harvest, denominated in seconds
    pub last_harvest: u64,
}

impl Default for StrategyData {
    fn default() -> Self {
        Self {
            state: StrategyState::Active,
            config: LeverageConfig::default(),
            health_check: HealthCheckSettings::default(),
            do_health_check: true,
            harvest_trigger: HarvestTriggerSettings::default(),
            wallet: Wallet::default(),
            initialized: false,
            last_harvest: 0,
        }
    }
}

impl StrategyData {
    /// Sets the leverage configuration. Validation is left to the caller.
    pub fn config(&mut self, config: LeverageConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Sets the health check limits.
    pub fn health_check(&mut self, health_check: HealthCheckSettings) -> &mut Self {
        self.health_check = health_check;
        self
    }

    pub fn do_health_check(&mut self, do_health_check: bool) -> &mut Self {
        self.do_health_check = do_health_check;
        self
    }

    /// Sets the harvest trigger thresholds.
    pub fn harvest_trigger(&mut self, harvest_trigger: HarvestTriggerSettings) -> &mut Self {
        self.harvest_trigger = harvest_trigger;
        self
    }

    /// Sets the timestamp of the latest harvest.
    pub fn last_harvest(&mut self, last_harvest: u64) -> &mut Self {
        self.last_harvest = last_harvest;
        self
    }
}
