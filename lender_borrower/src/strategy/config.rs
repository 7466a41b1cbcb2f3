//! Operator tunable parameters of a strategy

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{
    constants::*,
    utils::error::{ManagerError, ManagerResult},
};

/// Leverage parameters. Replaced as a whole and only after validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeverageConfig {
    /// LTV the controller steers towards
    pub target_ltv_bps: u64,
    /// LTV above which the position is deleveraged regardless of cost
    pub warning_ltv_bps: u64,
    /// Dust threshold for trades, borrows and repayments, denominated in the base asset
    pub min_to_sell: U256,
    /// Tolerate debt left in place when freeing funds instead of recognizing a loss
    pub leave_debt_behind: bool,
    /// Network fee ceiling for discretionary tends, denominated in wei
    pub max_gas_price_to_tend: u128,
    /// Slippage accepted on conversions between want and base
    pub acceptable_slippage_bps: u64,
}

impl Default for LeverageConfig {
    fn default() -> Self {
        Self {
            target_ltv_bps: DEFAULT_TARGET_LTV_BPS,
            warning_ltv_bps: DEFAULT_WARNING_LTV_BPS,
            min_to_sell: U256::ZERO,
            leave_debt_behind: false,
            max_gas_price_to_tend: DEFAULT_MAX_GAS_PRICE_TO_TEND,
            acceptable_slippage_bps: DEFAULT_ACCEPTABLE_SLIPPAGE_BPS,
        }
    }
}

impl LeverageConfig {
    /// Default configuration with a dust threshold of one hundredth of a base token
    pub fn for_base_decimals(base_decimals: u8) -> Self {
        let mut config = Self::default();
        config.min_to_sell(U256::from(10u64).pow(U256::from(base_decimals)) / U256::from(100u64));
        config
    }

    /// Sets the target LTV.
    pub fn target_ltv_bps(&mut self, target_ltv_bps: u64) -> &mut Self {
        self.target_ltv_bps = target_ltv_bps;
        self
    }

    /// Sets the warning LTV.
    pub fn warning_ltv_bps(&mut self, warning_ltv_bps: u64) -> &mut Self {
        self.warning_ltv_bps = warning_ltv_bps;
        self
    }

    /// Sets the dust threshold, denominated in the base asset.
    pub fn min_to_sell(&mut self, min_to_sell: U256) -> &mut Self {
        self.min_to_sell = min_to_sell;
        self
    }

    pub fn leave_debt_behind(&mut self, leave_debt_behind: bool) -> &mut Self {
        self.leave_debt_behind = leave_debt_behind;
        self
    }

    /// Sets the network fee ceiling for discretionary tends, denominated in wei.
    pub fn max_gas_price_to_tend(&mut self, max_gas_price_to_tend: u128) -> &mut Self {
        self.max_gas_price_to_tend = max_gas_price_to_tend;
        self
    }

    pub fn acceptable_slippage_bps(&mut self, acceptable_slippage_bps: u64) -> &mut Self {
        self.acceptable_slippage_bps = acceptable_slippage_bps;
        self
    }

    pub fn validate(&self) -> ManagerResult<()> {
        if self.target_ltv_bps > LTV_CEILING_BPS || self.warning_ltv_bps > LTV_CEILING_BPS {
            return Err(ManagerError::InvalidConfig(format!(
                "LTV ratios must not exceed {} bps.",
                LTV_CEILING_BPS
            )));
        }
        if self.target_ltv_bps > self.warning_ltv_bps {
            return Err(ManagerError::InvalidConfig(
                "Target LTV must not exceed the warning LTV.".to_string(),
            ));
        }
        if self.acceptable_slippage_bps > MAX_BPS {
            return Err(ManagerError::InvalidConfig(format!(
                "Slippage must not exceed {} bps.",
                MAX_BPS
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON encoded configuration. Missing fields take their defaults.
    pub fn from_json(input: &str) -> ManagerResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|err| ManagerError::DecodingError(format!("{:#?}", err)))?;
        config.validate()?;
        Ok(config)
    }
}

/// Bounds on the profit and loss a harvest may report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckSettings {
    /// Max profit relative to the strategy's total debt
    pub profit_limit_bps: u64,
    /// Max loss relative to the strategy's total debt
    pub loss_limit_bps: u64,
    /// Optional absolute cap on profit, denominated in want
    pub max_profit: Option<U256>,
    /// Optional absolute cap on loss, denominated in want
    pub max_loss: Option<U256>,
}

impl Default for HealthCheckSettings {
    fn default() -> Self {
        Self {
            profit_limit_bps: DEFAULT_PROFIT_LIMIT_BPS,
            loss_limit_bps: DEFAULT_LOSS_LIMIT_BPS,
            max_profit: None,
            max_loss: None,
        }
    }
}

impl HealthCheckSettings {
    pub fn validate(&self) -> ManagerResult<()> {
        if self.profit_limit_bps > MAX_BPS || self.loss_limit_bps > MAX_BPS {
            return Err(ManagerError::InvalidConfig(format!(
                "Health check limits must not exceed {} bps.",
                MAX_BPS
            )));
        }
        Ok(())
    }
}

/// Thresholds used by the harvest trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestTriggerSettings {
    /// Seconds that must pass between two discretionary harvests
    pub min_report_delay: u64,
    /// Seconds after which a harvest is forced
    pub max_report_delay: u64,
    /// Debt outstanding, profit or loss above which a harvest is due, denominated in want
    pub debt_threshold: U256,
    /// Vault credit above which a harvest is due, denominated in want
    pub credit_threshold: U256,
    /// Network fee ceiling for discretionary harvests, denominated in wei
    pub max_base_fee: u128,
}

impl Default for HarvestTriggerSettings {
    fn default() -> Self {
        Self {
            min_report_delay: DEFAULT_MIN_REPORT_DELAY,
            max_report_delay: DEFAULT_MAX_REPORT_DELAY,
            debt_threshold: U256::ZERO,
            credit_threshold: U256::ZERO,
            max_base_fee: DEFAULT_MAX_GAS_PRICE_TO_TEND,
        }
    }
}

impl HarvestTriggerSettings {
    pub fn validate(&self) -> ManagerResult<()> {
        if self.min_report_delay > self.max_report_delay {
            return Err(ManagerError::InvalidConfig(
                "Min report delay must not exceed the max report delay.".to_string(),
            ));
        }
        Ok(())
    }
}
