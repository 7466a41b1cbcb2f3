//! Side-effect free predicates telling a keeper when to tend or harvest

use alloy_primitives::U256;

use crate::{constants::TEND_LTV_DRIFT_BPS, types::StrategyParams};

use super::{
    config::{HarvestTriggerSettings, LeverageConfig},
    data::StrategyState,
    valuation::Position,
};

/// Vault figures the harvest trigger depends on
#[derive(Clone, Copy, Debug, Default)]
pub struct VaultView {
    pub params: StrategyParams,
    pub debt_outstanding: U256,
    pub credit_available: U256,
}

/// Whether the leverage has drifted enough for a tend.
/// A position above the warning LTV always qualifies, whatever the network fee.
pub fn tend_trigger(
    position: &Position,
    config: &LeverageConfig,
    state: StrategyState,
    base_fee: u128,
) -> bool {
    if !state.is_active() {
        return false;
    }
    if position.is_above(config.warning_ltv_bps) {
        return true;
    }
    if base_fee > config.max_gas_price_to_tend {
        return false;
    }
    if config.target_ltv_bps == 0 {
        return !position.debt.is_zero();
    }
    !position.collateral.is_zero()
        && position.ltv_bps.saturating_add(TEND_LTV_DRIFT_BPS) < config.target_ltv_bps
}

/// Whether a harvest is due
pub fn harvest_trigger(
    position: &Position,
    vault: &VaultView,
    settings: &HarvestTriggerSettings,
    now: u64,
    base_fee: u128,
) -> bool {
    let params = &vault.params;
    if params.activation == 0 {
        return false;
    }

    let since_last_report = now.saturating_sub(params.last_report);
    if since_last_report < settings.min_report_delay {
        return false;
    }
    if since_last_report >= settings.max_report_delay {
        return true;
    }
    if base_fee > settings.max_base_fee {
        return false;
    }

    if vault.debt_outstanding > settings.debt_threshold {
        return true;
    }
    let (profit, loss) = position.profit_and_loss(params.total_debt);
    if loss > settings.debt_threshold || profit > settings.debt_threshold {
        return true;
    }
    vault.credit_available > settings.credit_threshold
}
