//! Plausibility check of harvest results

use alloy_primitives::U256;

use crate::utils::{
    common::apply_bps,
    error::{ManagerError, ManagerResult},
};

use super::config::HealthCheckSettings;

/// Rejects a profit or a loss that is implausible relative to `total_debt`
pub fn check_report(
    settings: &HealthCheckSettings,
    profit: U256,
    loss: U256,
    total_debt: U256,
) -> ManagerResult<()> {
    let profit_limit = apply_bps(total_debt, settings.profit_limit_bps)?;
    let loss_limit = apply_bps(total_debt, settings.loss_limit_bps)?;

    let profit_exceeded =
        profit > profit_limit || settings.max_profit.is_some_and(|max| profit > max);
    let loss_exceeded = loss > loss_limit || settings.max_loss.is_some_and(|max| loss > max);

    if profit_exceeded || loss_exceeded {
        return Err(ManagerError::HealthCheckFailed {
            profit: profit.to_string(),
            loss: loss.to_string(),
        });
    }
    Ok(())
}
