//! Pure sizing of leverage adjustments.
//!
//! Every amount is computed from the snapshot taken at the start of the step. Amounts in want
//! are collateral units, amounts in base are debt units.

use alloy_primitives::U256;

use crate::{
    constants::{max_bps, MAX_BPS},
    utils::{
        common::{mul_div, mul_div_up},
        error::ManagerResult,
    },
};

use super::valuation::{ltv_bps, Converter};

/// Collateral that can be withdrawn while keeping the LTV at or under `bound_bps`
pub fn max_withdrawable_collateral(
    collateral: U256,
    debt_in_want: U256,
    bound_bps: u64,
) -> ManagerResult<U256> {
    if debt_in_want.is_zero() {
        return Ok(collateral);
    }
    if bound_bps == 0 {
        return Ok(U256::ZERO);
    }
    let required = mul_div_up(debt_in_want, max_bps(), U256::from(bound_bps))?;
    Ok(collateral.saturating_sub(required))
}

/// Collateral to sell so that repaying debt with the proceeds brings the LTV down to
/// `target_bps`. Includes a margin for the accepted slippage.
pub fn collateral_to_sell(
    collateral: U256,
    debt_in_want: U256,
    target_bps: u64,
    slippage_bps: u64,
) -> ManagerResult<U256> {
    let target = U256::from(target_bps.min(MAX_BPS - 1));
    let excess = debt_in_want
        .checked_mul(max_bps())
        .and_then(|scaled_debt| scaled_debt.checked_sub(target * collateral));
    let Some(excess) = excess.filter(|excess| !excess.is_zero()) else {
        return Ok(U256::ZERO);
    };

    let to_sell = mul_div_up(excess, U256::from(1), max_bps() - target)?.min(debt_in_want);
    mul_div_up(to_sell, U256::from(MAX_BPS + slippage_bps), max_bps())
}

/// Snapshot used to size the liquidation of `amount_needed` want
#[derive(Clone, Copy, Debug, Default)]
pub struct FreeFundsInput {
    pub collateral: U256,
    pub debt: U256,
    pub debt_in_want: U256,
    pub loose_want: U256,
    pub amount_needed: U256,
    pub target_ltv_bps: u64,
    pub warning_ltv_bps: u64,
    /// Unwind the whole position
    pub emergency: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreeFundsPlan {
    /// Debt to repay, denominated in base
    pub repay: U256,
    /// Collateral to withdraw, denominated in want
    pub withdraw: U256,
}

/// Sizes the debt repayment and the collateral withdrawal that free `amount_needed` want.
///
/// The repayment is the larger of what keeps the remaining collateral at the target LTV and
/// what brings a position above the warning LTV back to target, so funds are freed once.
pub fn plan_free_funds(input: &FreeFundsInput, converter: &Converter) -> ManagerResult<FreeFundsPlan> {
    if input.emergency {
        return Ok(FreeFundsPlan {
            repay: input.debt,
            withdraw: input.collateral,
        });
    }

    let need = input.amount_needed.saturating_sub(input.loose_want);
    let withdraw = need.min(input.collateral);

    let vault_driven = if withdraw.is_zero() {
        U256::ZERO
    } else {
        let remaining_collateral = input.collateral - withdraw;
        let supported = mul_div(
            remaining_collateral,
            U256::from(input.target_ltv_bps),
            max_bps(),
        )?;
        input.debt_in_want.saturating_sub(supported)
    };

    let warning_driven = if ltv_bps(input.collateral, input.debt_in_want)? > input.warning_ltv_bps {
        let supported = mul_div(input.collateral, U256::from(input.target_ltv_bps), max_bps())?;
        input.debt_in_want.saturating_sub(supported)
    } else {
        U256::ZERO
    };

    let repay_in_want = vault_driven.max(warning_driven);
    let repay = converter.want_to_base_up(repay_in_want)?.min(input.debt);

    Ok(FreeFundsPlan { repay, withdraw })
}

/// Snapshot used to size a rebalance
#[derive(Clone, Copy, Debug, Default)]
pub struct RebalanceInput {
    pub collateral: U256,
    pub debt: U256,
    pub debt_in_want: U256,
    /// Loose want that can be supplied
    pub investable: U256,
    pub target_ltv_bps: u64,
    pub warning_ltv_bps: u64,
    /// Highest LTV the market lets the strategy borrow at
    pub collateral_factor_bps: u64,
    /// Dust threshold for borrows, denominated in base
    pub min_to_sell: U256,
    pub borrow_liquidity: U256,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebalancePlan {
    /// Nothing to do
    Idle,
    /// Supply loose want only
    Supply { supply: U256 },
    /// Supply loose want and borrow base up to the target LTV
    Lever { supply: U256, borrow: U256 },
    /// Supply loose want and repay base down to the target LTV
    Deleverage { supply: U256, repay: U256 },
}

/// Picks the rebalance regime from the LTV the position would have once the investable want
/// is supplied.
pub fn plan_rebalance(input: &RebalanceInput, converter: &Converter) -> ManagerResult<RebalancePlan> {
    let supply = input.investable;
    let collateral = input.collateral.saturating_add(supply);
    let ltv = ltv_bps(collateral, input.debt_in_want)?;
    let has_debt = !input.debt.is_zero();

    let must_deleverage = has_debt
        && (collateral.is_zero() || ltv > input.warning_ltv_bps || input.target_ltv_bps == 0);
    if must_deleverage {
        let supported = mul_div(collateral, U256::from(input.target_ltv_bps), max_bps())?;
        let repay_in_want = input.debt_in_want.saturating_sub(supported);
        let repay = converter.want_to_base_up(repay_in_want)?.min(input.debt);
        return Ok(RebalancePlan::Deleverage { supply, repay });
    }

    let target = input.target_ltv_bps.min(input.collateral_factor_bps);
    if ltv < target {
        let supported = mul_div(collateral, U256::from(target), max_bps())?;
        let borrow_in_want = supported.saturating_sub(input.debt_in_want);
        let borrow = converter
            .want_to_base(borrow_in_want)?
            .min(input.borrow_liquidity);
        if !borrow.is_zero() && borrow >= input.min_to_sell {
            return Ok(RebalancePlan::Lever { supply, borrow });
        }
    }

    if supply.is_zero() {
        Ok(RebalancePlan::Idle)
    } else {
        Ok(RebalancePlan::Supply { supply })
    }
}
