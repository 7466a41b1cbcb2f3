//! Asset valuation: unit conversions through the oracle and position snapshots

use alloy_primitives::U256;

use crate::{
    constants::max_bps,
    interfaces::{LendingMarket, PriceOracle, YieldSink},
    utils::{
        common::{mul_div, mul_div_up},
        error::{arithmetic_err, ManagerError, ManagerResult},
    },
};

use super::{data::Wallet, settings::TokenSet};

/// Converts amounts between want, base and reward units at oracle prices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Converter {
    want_price: U256,
    base_price: U256,
    reward_price: U256,
    want_unit: U256,
    base_unit: U256,
    reward_unit: U256,
}

fn unit(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

fn scaled(price: U256, unit: U256) -> ManagerResult<U256> {
    price
        .checked_mul(unit)
        .ok_or_else(|| arithmetic_err("Price scaling overflowed."))
}

impl Converter {
    pub fn new(want_price: U256, base_price: U256, reward_price: U256, tokens: &TokenSet) -> Self {
        Self {
            want_price,
            base_price,
            reward_price,
            want_unit: unit(tokens.want_decimals),
            base_unit: unit(tokens.base_decimals),
            reward_unit: unit(tokens.reward_decimals),
        }
    }

    /// Reads the current prices of the strategy's tokens.
    /// Fails on zero want or base prices. A missing reward price values rewards at zero.
    pub fn load(oracle: &dyn PriceOracle, tokens: &TokenSet) -> ManagerResult<Self> {
        let want_price = oracle.price(tokens.want)?;
        let base_price = oracle.price(tokens.base)?;
        if want_price.is_zero() || base_price.is_zero() {
            return Err(ManagerError::Custom(
                "The oracle returned a zero price.".to_string(),
            ));
        }
        let reward_price = oracle.price(tokens.reward).unwrap_or_default();
        Ok(Self::new(want_price, base_price, reward_price, tokens))
    }

    pub fn base_to_want(&self, amount: U256) -> ManagerResult<U256> {
        mul_div(
            amount,
            scaled(self.base_price, self.want_unit)?,
            scaled(self.want_price, self.base_unit)?,
        )
    }

    pub fn base_to_want_up(&self, amount: U256) -> ManagerResult<U256> {
        mul_div_up(
            amount,
            scaled(self.base_price, self.want_unit)?,
            scaled(self.want_price, self.base_unit)?,
        )
    }

    pub fn want_to_base(&self, amount: U256) -> ManagerResult<U256> {
        mul_div(
            amount,
            scaled(self.want_price, self.base_unit)?,
            scaled(self.base_price, self.want_unit)?,
        )
    }

    pub fn want_to_base_up(&self, amount: U256) -> ManagerResult<U256> {
        mul_div_up(
            amount,
            scaled(self.want_price, self.base_unit)?,
            scaled(self.base_price, self.want_unit)?,
        )
    }

    pub fn reward_to_want(&self, amount: U256) -> ManagerResult<U256> {
        if amount.is_zero() || self.reward_price.is_zero() {
            return Ok(U256::ZERO);
        }
        mul_div(
            amount,
            scaled(self.reward_price, self.want_unit)?,
            scaled(self.want_price, self.reward_unit)?,
        )
    }
}

/// Returns `debt_in_want / collateral` in basis points, zero without collateral
pub fn ltv_bps(collateral: U256, debt_in_want: U256) -> ManagerResult<u64> {
    if collateral.is_zero() {
        return Ok(0);
    }
    let ltv = mul_div(debt_in_want, max_bps(), collateral)?;
    Ok(u64::try_from(ltv).unwrap_or(u64::MAX))
}

/// Strategy position read from live balances
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub loose_want: U256,
    pub loose_base: U256,
    /// Want supplied to the lending market
    pub collateral: U256,
    /// Base owed to the lending market, interest included
    pub debt: U256,
    /// Base held by the yield sink, interest included
    pub yield_sink: U256,
    /// Unclaimed and loose reward tokens
    pub rewards: U256,
    pub debt_in_want: U256,
    pub yield_sink_in_want: U256,
    pub loose_base_in_want: U256,
    pub rewards_in_want: U256,
    pub ltv_bps: u64,
}

impl Position {
    /// Reads every balance of the strategy. Interest is projected, not accrued.
    pub fn capture(
        market: &dyn LendingMarket,
        sink: &dyn YieldSink,
        wallet: &Wallet,
        tokens: &TokenSet,
        converter: &Converter,
    ) -> ManagerResult<Self> {
        let loose_want = wallet.balance_of(tokens.want);
        let loose_base = wallet.balance_of(tokens.base);
        let collateral = market.collateral_balance_of();
        let debt = market.borrow_balance_of();
        let yield_sink = sink.accrued_balance();
        let rewards = market
            .rewards_owed()
            .saturating_add(sink.pending_rewards())
            .saturating_add(wallet.balance_of(tokens.reward));

        let debt_in_want = converter.base_to_want_up(debt)?;
        Ok(Self {
            loose_want,
            loose_base,
            collateral,
            debt,
            yield_sink,
            rewards,
            debt_in_want,
            yield_sink_in_want: converter.base_to_want(yield_sink)?,
            loose_base_in_want: converter.base_to_want(loose_base)?,
            rewards_in_want: converter.reward_to_want(rewards)?,
            ltv_bps: ltv_bps(collateral, debt_in_want)?,
        })
    }

    /// Net value of the position in want. Never negative.
    pub fn estimated_total_assets(&self) -> U256 {
        self.loose_want
            .saturating_add(self.collateral)
            .saturating_add(self.yield_sink_in_want)
            .saturating_add(self.loose_base_in_want)
            .saturating_add(self.rewards_in_want)
            .saturating_sub(self.debt_in_want)
    }

    /// Debt not covered by the yield sink and loose base
    pub fn base_token_owed(&self) -> U256 {
        self.debt
            .saturating_sub(self.yield_sink.saturating_add(self.loose_base))
    }

    /// Base held on top of the debt
    pub fn base_surplus(&self) -> U256 {
        self.yield_sink
            .saturating_add(self.loose_base)
            .saturating_sub(self.debt)
    }

    /// Whether the position needs to shed debt, either above `bound_bps` or stranded without collateral
    pub fn is_above(&self, bound_bps: u64) -> bool {
        (self.collateral.is_zero() && !self.debt.is_zero()) || self.ltv_bps > bound_bps
    }

    /// Profit and loss against the debt recorded by the vault
    pub fn profit_and_loss(&self, total_debt: U256) -> (U256, U256) {
        let total_assets = self.estimated_total_assets();
        if total_assets >= total_debt {
            (total_assets - total_debt, U256::ZERO)
        } else {
            (U256::ZERO, total_debt - total_assets)
        }
    }
}
