use alloy_primitives::U256;
use candid::{CandidType, Nat};

use crate::utils::{common::u256_to_nat, error::ManagerError};

/// Outcome of a harvest, denominated in want.
/// At most one of `profit` and `loss` is non-zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub profit: U256,
    pub loss: U256,
    pub debt_payment: U256,
}

impl HarvestReport {
    /// Builds a report with profit and loss netted against each other
    pub fn netted(profit: U256, loss: U256, debt_payment: U256) -> Self {
        if profit >= loss {
            Self {
                profit: profit - loss,
                loss: U256::ZERO,
                debt_payment,
            }
        } else {
            Self {
                profit: U256::ZERO,
                loss: loss - profit,
                debt_payment,
            }
        }
    }
}

#[derive(Clone, CandidType, Debug, PartialEq)]
pub struct HarvestReportQuery {
    pub profit: Nat,
    pub loss: Nat,
    pub debt_payment: Nat,
}

impl TryFrom<HarvestReport> for HarvestReportQuery {
    type Error = ManagerError;

    fn try_from(value: HarvestReport) -> Result<Self, Self::Error> {
        Ok(Self {
            profit: u256_to_nat(&value.profit)?,
            loss: u256_to_nat(&value.loss)?,
            debt_payment: u256_to_nat(&value.debt_payment)?,
        })
    }
}

/// Vault ledger entry of a strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrategyParams {
    /// Share of the vault's assets the strategy is entitled to, in basis points
    pub debt_ratio: u64,
    /// Want lent to the strategy
    pub total_debt: U256,
    pub total_gain: U256,
    pub total_loss: U256,
    /// Timestamp of the latest report, denominated in seconds
    pub last_report: u64,
    /// Timestamp of the strategy's activation. Zero if the strategy was never added.
    pub activation: u64,
}

/// Result of a tend call
#[derive(Clone, Copy, CandidType, Debug, PartialEq, Eq)]
pub enum TendOutcome {
    /// The position was adjusted
    Rebalanced,
    /// Nothing needed to be done
    Unchanged,
    /// The network fee was above the configured ceiling and the LTV was within bounds
    Deferred,
}

/// Funds released to the vault on a withdrawal, denominated in want
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub freed: U256,
    pub loss: U256,
}

/// Read projection of a strategy's position
#[derive(Clone, CandidType, Debug, PartialEq)]
pub struct StrategyStatusQuery {
    pub strategy: String,
    pub state: String,
    pub estimated_total_assets: Nat,
    pub loose_want: Nat,
    pub collateral: Nat,
    pub debt: Nat,
    pub yield_sink: Nat,
    pub base_token_owed: Nat,
    pub rewards_in_want: Nat,
    pub ltv_bps: u64,
    pub target_ltv_bps: u64,
    pub warning_ltv_bps: u64,
}
