//! Lender-Borrower Strategy Constants

use alloy_primitives::U256;

/// Basis points denominator
pub const MAX_BPS: u64 = 10_000;
pub fn max_bps() -> U256 {
    U256::from(MAX_BPS)
}

/// Hard ceiling for both the target and the warning LTV
pub const LTV_CEILING_BPS: u64 = 9_000;

/// Default target LTV
pub const DEFAULT_TARGET_LTV_BPS: u64 = 7_000;

/// Default warning LTV
pub const DEFAULT_WARNING_LTV_BPS: u64 = 8_000;

/// Default slippage accepted when converting between want and base
pub const DEFAULT_ACCEPTABLE_SLIPPAGE_BPS: u64 = 50; // 0.5%

/// Default ceiling for the gas price of discretionary tends, denominated in wei
pub const DEFAULT_MAX_GAS_PRICE_TO_TEND: u128 = 200_000_000_000; // 200 gwei

/// Health check defaults, relative to the strategy's total debt
pub const DEFAULT_PROFIT_LIMIT_BPS: u64 = 100; // 1%
pub const DEFAULT_LOSS_LIMIT_BPS: u64 = 1; // 0.01%

/// Harvest trigger defaults, denominated in seconds
pub const DEFAULT_MIN_REPORT_DELAY: u64 = 6 * 3600;
pub const DEFAULT_MAX_REPORT_DELAY: u64 = 30 * 24 * 3600;

/// Distance under the target LTV at which a tend becomes worthwhile
pub const TEND_LTV_DRIFT_BPS: u64 = 1_000;

/// Max number of withdraw-swap-repay rounds per deleverage
pub const MAX_DELEVERAGE_ROUNDS: u8 = 8;

/// Max number of retry attempts for a keeper action
pub const MAX_RETRY_ATTEMPTS: u8 = 2;

/// Max number of journal entries kept by a strategy
pub const MAX_JOURNAL_ENTRIES: usize = 300;
