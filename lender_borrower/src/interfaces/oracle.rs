use alloy_primitives::{Address, U256};

use crate::utils::error::ManagerResult;

/// USD price feed. Every price shares the same fixed-point scale, 1e8 by convention.
#[cfg_attr(test, mockall::automock)]
pub trait PriceOracle {
    fn price(&self, token: Address) -> ManagerResult<U256>;
}
