use alloy_primitives::{Address, U256};

use crate::utils::error::ManagerResult;

/// Converts one asset into another at market price
#[cfg_attr(test, mockall::automock)]
pub trait TokenExchange {
    /// Sells `amount_in` of `from` for `to`.
    /// Fails without side effects when less than `min_out` would be received.
    fn swap(&self, from: Address, to: Address, amount_in: U256, min_out: U256)
        -> ManagerResult<U256>;
}
