use std::{cell::Cell, rc::Rc};

use alloy_primitives::{Address, U256};

use crate::{
    constants::MAX_BPS,
    interfaces::TokenExchange,
    strategy::{settings::TokenSet, valuation::Converter},
    utils::{
        common::apply_bps,
        error::{ManagerError, ManagerResult},
    },
};

use super::oracle::SimOracle;

/// Swaps want and base at oracle prices minus a fee
pub struct SimExchange {
    oracle: Rc<SimOracle>,
    tokens: TokenSet,
    fee_bps: u64,
    swaps: Cell<u32>,
}

impl SimExchange {
    pub fn new(oracle: Rc<SimOracle>, tokens: TokenSet, fee_bps: u64) -> Self {
        Self {
            oracle,
            tokens,
            fee_bps,
            swaps: Cell::new(0),
        }
    }

    /// Number of swaps executed so far
    pub fn swaps(&self) -> u32 {
        self.swaps.get()
    }
}

impl TokenExchange for SimExchange {
    fn swap(&self, from: Address, to: Address, amount_in: U256, min_out: U256) -> ManagerResult<U256> {
        let converter = Converter::load(&*self.oracle, &self.tokens)?;
        let value = if from == self.tokens.want && to == self.tokens.base {
            converter.want_to_base(amount_in)?
        } else if from == self.tokens.base && to == self.tokens.want {
            converter.base_to_want(amount_in)?
        } else {
            return Err(ManagerError::Market("Unsupported pair.".to_string()));
        };

        let amount_out = apply_bps(value, MAX_BPS - self.fee_bps)?;
        if amount_out < min_out {
            return Err(ManagerError::Market(format!(
                "Too little received: {} < {}.",
                amount_out, min_out
            )));
        }
        self.swaps.set(self.swaps.get() + 1);
        Ok(amount_out)
    }
}
