use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use alloy_primitives::{Address, U256};

use crate::{
    interfaces::PriceOracle,
    utils::{
        clock::Clock,
        error::{ManagerError, ManagerResult},
    },
};

/// Price feed with prices set by the test
#[derive(Default)]
pub struct SimOracle {
    prices: RefCell<HashMap<Address, U256>>,
}

impl SimOracle {
    pub fn set_price(&self, token: Address, price: U256) {
        self.prices.borrow_mut().insert(token, price);
    }
}

impl PriceOracle for SimOracle {
    fn price(&self, token: Address) -> ManagerResult<U256> {
        self.prices
            .borrow()
            .get(&token)
            .copied()
            .ok_or(ManagerError::NonExistentValue)
    }
}

/// Clock moved forward by the test
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn advance(&self, seconds: u64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}
