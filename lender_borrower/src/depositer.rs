//! Yield sink placing the borrowed base asset into a supply position

use alloy_primitives::{Address, U256};

use crate::{
    interfaces::{SupplyPosition, YieldSink},
    utils::error::{ManagerError, ManagerResult},
};

/// Base asset position owned by a single strategy.
///
/// The depositer only accepts deposits and withdrawals from the strategy it was initialized
/// with. Governance keeps an escape hatch through [`YieldSink::manual_withdraw`].
pub struct Depositer {
    /// Underlying supply position
    position: Box<dyn SupplyPosition>,
    /// Governance account allowed to call the escape hatch
    governance: Address,
    /// Owning strategy
    owner: Option<Address>,
    /// Deposited and not yet withdrawn amount
    principal: U256,
}

impl Depositer {
    pub fn new(position: Box<dyn SupplyPosition>, governance: Address) -> Self {
        Self {
            position,
            governance,
            owner: None,
            principal: U256::ZERO,
        }
    }

    /// Returns a fresh, uninitialized depositer on a new account of the same market
    pub fn clone_depositer(&self) -> Self {
        Self::new(self.position.fresh_account(), self.governance)
    }

    pub fn governance(&self) -> Address {
        self.governance
    }

    fn only_owner(&self, caller: Address) -> ManagerResult<()> {
        match self.owner {
            None => Err(ManagerError::NotInitialized),
            Some(owner) if owner == caller => Ok(()),
            Some(_) => Err(ManagerError::Unauthorized),
        }
    }

    /// Withdraws up to `amount`, bounded by what the position can currently hand back
    fn withdraw_available(&mut self, amount: U256) -> ManagerResult<U256> {
        let to_withdraw = amount.min(self.withdrawable());
        if to_withdraw.is_zero() {
            return Ok(U256::ZERO);
        }

        let withdrawn = self.position.withdraw(to_withdraw)?;
        self.principal = self.principal.saturating_sub(withdrawn);
        Ok(withdrawn)
    }
}

impl YieldSink for Depositer {
    fn initialize(&mut self, owner: Address) -> ManagerResult<()> {
        if self.owner.is_some() {
            return Err(ManagerError::AlreadyInitialized);
        }
        self.owner = Some(owner);
        Ok(())
    }

    fn owner(&self) -> Option<Address> {
        self.owner
    }

    fn accrue(&mut self) -> ManagerResult<()> {
        self.position.accrue()
    }

    fn deposit(&mut self, caller: Address, amount: U256) -> ManagerResult<()> {
        self.only_owner(caller)?;
        if amount.is_zero() {
            return Ok(());
        }

        self.position.supply(amount)?;
        self.principal += amount;
        Ok(())
    }

    fn withdraw(&mut self, caller: Address, amount: U256) -> ManagerResult<U256> {
        self.only_owner(caller)?;
        self.withdraw_available(amount)
    }

    fn accrued_balance(&self) -> U256 {
        self.position.balance_of()
    }

    fn principal(&self) -> U256 {
        self.principal
    }

    fn withdrawable(&self) -> U256 {
        self.position.balance_of().min(self.position.liquidity())
    }

    fn pending_rewards(&self) -> U256 {
        self.position.rewards_owed()
    }

    fn manual_withdraw(&mut self, caller: Address) -> ManagerResult<U256> {
        if caller != self.governance {
            return Err(ManagerError::Unauthorized);
        }
        self.withdraw_available(U256::MAX)
    }
}
