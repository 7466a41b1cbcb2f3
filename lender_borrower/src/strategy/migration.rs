//! Cloning of strategies and migration of a position to a clone

use std::rc::Rc;

use alloy_primitives::Address;

use crate::{
    depositer::Depositer,
    interfaces::{AccountingVault, LendingMarket, PriceOracle, TokenExchange},
    journal::{JournalCollection, LogType},
    utils::{
        clock::Clock,
        error::{ManagerError, ManagerResult},
    },
};

use super::{config::LeverageConfig, controller::LeverageController, settings::StrategySettings};

/// Wiring shared by every strategy cloned from it
pub struct StrategyTemplate {
    pub settings: StrategySettings,
    market: Box<dyn LendingMarket>,
    depositer: Depositer,
    oracle: Rc<dyn PriceOracle>,
    exchange: Rc<dyn TokenExchange>,
    clock: Rc<dyn Clock>,
}

impl StrategyTemplate {
    pub fn new(
        settings: StrategySettings,
        market: Box<dyn LendingMarket>,
        depositer: Depositer,
        oracle: Rc<dyn PriceOracle>,
        exchange: Rc<dyn TokenExchange>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            market,
            depositer,
            oracle,
            exchange,
            clock,
        }
    }

    /// Creates an initialized strategy at `strategy`, paired with a fresh depositer and a fresh
    /// lending market account, using the default leverage configuration.
    pub fn clone_strategy(&self, strategy: Address) -> ManagerResult<LeverageController> {
        let mut settings = self.settings.clone();
        settings.strategy(strategy);
        let config = LeverageConfig::for_base_decimals(settings.tokens.base_decimals);

        let mut controller = LeverageController::new(
            settings,
            self.market.fresh_account(),
            Box::new(self.depositer.clone_depositer()),
            Rc::clone(&self.oracle),
            Rc::clone(&self.exchange),
            Rc::clone(&self.clock),
        );
        controller.initialize(config)?;
        Ok(controller)
    }
}

impl LeverageController {
    /// Hands the whole position over to `new`.
    /// This strategy unwinds first. The vault moves the debt and the debt ratio only once
    /// nothing is left in the market or the yield sink, then the loose want and base follow.
    pub fn migrate(
        &mut self,
        caller: Address,
        new: &mut LeverageController,
        vault: &mut dyn AccountingVault,
    ) -> ManagerResult<()> {
        self.authorize(self.settings.roles.is_governance(caller))?;
        self.ensure_initialized()?;
        new.ensure_initialized()?;
        if new.settings.tokens != self.settings.tokens {
            return Err(ManagerError::InvalidConfig(
                "The new strategy handles different tokens.".to_string(),
            ));
        }

        let mut journal = self.open_journal();
        let result = self.hand_over(new, vault, &mut journal);
        journal.append_note(
            result.clone(),
            LogType::Manual,
            format!("Migration to {} finished with {:?}.", new.address(), result),
        );
        self.journal.commit(journal);
        result
    }

    fn hand_over(
        &mut self,
        new: &mut LeverageController,
        vault: &mut dyn AccountingVault,
        journal: &mut JournalCollection,
    ) -> ManagerResult<()> {
        self.accrue()?;
        let converter = self.converter()?;
        self.unwind(false, &converter, journal)?;

        let collateral = self.balance_of_collateral();
        let debt = self.balance_of_debt();
        let sink = self.balance_of_yield_sink();
        if !collateral.is_zero() || !debt.is_zero() || !sink.is_zero() {
            return Err(ManagerError::Market(format!(
                "Position could not be fully unwound: collateral {}, debt {}, yield sink {}.",
                collateral, debt, sink
            )));
        }

        vault.migrate_strategy(self.address(), new.address())?;

        let tokens = self.settings.tokens;
        let want = self.data.wallet.take_all(tokens.want);
        let base = self.data.wallet.take_all(tokens.base);
        new.receive(tokens.want, want);
        new.receive(tokens.base, base);

        journal.append_note(
            Ok(()),
            LogType::Manual,
            format!("Transferred {} want and {} base.", want, base),
        );
        Ok(())
    }
}
