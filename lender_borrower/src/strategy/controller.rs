//! The leverage controller.
//!
//! Keeps the lending market position between the target and the warning LTV, values the
//! strategy and settles profit, loss and debt payments with the vault.

use std::rc::Rc;

use alloy_primitives::{Address, U256};

use crate::{
    constants::{MAX_BPS, MAX_DELEVERAGE_ROUNDS},
    interfaces::{AccountingVault, LendingMarket, PriceOracle, TokenExchange, YieldSink},
    journal::{Journal, JournalCollection, LogType},
    types::{HarvestReport, StrategyStatusQuery, TendOutcome, WithdrawOutcome},
    utils::{
        clock::Clock,
        common::{apply_bps, u256_to_nat},
        error::{ManagerError, ManagerResult},
    },
};

use super::{
    config::{HarvestTriggerSettings, HealthCheckSettings, LeverageConfig},
    data::{StrategyData, StrategyState},
    health,
    planner::{
        collateral_to_sell, max_withdrawable_collateral, plan_free_funds, plan_rebalance,
        FreeFundsInput, RebalanceInput, RebalancePlan,
    },
    settings::{StrategySettings, StrategySettingsQuery},
    triggers::{self, VaultView},
    valuation::{Converter, Position},
};

/// Collateral and debt tracked through measured return values during a single call
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct Books {
    pub collateral: U256,
    pub debt: U256,
}

impl From<&Position> for Books {
    fn from(position: &Position) -> Self {
        Self {
            collateral: position.collateral,
            debt: position.debt,
        }
    }
}

/// Result of a debt repayment funded by loose base and the yield sink
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct RepayOutcome {
    pub repaid: U256,
    /// The yield sink held enough but could not hand it back
    pub sink_limited: bool,
}

pub struct LeverageController {
    /// Immutable wiring
    pub settings: StrategySettings,
    /// Mutable state
    pub data: StrategyData,
    pub(super) market: Box<dyn LendingMarket>,
    pub(super) sink: Box<dyn YieldSink>,
    pub(super) oracle: Rc<dyn PriceOracle>,
    pub(super) exchange: Rc<dyn TokenExchange>,
    pub(super) clock: Rc<dyn Clock>,
    pub(super) journal: Journal,
}

impl LeverageController {
    pub fn new(
        settings: StrategySettings,
        market: Box<dyn LendingMarket>,
        sink: Box<dyn YieldSink>,
        oracle: Rc<dyn PriceOracle>,
        exchange: Rc<dyn TokenExchange>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            data: StrategyData::default(),
            market,
            sink,
            oracle,
            exchange,
            clock,
            journal: Journal::default(),
        }
    }

    /// Binds the yield sink to this strategy and stores the initial configuration.
    /// Can only be called once.
    pub fn initialize(&mut self, config: LeverageConfig) -> ManagerResult<()> {
        if self.data.initialized {
            return Err(ManagerError::AlreadyInitialized);
        }
        config.validate()?;
        self.sink.initialize(self.settings.strategy)?;
        self.data.config(config);
        self.data.initialized = true;

        let mut journal = self.open_journal();
        journal.append_note(
            Ok(()),
            LogType::Configuration,
            format!("Strategy initialized with {:?}.", config),
        );
        self.journal.commit(journal);
        Ok(())
    }

    pub fn address(&self) -> Address {
        self.settings.strategy
    }

    /// Current time of the strategy's clock, denominated in seconds
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub(super) fn open_journal(&self) -> JournalCollection {
        JournalCollection::open(self.clock.now(), self.settings.strategy)
    }

    pub(super) fn authorize(&self, allowed: bool) -> ManagerResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(ManagerError::Unauthorized)
        }
    }

    pub(super) fn ensure_initialized(&self) -> ManagerResult<()> {
        if self.data.initialized {
            Ok(())
        } else {
            Err(ManagerError::NotInitialized)
        }
    }

    /// Records tokens sent to the strategy, either by the vault or directly
    pub fn receive(&mut self, token: Address, amount: U256) {
        self.data.wallet.credit(token, amount);
    }

    pub(super) fn loose_want(&self) -> U256 {
        self.data.wallet.balance_of(self.settings.tokens.want)
    }

    pub(super) fn loose_base(&self) -> U256 {
        self.data.wallet.balance_of(self.settings.tokens.base)
    }

    pub(super) fn converter(&self) -> ManagerResult<Converter> {
        Converter::load(&*self.oracle, &self.settings.tokens)
    }

    pub(super) fn position(&self, converter: &Converter) -> ManagerResult<Position> {
        Position::capture(
            &*self.market,
            &*self.sink,
            &self.data.wallet,
            &self.settings.tokens,
            converter,
        )
    }

    fn snapshot(&self) -> ManagerResult<Position> {
        self.position(&self.converter()?)
    }

    pub(super) fn accrue(&mut self) -> ManagerResult<()> {
        self.market.accrue_account()?;
        self.sink.accrue()
    }

    // Primitives. Each one keeps the wallet and the books in line with the measured amounts.

    pub(super) fn supply_collateral(&mut self, amount: U256, books: &mut Books) -> ManagerResult<()> {
        let amount = amount.min(self.loose_want());
        if amount.is_zero() {
            return Ok(());
        }
        self.market.supply(amount)?;
        self.data.wallet.debit(self.settings.tokens.want, amount)?;
        books.collateral += amount;
        Ok(())
    }

    pub(super) fn withdraw_collateral(&mut self, amount: U256, books: &mut Books) -> ManagerResult<U256> {
        let amount = amount.min(books.collateral);
        if amount.is_zero() {
            return Ok(U256::ZERO);
        }
        let withdrawn = self.market.withdraw(amount)?;
        self.data.wallet.credit(self.settings.tokens.want, withdrawn);
        books.collateral = books.collateral.saturating_sub(withdrawn);
        Ok(withdrawn)
    }

    fn borrow_base(&mut self, amount: U256, books: &mut Books) -> ManagerResult<U256> {
        if amount.is_zero() {
            return Ok(U256::ZERO);
        }
        let borrowed = self.market.borrow(amount)?;
        self.data.wallet.credit(self.settings.tokens.base, borrowed);
        books.debt += borrowed;
        Ok(borrowed)
    }

    /// Repays up to `amount` out of the loose base
    pub(super) fn repay_base(&mut self, amount: U256, books: &mut Books) -> ManagerResult<U256> {
        let amount = amount.min(self.loose_base()).min(books.debt);
        if amount.is_zero() {
            return Ok(U256::ZERO);
        }
        let repaid = self.market.repay(amount)?;
        self.data.wallet.debit(self.settings.tokens.base, repaid)?;
        books.debt = books.debt.saturating_sub(repaid);
        Ok(repaid)
    }

    pub(super) fn withdraw_from_sink(&mut self, amount: U256) -> ManagerResult<U256> {
        if amount.is_zero() {
            return Ok(U256::ZERO);
        }
        let withdrawn = self.sink.withdraw(self.settings.strategy, amount)?;
        self.data.wallet.credit(self.settings.tokens.base, withdrawn);
        Ok(withdrawn)
    }

    fn deposit_loose_base(&mut self) -> ManagerResult<U256> {
        let amount = self.loose_base();
        if amount.is_zero() {
            return Ok(U256::ZERO);
        }
        self.sink.deposit(self.settings.strategy, amount)?;
        self.data.wallet.debit(self.settings.tokens.base, amount)?;
        Ok(amount)
    }

    fn min_out(&self, value: U256) -> ManagerResult<U256> {
        let slippage = self.data.config.acceptable_slippage_bps;
        apply_bps(value, MAX_BPS.saturating_sub(slippage))
    }

    pub(super) fn sell_base(&mut self, amount: U256, converter: &Converter) -> ManagerResult<U256> {
        if amount.is_zero() {
            return Ok(U256::ZERO);
        }
        let tokens = self.settings.tokens;
        let min_out = self.min_out(converter.base_to_want(amount)?)?;
        let bought = self.exchange.swap(tokens.base, tokens.want, amount, min_out)?;
        self.data.wallet.debit(tokens.base, amount)?;
        self.data.wallet.credit(tokens.want, bought);
        Ok(bought)
    }

    fn sell_want(&mut self, amount: U256, converter: &Converter) -> ManagerResult<U256> {
        if amount.is_zero() {
            return Ok(U256::ZERO);
        }
        let tokens = self.settings.tokens;
        let min_out = self.min_out(converter.want_to_base(amount)?)?;
        let bought = self.exchange.swap(tokens.want, tokens.base, amount, min_out)?;
        self.data.wallet.debit(tokens.want, amount)?;
        self.data.wallet.credit(tokens.base, bought);
        Ok(bought)
    }

    // Compound steps

    /// Repays up to `amount` with loose base first, then with base pulled from the yield sink
    pub(super) fn repay_debt(&mut self, amount: U256, books: &mut Books) -> ManagerResult<RepayOutcome> {
        let amount = amount.min(books.debt);
        if amount.is_zero() {
            return Ok(RepayOutcome::default());
        }

        let mut repaid = self.repay_base(amount, books)?;
        let mut sink_limited = false;
        let remaining = amount - repaid;
        if !remaining.is_zero() {
            let withdrawn = self.withdraw_from_sink(remaining)?;
            sink_limited =
                withdrawn < remaining && self.sink.withdrawable() < self.sink.accrued_balance();
            repaid += self.repay_base(remaining, books)?;
        }

        Ok(RepayOutcome {
            repaid,
            sink_limited,
        })
    }

    /// Sells collateral for base and repays until the LTV computed on the collateral left after
    /// `reserved` is withdrawn reaches `target_bps`.
    /// Each round stays within the market's collateral factor, so several rounds may be needed.
    pub(super) fn deleverage_with_collateral(
        &mut self,
        books: &mut Books,
        target_bps: u64,
        reserved: U256,
        converter: &Converter,
        journal: &mut JournalCollection,
    ) -> ManagerResult<()> {
        let slippage = self.data.config.acceptable_slippage_bps;
        let collateral_factor = self.market.borrow_collateral_factor_bps();

        for round in 0..MAX_DELEVERAGE_ROUNDS {
            if books.debt.is_zero() {
                break;
            }
            let debt_in_want = converter.base_to_want_up(books.debt)?;
            let to_sell = collateral_to_sell(
                books.collateral.saturating_sub(reserved),
                debt_in_want,
                target_bps,
                slippage,
            )?;
            if to_sell.is_zero() {
                break;
            }

            let headroom =
                max_withdrawable_collateral(books.collateral, debt_in_want, collateral_factor)?;
            let amount = to_sell
                .min(headroom)
                .min(self.market.collateral_liquidity());
            if amount.is_zero() {
                journal.append_note(
                    Ok(()),
                    LogType::Rebalance,
                    "No collateral can be withdrawn to repay the remaining debt.",
                );
                break;
            }

            let withdrawn = self.withdraw_collateral(amount, books)?;
            let bought = self.sell_want(withdrawn, converter)?;
            let repaid = self.repay_base(bought, books)?;
            journal.append_note(
                Ok(()),
                LogType::Rebalance,
                format!(
                    "Round {}: sold {} want of collateral for {} base, repaid {}.",
                    round, withdrawn, bought, repaid
                ),
            );
        }
        Ok(())
    }

    /// Sells the base held on top of the debt for want
    fn realize_base_surplus(
        &mut self,
        position: &Position,
        converter: &Converter,
        journal: &mut JournalCollection,
    ) -> ManagerResult<()> {
        let surplus = position.base_surplus();
        if surplus.is_zero() || surplus < self.data.config.min_to_sell {
            return Ok(());
        }

        let loose = self.loose_base();
        if surplus > loose {
            self.withdraw_from_sink(surplus - loose)?;
        }
        let to_sell = surplus.min(self.loose_base());
        let bought = self.sell_base(to_sell, converter)?;
        journal.append_note(
            Ok(()),
            LogType::Harvest,
            format!("Sold {} base of surplus for {} want.", to_sell, bought),
        );
        Ok(())
    }

    /// Frees up to `amount_needed` loose want, repaying debt first so the remaining collateral
    /// stays at the target LTV.
    /// The bound relaxes to the warning LTV when debt may be left behind and the yield sink
    /// lacks liquidity.
    pub(super) fn free_funds(
        &mut self,
        amount_needed: U256,
        position: &Position,
        converter: &Converter,
        journal: &mut JournalCollection,
    ) -> ManagerResult<()> {
        let config = self.data.config;
        let plan = plan_free_funds(
            &FreeFundsInput {
                collateral: position.collateral,
                debt: position.debt,
                debt_in_want: position.debt_in_want,
                loose_want: position.loose_want,
                amount_needed,
                target_ltv_bps: config.target_ltv_bps,
                warning_ltv_bps: config.warning_ltv_bps,
                emergency: false,
            },
            converter,
        )?;
        if plan.repay.is_zero() && plan.withdraw.is_zero() {
            return Ok(());
        }

        let mut books = Books::from(position);
        let outcome = self.repay_debt(plan.repay, &mut books)?;
        if !config.leave_debt_behind {
            self.deleverage_with_collateral(
                &mut books,
                config.target_ltv_bps,
                plan.withdraw,
                converter,
                journal,
            )?;
        }

        let bound = if config.leave_debt_behind && outcome.sink_limited {
            config.warning_ltv_bps
        } else {
            config.target_ltv_bps
        };
        let bound = bound.min(self.market.borrow_collateral_factor_bps());
        let withdrawable = max_withdrawable_collateral(
            books.collateral,
            converter.base_to_want_up(books.debt)?,
            bound,
        )?;
        let amount = plan
            .withdraw
            .min(withdrawable)
            .min(self.market.collateral_liquidity());
        let withdrawn = self.withdraw_collateral(amount, &mut books)?;

        journal.append_note(
            Ok(()),
            LogType::Rebalance,
            format!(
                "Freed funds: repaid {} base, withdrew {} want of {} planned.",
                outcome.repaid, withdrawn, plan.withdraw
            ),
        );
        Ok(())
    }

    /// Repays all debt and withdraws all collateral and yield sink funds the markets let go of.
    /// The remaining base is sold for want when `sell_base` is set.
    pub(super) fn unwind(
        &mut self,
        sell_base: bool,
        converter: &Converter,
        journal: &mut JournalCollection,
    ) -> ManagerResult<()> {
        let position = self.position(converter)?;
        let mut books = Books::from(&position);

        self.repay_debt(books.debt, &mut books)?;
        let reserved = books.collateral;
        self.deleverage_with_collateral(&mut books, 0, reserved, converter, journal)?;

        self.withdraw_from_sink(self.sink.withdrawable())?;
        self.repay_base(books.debt, &mut books)?;

        let bound = self
            .data
            .config
            .target_ltv_bps
            .min(self.market.borrow_collateral_factor_bps());
        let withdrawable = max_withdrawable_collateral(
            books.collateral,
            converter.base_to_want_up(books.debt)?,
            bound,
        )?
        .min(self.market.collateral_liquidity());
        self.withdraw_collateral(withdrawable, &mut books)?;

        let loose_base = self.loose_base();
        if sell_base && !loose_base.is_zero() && loose_base >= self.data.config.min_to_sell {
            self.sell_base(loose_base, converter)?;
        }

        journal.append_note(
            Ok(()),
            LogType::Rebalance,
            format!(
                "Position unwound. Remaining collateral {}, remaining debt {}.",
                books.collateral, books.debt
            ),
        );
        Ok(())
    }

    /// Moves the position towards the target LTV from a fresh snapshot.
    /// `reserved` want stays loose for the vault. Returns whether anything changed.
    fn adjust_position(
        &mut self,
        reserved: U256,
        converter: &Converter,
        journal: &mut JournalCollection,
    ) -> ManagerResult<bool> {
        let config = self.data.config;
        let position = self.position(converter)?;
        let investable = position
            .loose_want
            .saturating_sub(reserved)
            .min(self.market.supply_headroom());

        let plan = plan_rebalance(
            &RebalanceInput {
                collateral: position.collateral,
                debt: position.debt,
                debt_in_want: position.debt_in_want,
                investable,
                target_ltv_bps: config.target_ltv_bps,
                warning_ltv_bps: config.warning_ltv_bps,
                collateral_factor_bps: self.market.borrow_collateral_factor_bps(),
                min_to_sell: config.min_to_sell,
                borrow_liquidity: self.market.borrow_liquidity(),
            },
            converter,
        )?;

        let mut books = Books::from(&position);
        let mut changed = true;
        match plan {
            RebalancePlan::Idle => changed = false,
            RebalancePlan::Supply { supply } => {
                self.supply_collateral(supply, &mut books)?;
            }
            RebalancePlan::Lever { supply, borrow } => {
                self.supply_collateral(supply, &mut books)?;
                self.borrow_base(borrow, &mut books)?;
            }
            RebalancePlan::Deleverage { supply, repay } => {
                self.supply_collateral(supply, &mut books)?;
                self.repay_debt(repay, &mut books)?;
                self.deleverage_with_collateral(
                    &mut books,
                    config.target_ltv_bps,
                    U256::ZERO,
                    converter,
                    journal,
                )?;
            }
        }
        if !self.deposit_loose_base()?.is_zero() {
            changed = true;
        }

        journal.append_note(
            Ok(()),
            LogType::Rebalance,
            format!(
                "Applied {:?}. Collateral {}, debt {}.",
                plan, books.collateral, books.debt
            ),
        );
        Ok(changed)
    }

    // Entry points

    /// Runs a full cycle: valuation, health check, freeing funds, settlement with the vault
    /// and leverage adjustment.
    pub fn harvest(
        &mut self,
        caller: Address,
        vault: &mut dyn AccountingVault,
    ) -> ManagerResult<HarvestReport> {
        let mut journal = self.open_journal();
        let result = self.run_harvest(caller, vault, &mut journal);
        journal.append_note(
            result.as_ref().map(|_| ()).map_err(Clone::clone),
            LogType::Harvest,
            match &result {
                Ok(report) => format!(
                    "Harvest reported a profit of {}, a loss of {} and a debt payment of {}.",
                    report.profit, report.loss, report.debt_payment
                ),
                Err(_) => "Harvest aborted.".to_string(),
            },
        );
        self.journal.commit(journal);
        result
    }

    fn run_harvest(
        &mut self,
        caller: Address,
        vault: &mut dyn AccountingVault,
        journal: &mut JournalCollection,
    ) -> ManagerResult<HarvestReport> {
        self.authorize(self.settings.roles.is_keeper(caller))?;
        self.ensure_initialized()?;

        let strategy = self.settings.strategy;
        self.accrue()?;
        let converter = self.converter()?;
        let position = self.position(&converter)?;
        let params = vault.strategy_params(strategy)?;
        let debt_outstanding = vault.debt_outstanding(strategy);
        let (profit, loss) = position.profit_and_loss(params.total_debt);

        if self.data.do_health_check {
            let check =
                health::check_report(&self.data.health_check, profit, loss, params.total_debt);
            journal.append_note(
                check.clone(),
                LogType::HealthCheck,
                format!("Health check on a profit of {} and a loss of {}.", profit, loss),
            );
            check?;
        } else {
            journal.append_note(
                Ok(()),
                LogType::HealthCheck,
                "Health check skipped for this harvest.",
            );
        }

        let emergency = !self.data.state.is_active();
        if emergency {
            self.unwind(true, &converter, journal)?;
        } else {
            self.realize_base_surplus(&position, &converter, journal)?;
            let position = self.position(&converter)?;
            self.free_funds(
                debt_outstanding.saturating_add(profit),
                &position,
                &converter,
                journal,
            )?;
        }

        let report = self.reconcile(profit, loss, debt_outstanding, params.total_debt);
        let credit = vault.report(strategy, &report)?;
        self.data.do_health_check(true);
        self.data
            .wallet
            .debit(self.settings.tokens.want, report.profit + report.debt_payment)?;
        self.receive(self.settings.tokens.want, credit);
        self.data.last_harvest(self.clock.now());

        if !emergency {
            let reserved = vault.debt_outstanding(strategy);
            self.adjust_position(reserved, &converter, journal)?;
        }
        Ok(report)
    }

    /// Splits the loose want into debt payment and profit.
    /// Profit that could not be freed is left for the next harvest. Debt outstanding that
    /// could not be freed is recognized as a loss unless debt may be left behind.
    fn reconcile(
        &self,
        profit: U256,
        loss: U256,
        debt_outstanding: U256,
        total_debt: U256,
    ) -> HarvestReport {
        let freed = self.loose_want();
        let debt_payment = debt_outstanding.min(freed);
        let profit = profit.min(freed - debt_payment);

        let unpaid = debt_outstanding - debt_payment;
        let shortfall = if self.data.config.leave_debt_behind {
            U256::ZERO
        } else {
            unpaid.saturating_sub(loss)
        };

        let mut report = HarvestReport::netted(profit, loss.saturating_add(shortfall), debt_payment);
        report.loss = report.loss.min(total_debt);
        report.debt_payment = report.debt_payment.min(total_debt - report.loss);
        report
    }

    /// Adjusts leverage without settling with the vault.
    /// Discretionary tends are deferred while the network fee is above the configured ceiling.
    pub fn tend(
        &mut self,
        caller: Address,
        vault: &dyn AccountingVault,
        base_fee: u128,
    ) -> ManagerResult<TendOutcome> {
        let mut journal = self.open_journal();
        let result = self.run_tend(caller, vault, base_fee, &mut journal);
        journal.append_note(
            result.as_ref().map(|_| ()).map_err(Clone::clone),
            LogType::Tend,
            format!("Tend finished with {:?}.", result),
        );
        self.journal.commit(journal);
        result
    }

    fn run_tend(
        &mut self,
        caller: Address,
        vault: &dyn AccountingVault,
        base_fee: u128,
        journal: &mut JournalCollection,
    ) -> ManagerResult<TendOutcome> {
        self.authorize(self.settings.roles.is_keeper(caller))?;
        self.ensure_initialized()?;
        if !self.data.state.is_active() {
            return Ok(TendOutcome::Unchanged);
        }

        let converter = self.converter()?;
        let position = self.position(&converter)?;
        let config = self.data.config;
        if !position.is_above(config.warning_ltv_bps) && base_fee > config.max_gas_price_to_tend {
            journal.append_note(
                Ok(()),
                LogType::Tend,
                format!(
                    "Base fee {} is above the tend ceiling {}.",
                    base_fee, config.max_gas_price_to_tend
                ),
            );
            return Ok(TendOutcome::Deferred);
        }

        self.accrue()?;
        let reserved = vault.debt_outstanding(self.settings.strategy);
        if self.adjust_position(reserved, &converter, journal)? {
            Ok(TendOutcome::Rebalanced)
        } else {
            Ok(TendOutcome::Unchanged)
        }
    }

    /// Frees up to `amount` want for the vault
    pub fn withdraw(&mut self, caller: Address, amount: U256) -> ManagerResult<WithdrawOutcome> {
        let mut journal = self.open_journal();
        let result = self.run_withdraw(caller, amount, &mut journal);
        journal.append_note(
            result.as_ref().map(|_| ()).map_err(Clone::clone),
            LogType::Info,
            format!("Vault withdrawal of {} finished with {:?}.", amount, result),
        );
        self.journal.commit(journal);
        result
    }

    fn run_withdraw(
        &mut self,
        caller: Address,
        amount: U256,
        journal: &mut JournalCollection,
    ) -> ManagerResult<WithdrawOutcome> {
        self.authorize(caller == self.settings.vault)?;
        self.ensure_initialized()?;

        if self.loose_want() < amount {
            self.accrue()?;
            let converter = self.converter()?;
            let position = self.position(&converter)?;
            self.free_funds(amount, &position, &converter, journal)?;
        }

        let freed = amount.min(self.loose_want());
        let loss = if self.data.config.leave_debt_behind {
            U256::ZERO
        } else {
            amount - freed
        };
        self.data.wallet.debit(self.settings.tokens.want, freed)?;
        Ok(WithdrawOutcome { freed, loss })
    }

    // Configuration

    /// Replaces the leverage configuration. Invalid configurations leave the current one in place.
    pub fn set_leverage_config(&mut self, caller: Address, config: LeverageConfig) -> ManagerResult<()> {
        self.authorize(self.settings.roles.is_strategist(caller))?;
        let result = config.validate();
        let mut journal = self.open_journal();
        journal.append_note(
            result.clone(),
            LogType::Configuration,
            format!("Leverage configuration update to {:?}.", config),
        );
        self.journal.commit(journal);
        result?;

        self.data.config(config);
        Ok(())
    }

    /// Switches the strategy to emergency exit and revokes it from the vault.
    /// The next harvest unwinds the position.
    pub fn set_emergency_exit(
        &mut self,
        caller: Address,
        vault: &mut dyn AccountingVault,
    ) -> ManagerResult<()> {
        self.authorize(self.settings.roles.is_emergency_authorized(caller))?;
        if self.data.state == StrategyState::EmergencyExiting {
            return Ok(());
        }
        vault.revoke_strategy(self.settings.strategy)?;
        self.data.state = StrategyState::EmergencyExiting;

        let mut journal = self.open_journal();
        journal.append_note(Ok(()), LogType::Configuration, "Emergency exit enabled.");
        self.journal.commit(journal);
        Ok(())
    }

    pub fn set_do_health_check(&mut self, caller: Address, do_health_check: bool) -> ManagerResult<()> {
        self.authorize(self.settings.roles.is_management(caller))?;
        self.data.do_health_check(do_health_check);
        Ok(())
    }

    pub fn set_health_check_limits(
        &mut self,
        caller: Address,
        settings: HealthCheckSettings,
    ) -> ManagerResult<()> {
        self.authorize(self.settings.roles.is_management(caller))?;
        settings.validate()?;
        self.data.health_check(settings);
        Ok(())
    }

    pub fn set_harvest_trigger(
        &mut self,
        caller: Address,
        settings: HarvestTriggerSettings,
    ) -> ManagerResult<()> {
        self.authorize(self.settings.roles.is_management(caller))?;
        settings.validate()?;
        self.data.harvest_trigger(settings);
        Ok(())
    }

    // Views. Interest is projected, nothing is mutated.

    pub fn estimated_total_assets(&self) -> ManagerResult<U256> {
        Ok(self.snapshot()?.estimated_total_assets())
    }

    pub fn balance_of_want(&self) -> U256 {
        self.loose_want()
    }

    pub fn balance_of_collateral(&self) -> U256 {
        self.market.collateral_balance_of()
    }

    pub fn balance_of_debt(&self) -> U256 {
        self.market.borrow_balance_of()
    }

    pub fn balance_of_yield_sink(&self) -> U256 {
        self.sink.accrued_balance()
    }

    /// Debt that the yield sink and the loose base do not cover, denominated in base
    pub fn base_token_owed_balance(&self) -> U256 {
        self.balance_of_debt().saturating_sub(
            self.balance_of_yield_sink()
                .saturating_add(self.loose_base()),
        )
    }

    pub fn rewards_in_want(&self) -> ManagerResult<U256> {
        Ok(self.snapshot()?.rewards_in_want)
    }

    pub fn current_ltv(&self) -> ManagerResult<u64> {
        Ok(self.snapshot()?.ltv_bps)
    }

    pub fn tend_trigger(&self, base_fee: u128) -> ManagerResult<bool> {
        Ok(triggers::tend_trigger(
            &self.snapshot()?,
            &self.data.config,
            self.data.state,
            base_fee,
        ))
    }

    pub fn harvest_trigger(&self, vault: &dyn AccountingVault, base_fee: u128) -> ManagerResult<bool> {
        let strategy = self.settings.strategy;
        let view = VaultView {
            params: vault.strategy_params(strategy)?,
            debt_outstanding: vault.debt_outstanding(strategy),
            credit_available: vault.credit_available(strategy),
        };
        Ok(triggers::harvest_trigger(
            &self.snapshot()?,
            &view,
            &self.data.harvest_trigger,
            self.clock.now(),
            base_fee,
        ))
    }

    pub fn settings_query(&self) -> ManagerResult<StrategySettingsQuery> {
        StrategySettingsQuery::try_from(self.settings.clone())
    }

    pub fn status(&self) -> ManagerResult<StrategyStatusQuery> {
        let position = self.snapshot()?;
        Ok(StrategyStatusQuery {
            strategy: self.settings.strategy.to_string(),
            state: self.data.state.to_string(),
            estimated_total_assets: u256_to_nat(&position.estimated_total_assets())?,
            loose_want: u256_to_nat(&position.loose_want)?,
            collateral: u256_to_nat(&position.collateral)?,
            debt: u256_to_nat(&position.debt)?,
            yield_sink: u256_to_nat(&position.yield_sink)?,
            base_token_owed: u256_to_nat(&position.base_token_owed())?,
            rewards_in_want: u256_to_nat(&position.rewards_in_want)?,
            ltv_bps: position.ltv_bps,
            target_ltv_bps: self.data.config.target_ltv_bps,
            warning_ltv_bps: self.data.config.warning_ltv_bps,
        })
    }
}
