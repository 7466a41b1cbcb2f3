//! Keeper loop deciding between a harvest and a tend

use alloy_primitives::Address;

use crate::{
    constants::MAX_RETRY_ATTEMPTS,
    interfaces::AccountingVault,
    journal::{Journal, JournalCollection, LogType},
    strategy::LeverageController,
    types::{HarvestReport, TendOutcome},
    utils::error::{ManagerError, ManagerResult},
};

/// Action taken by a keeper cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeeperAction {
    Harvest(HarvestReport),
    Tend(TendOutcome),
    Idle,
}

/// Calls the strategy when its triggers fire. Transient failures are retried.
pub struct Keeper {
    account: Address,
    journal: Journal,
}

impl Keeper {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            journal: Journal::default(),
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Runs one keeper cycle. A due harvest takes precedence over a tend.
    pub fn run_cycle(
        &mut self,
        strategy: &mut LeverageController,
        vault: &mut dyn AccountingVault,
        base_fee: u128,
    ) -> ManagerResult<KeeperAction> {
        let mut journal = JournalCollection::open(strategy.now(), strategy.address());

        let result = if strategy.harvest_trigger(&*vault, base_fee)? {
            self.retry(&mut journal, "Harvest", || {
                strategy
                    .harvest(self.account, &mut *vault)
                    .map(KeeperAction::Harvest)
            })
        } else if strategy.tend_trigger(base_fee)? {
            self.retry(&mut journal, "Tend", || {
                strategy
                    .tend(self.account, &*vault, base_fee)
                    .map(KeeperAction::Tend)
            })
        } else {
            journal.append_note(Ok(()), LogType::Info, "No trigger fired.");
            Ok(KeeperAction::Idle)
        };

        self.journal.commit(journal);
        result
    }

    fn retry<F>(
        &self,
        journal: &mut JournalCollection,
        action: &str,
        mut attempt: F,
    ) -> ManagerResult<KeeperAction>
    where
        F: FnMut() -> ManagerResult<KeeperAction>,
    {
        let mut last_error = ManagerError::NonExistentValue;
        for turn in 0..MAX_RETRY_ATTEMPTS {
            let result = attempt();

            journal.append_turn(
                result.as_ref().map(|_| ()).map_err(Clone::clone),
                turn,
                format!(
                    "{} attempt is finished. Attempt {}/{}",
                    action,
                    turn,
                    MAX_RETRY_ATTEMPTS - 1
                ),
            );

            match result {
                Ok(action) => return Ok(action),
                Err(err) if err.is_permanent() => return Err(err),
                Err(err) => last_error = err,
            }
        }
        Err(last_error)
    }
}
