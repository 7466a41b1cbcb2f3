//! Governance operations bypassing the rebalance algorithm

use alloy_primitives::{Address, U256};

use crate::{
    journal::LogType,
    utils::error::{ManagerError, ManagerResult},
};

use super::controller::{Books, LeverageController};

impl LeverageController {
    /// Withdraws `amount` base from the yield sink and repays debt with it.
    /// Rejects amounts above what the yield sink can currently hand back.
    pub fn manual_withdraw_and_repay_debt(
        &mut self,
        caller: Address,
        amount: U256,
    ) -> ManagerResult<U256> {
        self.authorize(self.settings.roles.is_governance(caller))?;
        self.ensure_initialized()?;
        self.accrue()?;

        let available = self.sink.withdrawable();
        if amount > available {
            return Err(ManagerError::ExceedsWithdrawable {
                requested: amount.to_string(),
                available: available.to_string(),
            });
        }

        let mut books = Books {
            collateral: self.market.collateral_balance_of(),
            debt: self.market.borrow_balance_of(),
        };
        let withdrawn = self.withdraw_from_sink(amount)?;
        let repaid = self.repay_base(withdrawn, &mut books)?;

        let mut journal = self.open_journal();
        journal.append_note(
            Ok(()),
            LogType::Manual,
            format!(
                "Manually withdrew {} base from the yield sink and repaid {}.",
                withdrawn, repaid
            ),
        );
        self.journal.commit(journal);
        Ok(repaid)
    }

    /// Hands an unrelated token held by the strategy over to governance.
    /// Returns the swept amount.
    pub fn sweep(&mut self, caller: Address, token: Address) -> ManagerResult<U256> {
        self.authorize(self.settings.roles.is_governance(caller))?;

        let tokens = self.settings.tokens;
        if token == tokens.want {
            return Err(ManagerError::ProtectedToken("!want".to_string()));
        }
        if token == self.settings.share_token {
            return Err(ManagerError::ProtectedToken("!shares".to_string()));
        }
        if token == tokens.base || token == tokens.reward {
            return Err(ManagerError::ProtectedToken("!protected".to_string()));
        }

        let amount = self.data.wallet.take_all(token);
        let mut journal = self.open_journal();
        journal.append_note(
            Ok(()),
            LogType::Manual,
            format!("Swept {} of token {} to governance.", amount, token),
        );
        self.journal.commit(journal);
        Ok(amount)
    }
}
