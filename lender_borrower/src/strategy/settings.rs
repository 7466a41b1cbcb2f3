//! Strategy settings wired once at clone time

use alloy_primitives::Address;
use candid::CandidType;

use crate::utils::error::ManagerError;

/// Tokens handled by a strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenSet {
    /// Asset lent by the vault, supplied as collateral
    pub want: Address,
    /// Asset borrowed from the lending market
    pub base: Address,
    /// Token distributed as lending market rewards
    pub reward: Address,
    pub want_decimals: u8,
    pub base_decimals: u8,
    pub reward_decimals: u8,
}

/// Accounts allowed to operate a strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Roles {
    pub governance: Address,
    pub management: Address,
    pub strategist: Address,
    pub keeper: Address,
    pub guardian: Address,
}

impl Roles {
    /// Accounts that can harvest and tend
    pub fn is_keeper(&self, caller: Address) -> bool {
        caller == self.keeper
            || caller == self.strategist
            || caller == self.management
            || caller == self.governance
    }

    /// Accounts that can change the leverage configuration
    pub fn is_strategist(&self, caller: Address) -> bool {
        caller == self.strategist || caller == self.governance
    }

    /// Accounts that can trigger the emergency exit
    pub fn is_emergency_authorized(&self, caller: Address) -> bool {
        caller == self.strategist
            || caller == self.guardian
            || caller == self.management
            || caller == self.governance
    }

    /// Accounts that can operate the health check
    pub fn is_management(&self, caller: Address) -> bool {
        caller == self.management || caller == self.governance
    }

    pub fn is_governance(&self, caller: Address) -> bool {
        caller == self.governance
    }
}

/// Settings shared by a strategy and its clones. Set once, never mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct StrategySettings {
    /// Address of the strategy itself
    pub strategy: Address,
    /// Vault lending want to the strategy
    pub vault: Address,
    /// Share token of the vault
    pub share_token: Address,
    pub tokens: TokenSet,
    pub roles: Roles,
}

impl StrategySettings {
    /// Sets the address of the strategy.
    pub fn strategy(&mut self, strategy: Address) -> &mut Self {
        self.strategy = strategy;
        self
    }

    /// Sets the vault address.
    pub fn vault(&mut self, vault: Address) -> &mut Self {
        self.vault = vault;
        self
    }

    /// Sets the vault share token.
    pub fn share_token(&mut self, share_token: Address) -> &mut Self {
        self.share_token = share_token;
        self
    }

    /// Sets the handled tokens.
    pub fn tokens(&mut self, tokens: TokenSet) -> &mut Self {
        self.tokens = tokens;
        self
    }

    /// Sets the operating accounts.
    pub fn roles(&mut self, roles: Roles) -> &mut Self {
        self.roles = roles;
        self
    }
}

#[derive(Clone, Default, CandidType)]
pub struct StrategySettingsQuery {
    pub strategy: String,
    pub vault: String,
    pub share_token: String,
    pub want: String,
    pub base: String,
    pub reward: String,
    pub governance: String,
    pub strategist: String,
    pub keeper: String,
}

impl TryFrom<StrategySettings> for StrategySettingsQuery {
    type Error = ManagerError;

    fn try_from(value: StrategySettings) -> Result<Self, Self::Error> {
        Ok(Self {
            strategy: value.strategy.to_string(),
            vault: value.vault.to_string(),
            share_token: value.share_token.to_string(),
            want: value.tokens.want.to_string(),
            base: value.tokens.base.to_string(),
            reward: value.tokens.reward.to_string(),
            governance: value.roles.governance.to_string(),
            strategist: value.roles.strategist.to_string(),
            keeper: value.roles.keeper.to_string(),
        })
    }
}
