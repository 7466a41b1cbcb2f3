mod constants;
mod depositer;
mod interfaces;
mod journal;
mod keeper;
mod strategy;
mod types;
mod utils;

#[cfg(test)]
mod simulation;

pub use depositer::Depositer;
pub use interfaces::{
    AccountingVault, LendingMarket, PriceOracle, SupplyPosition, TokenExchange, YieldSink,
};
pub use journal::{Journal, JournalEntry, LogType};
pub use keeper::{Keeper, KeeperAction};
pub use strategy::{
    config::{HarvestTriggerSettings, HealthCheckSettings, LeverageConfig},
    data::StrategyState,
    settings::{Roles, StrategySettings, StrategySettingsQuery, TokenSet},
    LeverageController, StrategyTemplate,
};
pub use types::{
    HarvestReport, HarvestReportQuery, StrategyParams, StrategyStatusQuery, TendOutcome,
    WithdrawOutcome,
};
pub use utils::{
    clock::{Clock, SystemClock},
    error::{ManagerError, ManagerResult},
};
