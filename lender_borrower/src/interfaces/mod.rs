//! Capability interfaces of the collaborators the strategy talks to.
//!
//! Each collaborator is consumed through a trait so that the leverage algorithm is written
//! once and can run against any adapter, including the in-memory simulation used in tests.

pub mod exchange;
pub mod market;
pub mod oracle;
pub mod vault;
pub mod yield_sink;

pub use exchange::TokenExchange;
pub use market::LendingMarket;
pub use oracle::PriceOracle;
pub use vault::AccountingVault;
pub use yield_sink::{SupplyPosition, YieldSink};
