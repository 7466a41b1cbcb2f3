//! In-memory collaborators used by the scenario tests.
//!
//! Each collaborator keeps its books behind `Rc<RefCell<_>>` so tests can move prices, charge
//! interest or drain liquidity between two calls to the strategy.

pub mod exchange;
pub mod oracle;
pub mod vault;
