pub mod config;
pub mod data;
pub mod health;
pub mod planner;
pub mod settings;
pub mod triggers;
pub mod valuation;

mod controller;
mod manual;
mod migration;


pub use controller::LeverageController;
pub use migration::StrategyTemplate;
