pub mod config;
pub mod contract;
pub mod error;
pub mod portfolio;
pub mod prices;
pub mod progress;
pub mod tokens;
pub mod units;
