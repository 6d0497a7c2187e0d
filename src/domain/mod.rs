//! Core domain types and logic.

pub mod candidate;
pub mod config_validation;
pub mod driver;
pub mod error;
pub mod holdings;
pub mod portfolio;
pub mod ranking;
pub mod rebalance;
pub mod selector;
pub mod table;
pub mod transform;
