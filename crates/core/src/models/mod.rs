pub mod analysis;
pub mod contract;
pub mod liquidity;
pub mod performance;
pub mod plan;
pub mod portfolio;
pub mod settings;
pub mod strategy;
