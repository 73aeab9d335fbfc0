pub mod analysis_coordinator;
pub mod analysis_rules;
pub mod analysis_service;
pub mod cancellation;
pub mod contract_service;
pub mod liquidity_service;
pub mod performance_service;
pub mod projection_service;
