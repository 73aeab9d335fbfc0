pub mod traits;

// Provider implementations
pub mod latency;
pub mod outlook;
