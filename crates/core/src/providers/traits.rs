use std::time::Duration;

/// Source of the market-outlook paragraph attached to every analysis.
///
/// The outlook is the only non-deterministic field of the result. Injecting
/// the source lets tests substitute a fixed one and assert determinism.
pub trait OutlookProvider: Send + Sync {
    /// Human-readable name of this provider (for logs).
    fn name(&self) -> &str;

    /// Produce the outlook text for the next analysis.
    fn outlook(&self) -> String;
}

/// Models the latency of the external analysis call.
///
/// Called once per analysis run, before the single suspension point.
pub trait LatencyModel: Send + Sync {
    fn name(&self) -> &str;

    /// Delay to wait before the next analysis completes.
    fn next_delay(&self) -> Duration;
}
