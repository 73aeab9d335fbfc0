use serde::{Deserialize, Serialize};

/// Gain/loss summary over a set of holdings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Σ shares × current price
    pub current_total: f64,

    /// Σ shares × purchase price
    pub cost_total: f64,

    /// current_total - cost_total
    pub gain_loss: f64,

    /// gain_loss / cost_total × 100, or 0 when nothing was invested
    pub gain_loss_percent: f64,

    /// Per-holding breakdown, largest allocation first
    pub holdings: Vec<HoldingPerformance>,
}

/// Performance of a single holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingPerformance {
    pub symbol: String,
    pub current_value: f64,
    pub cost_basis: f64,
    pub gain_loss: f64,
    pub return_pct: f64,

    /// This holding's value / total value × 100
    pub allocation_pct: f64,
}
