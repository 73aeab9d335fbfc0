use crate::models::performance::{HoldingPerformance, PerformanceSummary};
use crate::models::portfolio::Holding;

/// Computes portfolio gain/loss, returns and allocation breakdown.
///
/// Pure arithmetic over the supplied holdings. Every ratio is guarded
/// against a zero denominator and reports 0 in that case.
pub struct PerformanceService;

impl PerformanceService {
    pub fn new() -> Self {
        Self
    }

    /// Summarize a set of holdings.
    ///
    /// - `current_total = Σ shares × current_price`
    /// - `cost_total = Σ shares × purchase_price`
    /// - `gain_loss = current_total - cost_total`
    /// - `gain_loss_percent = gain_loss / cost_total × 100` (0 if nothing invested)
    pub fn summarize(&self, holdings: &[Holding]) -> PerformanceSummary {
        let current_total: f64 = holdings.iter().map(Holding::current_value).sum();
        let cost_total: f64 = holdings.iter().map(Holding::cost_basis).sum();
        let gain_loss = current_total - cost_total;

        let mut breakdown: Vec<HoldingPerformance> = holdings
            .iter()
            .map(|h| {
                let current_value = h.current_value();
                let cost_basis = h.cost_basis();
                let gain_loss = current_value - cost_basis;
                HoldingPerformance {
                    symbol: h.symbol.clone(),
                    current_value,
                    cost_basis,
                    gain_loss,
                    return_pct: percent_of(gain_loss, cost_basis),
                    allocation_pct: percent_of(current_value, current_total),
                }
            })
            .collect();

        // Largest allocation first
        breakdown.sort_by(|a, b| {
            b.allocation_pct
                .partial_cmp(&a.allocation_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        PerformanceSummary {
            current_total,
            cost_total,
            gain_loss,
            gain_loss_percent: percent_of(gain_loss, cost_total),
            holdings: breakdown,
        }
    }

    /// Percentage allocation of each value against the total of all values.
    /// All zeros if the total is not positive.
    pub fn allocations(&self, values: &[f64]) -> Vec<f64> {
        let total: f64 = values.iter().sum();
        values.iter().map(|v| percent_of(*v, total)).collect()
    }
}

impl Default for PerformanceService {
    fn default() -> Self {
        Self::new()
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
