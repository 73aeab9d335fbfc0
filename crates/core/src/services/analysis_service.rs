use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::analysis::{ExecutiveAnalysisResult, PotentialReturns, RiskLevel};
use crate::models::portfolio::PortfolioItem;
use crate::models::settings::Settings;
use crate::models::strategy::{AnalysisStrategy, RiskTolerance};
use crate::providers::latency::UniformLatency;
use crate::providers::outlook::RandomOutlook;
use crate::providers::traits::{LatencyModel, OutlookProvider};
use super::analysis_rules::{
    AnalysisContext, RuleBook, HIGH_VOLATILITY_THRESHOLD, LOW_VOLATILITY_THRESHOLD,
};
use super::cancellation::CancellationToken;

/// Number of sectors that counts as fully diversified.
pub const REFERENCE_SECTOR_COUNT: usize = 11;

/// Annual base return that the risk multipliers scale.
pub const BASE_RETURN: f64 = 0.06;

/// Produces executive analyses of a portfolio under a strategy.
///
/// Models the external advisory call: waits a simulated latency (the one
/// suspension point) while watching the cancellation token, re-checks the
/// token once the wait is over, then computes the result. Everything but the
/// market outlook is a deterministic function of the inputs.
pub struct AnalysisSimulator {
    latency: Arc<dyn LatencyModel>,
    outlook: Arc<dyn OutlookProvider>,
    rules: RuleBook,
}

impl AnalysisSimulator {
    pub fn new(latency: Arc<dyn LatencyModel>, outlook: Arc<dyn OutlookProvider>) -> Self {
        Self {
            latency,
            outlook,
            rules: RuleBook::default(),
        }
    }

    /// Uniform latency from the settings bounds and a random outlook.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Arc::new(UniformLatency::from_millis(
                settings.min_latency_ms,
                settings.max_latency_ms,
            )),
            Arc::new(RandomOutlook::new()),
        )
    }

    /// Replace the insight / recommendation / risk-factor rules.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleBook) -> Self {
        self.rules = rules;
        self
    }

    /// Run one analysis.
    ///
    /// Input errors are returned before any waiting. Cancellation observed
    /// during or right after the wait yields `CoreError::Aborted`.
    pub async fn analyze(
        &self,
        items: &[PortfolioItem],
        strategy: Option<&AnalysisStrategy>,
        token: &CancellationToken,
    ) -> Result<ExecutiveAnalysisResult, CoreError> {
        let strategy = validate_inputs(items, strategy)?;

        let delay = self.latency.next_delay();
        debug!(
            latency = self.latency.name(),
            delay_ms = delay.as_millis() as u64,
            "simulating analysis latency"
        );

        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(CoreError::Aborted),
            _ = tokio::time::sleep(delay) => {}
        }

        // The timer may have fired in the same tick as the cancellation.
        if token.is_cancelled() {
            return Err(CoreError::Aborted);
        }

        self.evaluate(items, strategy)
    }

    /// The synchronous part of an analysis: no latency, no cancellation.
    pub fn evaluate(
        &self,
        items: &[PortfolioItem],
        strategy: &AnalysisStrategy,
    ) -> Result<ExecutiveAnalysisResult, CoreError> {
        if items.is_empty() {
            return Err(CoreError::EmptyPortfolio);
        }
        if let Some(bad) = items
            .iter()
            .find(|i| !i.weight.is_finite() || !i.change_percent.is_finite())
        {
            return Err(CoreError::Analysis(format!(
                "non-finite weight or change for {}",
                bad.symbol
            )));
        }

        let weighted_volatility = weighted_volatility(items);
        let diversification_score = diversification_score(items);
        let risk_level = classify_risk(strategy.risk_tolerance, weighted_volatility);

        let ctx = AnalysisContext {
            items,
            strategy,
            weighted_volatility,
            diversification_score,
            risk_level,
        };

        Ok(ExecutiveAnalysisResult {
            overall_risk: risk_level,
            diversification_score,
            key_insights: RuleBook::evaluate(&self.rules.insights, &ctx),
            recommendations: RuleBook::evaluate(&self.rules.recommendations, &ctx),
            potential_returns: potential_returns(risk_level),
            risk_factors: RuleBook::evaluate(&self.rules.risk_factors, &ctx),
            market_outlook: self.outlook.outlook(),
            last_updated: Utc::now(),
        })
    }
}

fn validate_inputs<'a>(
    items: &[PortfolioItem],
    strategy: Option<&'a AnalysisStrategy>,
) -> Result<&'a AnalysisStrategy, CoreError> {
    if items.is_empty() {
        return Err(CoreError::EmptyPortfolio);
    }
    strategy.ok_or(CoreError::MissingStrategy)
}

/// `Σ weight × |change_percent|`. Weights are used as given.
pub fn weighted_volatility(items: &[PortfolioItem]) -> f64 {
    items
        .iter()
        .map(|i| i.weight * i.change_percent.abs())
        .sum()
}

/// `round(min(100, distinct_sectors / 11 × 100))`.
///
/// Sector labels compare case-insensitively; items without one don't count.
pub fn diversification_score(items: &[PortfolioItem]) -> u8 {
    let sectors: HashSet<String> = items
        .iter()
        .filter_map(|i| i.sector.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect();
    let score = sectors.len() as f64 / REFERENCE_SECTOR_COUNT as f64 * 100.0;
    score.min(100.0).round() as u8
}

/// Declared tolerance wins; a moderate profile falls back on volatility.
pub fn classify_risk(tolerance: RiskTolerance, weighted_volatility: f64) -> RiskLevel {
    match tolerance {
        RiskTolerance::Aggressive => RiskLevel::High,
        RiskTolerance::Conservative => RiskLevel::Low,
        RiskTolerance::Moderate if weighted_volatility < LOW_VOLATILITY_THRESHOLD => RiskLevel::Low,
        RiskTolerance::Moderate if weighted_volatility > HIGH_VOLATILITY_THRESHOLD => RiskLevel::High,
        RiskTolerance::Moderate => RiskLevel::Medium,
    }
}

/// Conservative / expected / optimistic multipliers of `BASE_RETURN` per risk level.
pub fn return_multipliers(level: RiskLevel) -> [f64; 3] {
    match level {
        RiskLevel::Low => [0.6, 0.9, 1.2],
        RiskLevel::Medium => [0.8, 1.2, 1.6],
        RiskLevel::High => [0.7, 1.5, 2.5],
    }
}

pub fn potential_returns(level: RiskLevel) -> PotentialReturns {
    let [conservative, expected, optimistic] = return_multipliers(level);
    PotentialReturns {
        conservative: BASE_RETURN * conservative,
        expected: BASE_RETURN * expected,
        optimistic: BASE_RETURN * optimistic,
    }
}
