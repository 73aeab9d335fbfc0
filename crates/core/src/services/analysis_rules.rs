use crate::models::analysis::RiskLevel;
use crate::models::portfolio::PortfolioItem;
use crate::models::strategy::{AnalysisStrategy, RiskTolerance, TimeHorizon};

/// Weighted volatility below this is "low" (percent points).
pub const LOW_VOLATILITY_THRESHOLD: f64 = 2.0;

/// Weighted volatility above this is "high" (percent points).
pub const HIGH_VOLATILITY_THRESHOLD: f64 = 5.0;

/// A holding above this weight is a concentration warning.
pub const CONCENTRATION_WEIGHT: f64 = 0.30;

/// A holding that fell more than this (percent) is a drawdown.
pub const DRAWDOWN_PERCENT: f64 = -10.0;

/// Everything the rules look at, computed once per run.
#[derive(Debug)]
pub struct AnalysisContext<'a> {
    pub items: &'a [PortfolioItem],
    pub strategy: &'a AnalysisStrategy,
    pub weighted_volatility: f64,
    pub diversification_score: u8,
    pub risk_level: RiskLevel,
}

impl AnalysisContext<'_> {
    pub fn max_weight(&self) -> f64 {
        self.items.iter().map(|i| i.weight).fold(0.0, f64::max)
    }

    pub fn has_drawdown(&self) -> bool {
        self.items.iter().any(|i| i.change_percent < DRAWDOWN_PERCENT)
    }

    fn tolerance(&self) -> RiskTolerance {
        self.strategy.risk_tolerance
    }

    fn horizon(&self) -> TimeHorizon {
        self.strategy.time_horizon
    }

    fn focus_any(&self, areas: &[&str]) -> bool {
        areas.iter().any(|a| self.strategy.has_focus(a))
    }
}

/// A predicate → message pair.
#[derive(Clone)]
pub struct Rule {
    pub predicate: fn(&AnalysisContext<'_>) -> bool,
    pub message: String,
}

impl Rule {
    pub fn new(predicate: fn(&AnalysisContext<'_>) -> bool, message: impl Into<String>) -> Self {
        Self {
            predicate,
            message: message.into(),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

/// The three ordered rule lists used to assemble insights, recommendations
/// and risk factors. Order of the lists is the order of the output.
#[derive(Debug, Clone)]
pub struct RuleBook {
    pub insights: Vec<Rule>,
    pub recommendations: Vec<Rule>,
    pub risk_factors: Vec<Rule>,
}

impl RuleBook {
    /// Messages of every matching rule, in rule order.
    pub fn evaluate(rules: &[Rule], ctx: &AnalysisContext<'_>) -> Vec<String> {
        rules
            .iter()
            .filter(|r| (r.predicate)(ctx))
            .map(|r| r.message.clone())
            .collect()
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self {
            insights: vec![
                Rule::new(
                    |c| c.diversification_score >= 70,
                    "Your portfolio is well diversified across sectors.",
                ),
                Rule::new(
                    |c| (40..70).contains(&c.diversification_score),
                    "Your portfolio has moderate sector diversification.",
                ),
                Rule::new(
                    |c| c.diversification_score < 40,
                    "Your portfolio is concentrated in a small number of sectors.",
                ),
                Rule::new(
                    |c| c.weighted_volatility > HIGH_VOLATILITY_THRESHOLD,
                    "Recent price movements of your holdings are above average.",
                ),
                Rule::new(
                    |c| c.weighted_volatility < LOW_VOLATILITY_THRESHOLD,
                    "Your holdings have shown low recent volatility.",
                ),
                Rule::new(
                    |c| c.max_weight() > CONCENTRATION_WEIGHT,
                    "A single position represents more than 30% of the portfolio.",
                ),
                Rule::new(
                    |c| c.horizon() == TimeHorizon::Long,
                    "A long time horizon allows you to ride out short-term volatility.",
                ),
                Rule::new(
                    |c| c.horizon() == TimeHorizon::Short,
                    "A short time horizon favors capital preservation over growth.",
                ),
            ],
            recommendations: vec![
                Rule::new(
                    |c| c.diversification_score < 40,
                    "Add exposure to additional sectors to reduce concentration.",
                ),
                Rule::new(
                    |c| c.max_weight() > CONCENTRATION_WEIGHT,
                    "Consider trimming your largest position to limit single-asset risk.",
                ),
                Rule::new(
                    |c| {
                        c.tolerance() == RiskTolerance::Conservative
                            && c.weighted_volatility > HIGH_VOLATILITY_THRESHOLD
                    },
                    "Reduce volatile holdings to match your conservative profile.",
                ),
                Rule::new(
                    |c| {
                        c.tolerance() == RiskTolerance::Aggressive
                            && c.horizon() == TimeHorizon::Long
                    },
                    "Increase allocation to growth assets to take advantage of your long horizon.",
                ),
                Rule::new(
                    |c| c.focus_any(&["esg", "sustainability"]),
                    "Review the ESG ratings of your holdings and favor sustainable funds.",
                ),
                Rule::new(
                    |c| c.focus_any(&["dividends", "income"]),
                    "Consider dividend-paying stocks and fixed income for steady cash flow.",
                ),
                Rule::new(
                    |c| c.focus_any(&["growth"]),
                    "Evaluate growth-oriented ETFs to complement individual positions.",
                ),
                Rule::new(
                    |c| c.focus_any(&["technology", "tech"]),
                    "Balance technology exposure with defensive sectors.",
                ),
                Rule::new(
                    |c| c.horizon() == TimeHorizon::Short,
                    "Keep a liquidity reserve to cover withdrawals in the near term.",
                ),
                Rule::new(
                    |c| c.horizon() == TimeHorizon::Long,
                    "Automate monthly contributions to benefit from compounding.",
                ),
                Rule::new(|_| true, "Rebalance the portfolio at least once per quarter."),
            ],
            risk_factors: vec![
                Rule::new(|c| c.diversification_score < 40, "Sector concentration risk."),
                Rule::new(
                    |c| c.weighted_volatility > HIGH_VOLATILITY_THRESHOLD,
                    "Elevated price volatility.",
                ),
                Rule::new(
                    |c| c.max_weight() > CONCENTRATION_WEIGHT,
                    "Single-position concentration.",
                ),
                Rule::new(
                    |c| c.has_drawdown(),
                    "Some holdings show significant recent drawdowns.",
                ),
                Rule::new(
                    |c| c.horizon() == TimeHorizon::Short && c.risk_level == RiskLevel::High,
                    "High-risk profile combined with a short time horizon.",
                ),
                Rule::new(|_| true, "General market and interest-rate risk."),
            ],
        }
    }
}
