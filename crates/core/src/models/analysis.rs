use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Overall portfolio risk as classified by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Projected annual returns, as fractions (0.06 = 6%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PotentialReturns {
    pub conservative: f64,
    pub expected: f64,
    pub optimistic: f64,
}

/// The executive-analysis artifact.
///
/// Created fresh on each successful run and never mutated afterwards;
/// the next successful run replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveAnalysisResult {
    pub overall_risk: RiskLevel,

    /// Sector spread, 0–100
    pub diversification_score: u8,

    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub potential_returns: PotentialReturns,
    pub risk_factors: Vec<String>,
    pub market_outlook: String,
    pub last_updated: DateTime<Utc>,
}

impl ExecutiveAnalysisResult {
    /// Pretty JSON snapshot, the same fields the PDF export serializes.
    pub fn to_json(&self) -> Result<String, crate::errors::CoreError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            crate::errors::CoreError::Serialization(format!("Failed to serialize analysis: {e}"))
        })
    }

    /// Plain-text printable report.
    #[must_use]
    pub fn to_report_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "EXECUTIVE PORTFOLIO ANALYSIS");
        let _ = writeln!(out, "Generated: {}", self.last_updated.format("%Y-%m-%d %H:%M UTC"));
        let _ = writeln!(out);
        let _ = writeln!(out, "Overall risk: {}", self.overall_risk);
        let _ = writeln!(out, "Diversification score: {}/100", self.diversification_score);
        let _ = writeln!(
            out,
            "Potential returns: conservative {:.2}% | expected {:.2}% | optimistic {:.2}%",
            self.potential_returns.conservative * 100.0,
            self.potential_returns.expected * 100.0,
            self.potential_returns.optimistic * 100.0,
        );
        write_section(&mut out, "Key insights", &self.key_insights);
        write_section(&mut out, "Recommendations", &self.recommendations);
        write_section(&mut out, "Risk factors", &self.risk_factors);
        let _ = writeln!(out);
        let _ = writeln!(out, "Market outlook:");
        let _ = writeln!(out, "{}", self.market_outlook);
        out
    }
}

fn write_section(out: &mut String, title: &str, lines: &[String]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}:");
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, line);
    }
}

/// Where the coordinator currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisPhase {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Read-only snapshot of the coordinator's run state.
#[derive(Debug, Clone)]
pub struct AnalysisState {
    pub phase: AnalysisPhase,
    pub result: Option<Arc<ExecutiveAnalysisResult>>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self {
            phase: AnalysisPhase::Idle,
            result: None,
            loading: false,
            error: None,
            last_updated: None,
        }
    }
}

impl AnalysisState {
    /// Whether the settled data is older than `max_age` at `now`.
    /// No data at all counts as stale.
    #[must_use]
    pub fn is_stale_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.last_updated {
            Some(updated) => now - updated > max_age,
            None => true,
        }
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
