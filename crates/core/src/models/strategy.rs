use serde::{Deserialize, Serialize};

/// How much risk the client is willing to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTolerance::Conservative => write!(f, "conservative"),
            RiskTolerance::Moderate => write!(f, "moderate"),
            RiskTolerance::Aggressive => write!(f, "aggressive"),
        }
    }
}

/// Investment horizon declared by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    Short,
    Medium,
    Long,
}

impl std::fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeHorizon::Short => write!(f, "short"),
            TimeHorizon::Medium => write!(f, "medium"),
            TimeHorizon::Long => write!(f, "long"),
        }
    }
}

/// User-selected analysis configuration.
///
/// `focus_areas` keeps insertion order for display; membership checks
/// ignore order and ASCII case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStrategy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub risk_tolerance: RiskTolerance,
    pub time_horizon: TimeHorizon,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

impl AnalysisStrategy {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        risk_tolerance: RiskTolerance,
        time_horizon: TimeHorizon,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            risk_tolerance,
            time_horizon,
            focus_areas: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a focus area, skipping case-insensitive duplicates.
    #[must_use]
    pub fn with_focus(mut self, area: impl Into<String>) -> Self {
        let area = area.into();
        if !self.has_focus(&area) {
            self.focus_areas.push(area);
        }
        self
    }

    pub fn has_focus(&self, area: &str) -> bool {
        self.focus_areas.iter().any(|a| a.eq_ignore_ascii_case(area))
    }
}
