use serde::{Deserialize, Serialize};

/// A single holding as shown on the dashboard and fed into the analysis.
///
/// Weights across a portfolio are NOT required to sum to 1. Nothing here
/// normalizes them; consumers tolerate the drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    /// Ticker symbol, uppercased (e.g., "AAPL", "CETES")
    pub symbol: String,

    /// Human-readable name (e.g., "Apple Inc.")
    pub name: String,

    /// Fraction of the portfolio, 0–1
    pub weight: f64,

    /// Current market value in the account currency
    pub current_value: f64,

    /// Absolute change over the reporting period
    pub change: f64,

    /// Percent change over the reporting period (5.0 = +5%)
    pub change_percent: f64,

    /// Optional sector label used for diversification scoring
    #[serde(default)]
    pub sector: Option<String>,
}

impl PortfolioItem {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        weight: f64,
        current_value: f64,
        change: f64,
        change_percent: f64,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            weight,
            current_value,
            change,
            change_percent,
            sector: None,
        }
    }

    /// Attach a sector label.
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }
}

/// A position with share count and purchase price, used for gain/loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,

    /// Number of shares / units held
    pub shares: f64,

    /// Price per unit paid at purchase
    pub purchase_price: f64,

    /// Latest price per unit
    pub current_price: f64,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, shares: f64, purchase_price: f64, current_price: f64) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            shares,
            purchase_price,
            current_price,
        }
    }

    pub fn current_value(&self) -> f64 {
        self.shares * self.current_price
    }

    pub fn cost_basis(&self) -> f64 {
        self.shares * self.purchase_price
    }
}
