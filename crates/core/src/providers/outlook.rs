use rand::seq::SliceRandom;

use super::traits::OutlookProvider;

/// Canned outlook paragraphs the dashboard rotates through.
pub const DEFAULT_OUTLOOKS: [&str; 4] = [
    "Markets remain cautiously optimistic as inflation moderates and central banks signal a pause in rate hikes.",
    "Volatility is expected to stay elevated in the short term while earnings guidance is revised across sectors.",
    "Fixed-income yields stay attractive, supporting balanced allocations between equities and bonds.",
    "Global growth is slowing gradually; quality companies with strong balance sheets are favored.",
];

/// Picks one outlook uniformly at random per analysis.
pub struct RandomOutlook {
    outlooks: Vec<String>,
}

impl RandomOutlook {
    pub fn new() -> Self {
        Self::with_outlooks(DEFAULT_OUTLOOKS.iter().map(|s| s.to_string()).collect())
    }

    /// Use a custom set of outlooks. An empty set falls back to the defaults.
    pub fn with_outlooks(outlooks: Vec<String>) -> Self {
        if outlooks.is_empty() {
            return Self::new();
        }
        Self { outlooks }
    }

    pub fn outlooks(&self) -> &[String] {
        &self.outlooks
    }
}

impl Default for RandomOutlook {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlookProvider for RandomOutlook {
    fn name(&self) -> &str {
        "random"
    }

    fn outlook(&self) -> String {
        self.outlooks
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

/// Always returns the same outlook.
pub struct FixedOutlook {
    text: String,
}

impl FixedOutlook {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OutlookProvider for FixedOutlook {
    fn name(&self) -> &str {
        "fixed"
    }

    fn outlook(&self) -> String {
        self.text.clone()
    }
}
