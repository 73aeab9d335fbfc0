use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Upper bound for `stale_after_minutes`: one year.
pub const MAX_STALE_AFTER_MINUTES: i64 = 365 * 24 * 60;

/// What the future-value calculator does when the annual rate is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroRatePolicy {
    /// Contributions accumulate linearly: FV = P × n
    #[default]
    Linear,
    /// Legacy dashboard behaviour: FV = 0
    Zero,
}

/// User/tenant configurable policy values.
///
/// Persisted through a `SettingsStore`; every field falls back to its
/// default when missing from the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display currency (ISO 4217, e.g. "USD", "MXN")
    pub currency: String,

    /// Fraction of the investment base available as liquidity
    pub liquidity_ratio: f64,

    /// Fee charged on withdrawals, fractional
    pub withdrawal_fee_rate: f64,

    /// Contracts within this many days of expiry are flagged
    pub expiring_soon_days: i64,

    /// Analysis results older than this are considered stale
    pub stale_after_minutes: i64,

    /// Simulated analysis latency bounds, milliseconds
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,

    pub zero_rate_policy: ZeroRatePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            liquidity_ratio: 0.10,
            withdrawal_fee_rate: 0.04,
            expiring_soon_days: 30,
            stale_after_minutes: 30,
            min_latency_ms: 2000,
            max_latency_ms: 5000,
            zero_rate_policy: ZeroRatePolicy::Linear,
        }
    }
}

impl Settings {
    /// Reject values the calculators cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{}': must be exactly 3 ASCII letters (e.g., USD, MXN)",
                self.currency
            )));
        }
        for (name, value) in [
            ("liquidity_ratio", self.liquidity_ratio),
            ("withdrawal_fee_rate", self.withdrawal_fee_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CoreError::ValidationError(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        if self.expiring_soon_days < 0 {
            return Err(CoreError::ValidationError(
                "expiring_soon_days must not be negative".into(),
            ));
        }
        if !(1..=MAX_STALE_AFTER_MINUTES).contains(&self.stale_after_minutes) {
            return Err(CoreError::ValidationError(format!(
                "stale_after_minutes must be between 1 and {MAX_STALE_AFTER_MINUTES}, got {}",
                self.stale_after_minutes
            )));
        }
        if self.min_latency_ms > self.max_latency_ms {
            return Err(CoreError::ValidationError(format!(
                "min_latency_ms ({}) must not exceed max_latency_ms ({})",
                self.min_latency_ms, self.max_latency_ms
            )));
        }
        Ok(())
    }

    /// Staleness threshold. Saturates for values `validate` would reject.
    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.stale_after_minutes).unwrap_or(chrono::Duration::MAX)
    }
}
