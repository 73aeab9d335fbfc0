use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Time progress of an advisory contract at a given date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractProgress {
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub total_days: i64,
    pub elapsed_days: i64,

    /// Negative once the contract has expired
    pub days_until_expiry: i64,

    /// Clamped to [0, 100]
    pub progress_percent: f64,

    /// `0 < days_until_expiry <= threshold`
    pub expiring_soon: bool,
}

impl ContractProgress {
    pub fn is_expired(&self) -> bool {
        self.days_until_expiry <= 0
    }
}
