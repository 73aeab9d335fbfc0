use chrono::{Months, NaiveDate};

use crate::errors::CoreError;
use crate::models::contract::ContractProgress;

/// Default window for the "expiring soon" flag.
pub const DEFAULT_EXPIRING_SOON_DAYS: i64 = 30;

/// Time-progress of advisory contracts.
pub struct ContractService {
    expiring_soon_days: i64,
}

impl ContractService {
    pub fn new() -> Self {
        Self::with_expiring_soon_days(DEFAULT_EXPIRING_SOON_DAYS)
    }

    pub fn with_expiring_soon_days(days: i64) -> Self {
        Self {
            expiring_soon_days: days,
        }
    }

    /// Progress of a contract that started on `start` and runs for `term_years`, as of `today`.
    ///
    /// A zero-length term is complete as soon as it starts.
    pub fn progress(
        &self,
        start: NaiveDate,
        term_years: u32,
        today: NaiveDate,
    ) -> Result<ContractProgress, CoreError> {
        let months = term_years.checked_mul(12).ok_or_else(|| {
            CoreError::ValidationError(format!("Contract term of {term_years} years is too long"))
        })?;
        let expiry = start.checked_add_months(Months::new(months)).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "Contract starting {start} with a {term_years}-year term overflows the calendar"
            ))
        })?;

        let total_days = (expiry - start).num_days();
        let elapsed_days = (today - start).num_days();
        let days_until_expiry = (expiry - today).num_days();

        let progress_percent = if total_days > 0 {
            (elapsed_days as f64 / total_days as f64 * 100.0).clamp(0.0, 100.0)
        } else if today >= start {
            100.0
        } else {
            0.0
        };

        Ok(ContractProgress {
            start_date: start,
            expiry_date: expiry,
            total_days,
            elapsed_days,
            days_until_expiry,
            progress_percent,
            expiring_soon: days_until_expiry > 0 && days_until_expiry <= self.expiring_soon_days,
        })
    }
}

impl Default for ContractService {
    fn default() -> Self {
        Self::new()
    }
}
