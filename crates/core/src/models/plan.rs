use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring monthly contribution plan ("objective").
///
/// Only the inputs are stored. End date, projection and progress are
/// derived on read by the projection service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    pub id: Uuid,
    pub title: String,
    pub monthly_contribution: f64,

    /// Nominal annual rate, fractional (0.185 = 18.5%)
    pub annual_rate: f64,

    pub term_years: u32,

    /// Extra months on top of `term_years`
    #[serde(default)]
    pub term_months: u32,

    /// Amount already accumulated towards the objective
    #[serde(default)]
    pub current_amount: f64,

    pub start_date: NaiveDate,
}

impl ContributionPlan {
    pub fn new(
        title: impl Into<String>,
        monthly_contribution: f64,
        annual_rate: f64,
        term_years: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            monthly_contribution,
            annual_rate,
            term_years,
            term_months: 0,
            current_amount: 0.0,
            start_date,
        }
    }

    #[must_use]
    pub fn with_term_months(mut self, months: u32) -> Self {
        self.term_months = months;
        self
    }

    #[must_use]
    pub fn with_current_amount(mut self, amount: f64) -> Self {
        self.current_amount = amount;
        self
    }

    /// Number of monthly payments over the whole term. `None` when the
    /// term does not fit in a `u32` month count.
    pub fn total_months(&self) -> Option<u32> {
        self.term_years
            .checked_mul(12)?
            .checked_add(self.term_months)
    }

    /// Date the plan completes. `None` if the term or the calendar overflows.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.start_date
            .checked_add_months(Months::new(self.total_months()?))
    }
}

/// Derived figures for a recurring-contribution projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionProjection {
    pub future_value: f64,
    pub total_contributed: f64,
    pub interest_earned: f64,
    pub payments: u32,
}
