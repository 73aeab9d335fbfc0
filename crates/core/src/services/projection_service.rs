use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::plan::{ContributionPlan, ContributionProjection};
use crate::models::settings::{Settings, ZeroRatePolicy};

/// Compound-interest projections for recurring monthly contributions.
///
/// Pure arithmetic, no I/O. Rates are nominal annual fractions compounded
/// monthly (`r = annual / 12`).
pub struct ProjectionService {
    zero_rate_policy: ZeroRatePolicy,
}

impl ProjectionService {
    pub fn new() -> Self {
        Self::with_policy(ZeroRatePolicy::default())
    }

    pub fn with_policy(zero_rate_policy: ZeroRatePolicy) -> Self {
        Self { zero_rate_policy }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_policy(settings.zero_rate_policy)
    }

    pub fn zero_rate_policy(&self) -> ZeroRatePolicy {
        self.zero_rate_policy
    }

    /// Future value of `monthly_contribution` paid for `term_years` years.
    pub fn future_value(
        &self,
        monthly_contribution: f64,
        annual_rate: f64,
        term_years: u32,
    ) -> Result<ContributionProjection, CoreError> {
        let payments = term_years.checked_mul(12).ok_or_else(|| {
            CoreError::ValidationError(format!("Term of {term_years} years is too long"))
        })?;
        self.future_value_for_payments(monthly_contribution, annual_rate, payments)
    }

    /// Future value after exactly `payments` monthly contributions.
    ///
    /// `FV = P × ((1 + r)^n - 1) / r` for `r > 0`. At `r == 0` the
    /// configured `ZeroRatePolicy` decides between `P × n` and `0`.
    /// No payments means no value.
    pub fn future_value_for_payments(
        &self,
        monthly_contribution: f64,
        annual_rate: f64,
        payments: u32,
    ) -> Result<ContributionProjection, CoreError> {
        if !monthly_contribution.is_finite() || monthly_contribution < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Monthly contribution must be a non-negative amount, got {monthly_contribution}"
            )));
        }
        if !annual_rate.is_finite() || annual_rate < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Annual rate must be a non-negative fraction, got {annual_rate}"
            )));
        }

        let n = payments as f64;
        let total_contributed = monthly_contribution * n;
        let r = annual_rate / 12.0;

        let future_value = if payments == 0 {
            0.0
        } else if r > 0.0 {
            monthly_contribution * ((1.0 + r).powf(n) - 1.0) / r
        } else {
            match self.zero_rate_policy {
                ZeroRatePolicy::Linear => total_contributed,
                ZeroRatePolicy::Zero => 0.0,
            }
        };

        Ok(ContributionProjection {
            future_value,
            total_contributed,
            interest_earned: future_value - total_contributed,
            payments,
        })
    }

    /// Projection over a plan's whole term.
    pub fn project_plan(&self, plan: &ContributionPlan) -> Result<ContributionProjection, CoreError> {
        let payments = plan.total_months().ok_or_else(|| term_too_long(plan))?;
        self.future_value_for_payments(plan.monthly_contribution, plan.annual_rate, payments)
    }

    /// How far `current_amount` has come towards the projected future value, 0–100.
    pub fn plan_progress(&self, plan: &ContributionPlan) -> Result<f64, CoreError> {
        let projection = self.project_plan(plan)?;
        if projection.future_value <= 0.0 {
            return Ok(0.0);
        }
        Ok((plan.current_amount / projection.future_value * 100.0).clamp(0.0, 100.0))
    }

    /// Share of the plan's term elapsed at `today`, 0–100.
    pub fn plan_time_progress(&self, plan: &ContributionPlan, today: NaiveDate) -> f64 {
        let Some(end) = plan.end_date() else {
            return 0.0;
        };
        let total = (end - plan.start_date).num_days();
        if total <= 0 {
            return if today >= plan.start_date { 100.0 } else { 0.0 };
        }
        let elapsed = (today - plan.start_date).num_days();
        (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Validate a plan's inputs.
    pub fn validate_plan(&self, plan: &ContributionPlan) -> Result<(), CoreError> {
        if plan.title.trim().is_empty() {
            return Err(CoreError::ValidationError("Plan title must not be empty".into()));
        }
        match plan.total_months() {
            None => return Err(term_too_long(plan)),
            Some(0) => {
                return Err(CoreError::ValidationError(
                    "Plan term must be at least one month".into(),
                ))
            }
            Some(_) => {}
        }
        if !plan.current_amount.is_finite() || plan.current_amount < 0.0 {
            return Err(CoreError::ValidationError(
                "Current amount must not be negative".into(),
            ));
        }
        if plan.end_date().is_none() {
            return Err(CoreError::ValidationError(
                "Plan end date overflows the calendar".into(),
            ));
        }
        // Reuses the contribution/rate checks
        self.project_plan(plan).map(|_| ())
    }
}

fn term_too_long(plan: &ContributionPlan) -> CoreError {
    CoreError::ValidationError(format!(
        "Plan term of {} years and {} months is too long",
        plan.term_years, plan.term_months
    ))
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self::new()
    }
}
