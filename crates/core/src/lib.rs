pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use models::{
    analysis::{AnalysisState, ExecutiveAnalysisResult},
    contract::ContractProgress,
    liquidity::{LiquidityAccount, WithdrawalQuote},
    performance::PerformanceSummary,
    plan::{ContributionPlan, ContributionProjection},
    portfolio::{Holding, PortfolioItem},
    settings::Settings,
    strategy::AnalysisStrategy,
};
use services::{
    analysis_coordinator::AnalysisCoordinator, analysis_service::AnalysisSimulator,
    contract_service::ContractService, liquidity_service::LiquidityService,
    performance_service::PerformanceService, projection_service::ProjectionService,
};
use storage::traits::SettingsStore;
use tracing::info;
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the wealth-advisor core library.
/// Holds the client's settings and plans plus the services that operate on them.
#[must_use]
pub struct WealthAdvisor {
    settings: Settings,
    plans: Vec<ContributionPlan>,
    projection_service: ProjectionService,
    liquidity_service: LiquidityService,
    contract_service: ContractService,
    performance_service: PerformanceService,
    coordinator: Arc<AnalysisCoordinator>,
    /// Tracks whether settings or plans changed since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for WealthAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WealthAdvisor")
            .field("settings", &self.settings)
            .field("plans", &self.plans.len())
            .field("coordinator", &self.coordinator)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl WealthAdvisor {
    /// Build with the given settings and the default simulator for them.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let simulator = AnalysisSimulator::from_settings(&settings);
        Self::with_simulator(settings, simulator)
    }

    /// Build with an explicit simulator (custom latency / outlook / rules).
    pub fn with_simulator(
        settings: Settings,
        simulator: AnalysisSimulator,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let coordinator = AnalysisCoordinator::new(Arc::new(simulator))
            .with_stale_after(settings.stale_after());
        Ok(Self {
            projection_service: ProjectionService::from_settings(&settings),
            liquidity_service: LiquidityService::from_settings(&settings),
            contract_service: ContractService::with_expiring_soon_days(settings.expiring_soon_days),
            performance_service: PerformanceService::new(),
            coordinator: Arc::new(coordinator),
            settings,
            plans: Vec::new(),
            dirty: false,
        })
    }

    /// Load settings from a store and build from them.
    pub async fn load_from_store(store: &dyn SettingsStore) -> Result<Self, CoreError> {
        let settings = store.load().await?;
        info!(store = store.name(), "settings loaded");
        Self::new(settings)
    }

    /// Persist the current settings. Clears the unsaved-changes flag on success.
    pub async fn save_settings(&mut self, store: &dyn SettingsStore) -> Result<(), CoreError> {
        store.save(&self.settings).await?;
        self.dirty = false;
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. The calculators pick up the new policy values
    /// immediately; the simulator keeps the latency it was built with.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), CoreError> {
        settings.validate()?;
        self.projection_service = ProjectionService::from_settings(&settings);
        self.liquidity_service = LiquidityService::from_settings(&settings);
        self.contract_service = ContractService::with_expiring_soon_days(settings.expiring_soon_days);
        self.settings = settings;
        self.dirty = true;
        Ok(())
    }

    /// Returns `true` if settings or plans changed since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Calculators ─────────────────────────────────────────────────

    /// Future value of a recurring monthly contribution over `term_years`.
    pub fn future_value(
        &self,
        monthly_contribution: f64,
        annual_rate: f64,
        term_years: u32,
    ) -> Result<ContributionProjection, CoreError> {
        self.projection_service
            .future_value(monthly_contribution, annual_rate, term_years)
    }

    /// Amount of the investment base available as liquidity.
    #[must_use]
    pub fn liquidity_allowance(&self, total_investment_base: f64) -> f64 {
        self.liquidity_service.liquidity_allowance(total_investment_base)
    }

    pub fn quote_withdrawal(
        &self,
        amount: f64,
        available_balance: f64,
    ) -> Result<WithdrawalQuote, CoreError> {
        self.liquidity_service.quote_withdrawal(amount, available_balance)
    }

    /// Withdraw from an account; the balance is untouched on error.
    pub fn withdraw(
        &self,
        account: &mut LiquidityAccount,
        amount: f64,
    ) -> Result<WithdrawalQuote, CoreError> {
        self.liquidity_service.withdraw(account, amount)
    }

    #[must_use]
    pub fn portfolio_performance(&self, holdings: &[Holding]) -> PerformanceSummary {
        self.performance_service.summarize(holdings)
    }

    pub fn contract_progress(
        &self,
        start: NaiveDate,
        term_years: u32,
        today: NaiveDate,
    ) -> Result<ContractProgress, CoreError> {
        self.contract_service.progress(start, term_years, today)
    }

    // ── Contribution Plans ──────────────────────────────────────────

    /// Add a plan after validating it. Returns its id.
    pub fn add_plan(&mut self, plan: ContributionPlan) -> Result<Uuid, CoreError> {
        self.projection_service.validate_plan(&plan)?;
        if self.plans.iter().any(|p| p.id == plan.id) {
            return Err(CoreError::ValidationError(format!(
                "Plan {} already exists",
                plan.id
            )));
        }
        let id = plan.id;
        self.plans.push(plan);
        self.dirty = true;
        Ok(id)
    }

    /// Replace the plan with the same id. Validates before committing.
    pub fn update_plan(&mut self, plan: ContributionPlan) -> Result<(), CoreError> {
        self.projection_service.validate_plan(&plan)?;
        let slot = self
            .plans
            .iter_mut()
            .find(|p| p.id == plan.id)
            .ok_or_else(|| CoreError::PlanNotFound(plan.id.to_string()))?;
        *slot = plan;
        self.dirty = true;
        Ok(())
    }

    /// Remove a plan by id and return it.
    pub fn remove_plan(&mut self, plan_id: Uuid) -> Result<ContributionPlan, CoreError> {
        let idx = self
            .plans
            .iter()
            .position(|p| p.id == plan_id)
            .ok_or_else(|| CoreError::PlanNotFound(plan_id.to_string()))?;
        self.dirty = true;
        Ok(self.plans.remove(idx))
    }

    #[must_use]
    pub fn get_plan(&self, plan_id: Uuid) -> Option<&ContributionPlan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    /// All plans, oldest start date first.
    #[must_use]
    pub fn get_plans(&self) -> Vec<&ContributionPlan> {
        let mut plans: Vec<&ContributionPlan> = self.plans.iter().collect();
        plans.sort_by_key(|p| p.start_date);
        plans
    }

    pub fn plan_projection(&self, plan_id: Uuid) -> Result<ContributionProjection, CoreError> {
        let plan = self.require_plan(plan_id)?;
        self.projection_service.project_plan(plan)
    }

    /// Accumulated amount as a percentage of the projected future value.
    pub fn plan_progress(&self, plan_id: Uuid) -> Result<f64, CoreError> {
        let plan = self.require_plan(plan_id)?;
        self.projection_service.plan_progress(plan)
    }

    /// Share of the plan's term elapsed at `today`.
    pub fn plan_time_progress(&self, plan_id: Uuid, today: NaiveDate) -> Result<f64, CoreError> {
        let plan = self.require_plan(plan_id)?;
        Ok(self.projection_service.plan_time_progress(plan, today))
    }

    /// Export all plans as a JSON string.
    pub fn export_plans_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.plans)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize plans to JSON: {e}")))
    }

    /// Import plans from JSON. All plans are validated first; if any fails,
    /// none are added. Returns the number imported.
    pub fn import_plans_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let incoming: Vec<ContributionPlan> = serde_json::from_str(json)?;
        for plan in &incoming {
            self.projection_service.validate_plan(plan)?;
            let duplicate = self.plans.iter().any(|p| p.id == plan.id)
                || incoming.iter().filter(|p| p.id == plan.id).count() > 1;
            if duplicate {
                return Err(CoreError::ValidationError(format!(
                    "Plan {} already exists",
                    plan.id
                )));
            }
        }
        let count = incoming.len();
        self.plans.extend(incoming);
        if count > 0 {
            self.dirty = true;
        }
        Ok(count)
    }

    // ── Analysis ────────────────────────────────────────────────────

    /// Shared handle to the coordinator, e.g. for a UI task to cancel from.
    #[must_use]
    pub fn coordinator(&self) -> Arc<AnalysisCoordinator> {
        Arc::clone(&self.coordinator)
    }

    /// Run an executive analysis, superseding any analysis in flight.
    pub async fn run_analysis(
        &self,
        items: Vec<PortfolioItem>,
        strategy: Option<AnalysisStrategy>,
    ) -> Result<Arc<ExecutiveAnalysisResult>, CoreError> {
        self.coordinator.run(items, strategy).await
    }

    pub fn cancel_analysis(&self) -> bool {
        self.coordinator.cancel()
    }

    pub fn clear_analysis(&self) {
        self.coordinator.clear();
    }

    pub fn clear_analysis_error(&self) {
        self.coordinator.clear_error();
    }

    #[must_use]
    pub fn analysis_state(&self) -> AnalysisState {
        self.coordinator.state()
    }

    /// Whether the latest analysis is older than the configured threshold.
    #[must_use]
    pub fn is_analysis_stale(&self) -> bool {
        self.coordinator
            .is_stale_at(Utc::now(), self.settings.stale_after())
    }

    /// The latest analysis as pretty JSON (the data behind the PDF export).
    pub fn export_analysis_json(&self) -> Result<String, CoreError> {
        self.require_result()?.to_json()
    }

    /// The latest analysis as a printable text report.
    pub fn export_analysis_report(&self) -> Result<String, CoreError> {
        Ok(self.require_result()?.to_report_text())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn require_plan(&self, plan_id: Uuid) -> Result<&ContributionPlan, CoreError> {
        self.get_plan(plan_id)
            .ok_or_else(|| CoreError::PlanNotFound(plan_id.to_string()))
    }

    fn require_result(&self) -> Result<Arc<ExecutiveAnalysisResult>, CoreError> {
        self.coordinator
            .result()
            .ok_or_else(|| CoreError::ValidationError("No analysis available to export".into()))
    }
}
