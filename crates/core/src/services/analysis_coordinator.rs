use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::errors::CoreError;
use crate::models::analysis::{AnalysisPhase, AnalysisState, ExecutiveAnalysisResult};
use crate::models::portfolio::PortfolioItem;
use crate::models::strategy::AnalysisStrategy;
use super::analysis_service::AnalysisSimulator;
use super::cancellation::{cancellation_pair, CancelHandle};

/// Shown after the user explicitly cancels a running analysis.
pub const CANCELLED_BY_USER_MESSAGE: &str = "Analysis cancelled by user";

/// Shown for any failure other than input validation or cancellation.
pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "An unexpected error occurred during the analysis. Please try again.";

/// Default age after which a settled analysis is considered stale.
pub const DEFAULT_STALE_AFTER_MINUTES: i64 = 30;

/// The single outstanding run. Only `run`, `cancel`, `clear` and teardown
/// ever write the slot that holds it.
#[derive(Debug)]
struct InFlight {
    run_id: u64,
    handle: CancelHandle,
}

#[derive(Debug, Default)]
struct Inner {
    state: AnalysisState,
    in_flight: Option<InFlight>,
    next_run_id: u64,
}

impl Inner {
    fn is_current(&self, run_id: u64) -> bool {
        self.in_flight.as_ref().is_some_and(|f| f.run_id == run_id)
    }

    /// Take the outstanding run out of the slot and signal it.
    fn cancel_in_flight(&mut self) -> Option<u64> {
        let in_flight = self.in_flight.take()?;
        in_flight.handle.cancel();
        Some(in_flight.run_id)
    }

    fn settled_phase(&self) -> AnalysisPhase {
        if self.state.result.is_some() {
            AnalysisPhase::Succeeded
        } else {
            AnalysisPhase::Idle
        }
    }
}

/// Owns the analysis run state and enforces at most one live request.
///
/// Starting a run cancels the previous one before anything else happens, so
/// the last caller always wins: a superseded run can finish, fail or be
/// aborted in any order without ever touching the state again.
pub struct AnalysisCoordinator {
    simulator: Arc<AnalysisSimulator>,
    inner: Mutex<Inner>,
    stale_after: Duration,
}

impl AnalysisCoordinator {
    pub fn new(simulator: Arc<AnalysisSimulator>) -> Self {
        Self {
            simulator,
            inner: Mutex::new(Inner::default()),
            stale_after: Duration::minutes(DEFAULT_STALE_AFTER_MINUTES),
        }
    }

    #[must_use]
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Snapshot of the current run state.
    #[must_use]
    pub fn state(&self) -> AnalysisState {
        self.inner.lock().state.clone()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.lock().in_flight.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<Arc<ExecutiveAnalysisResult>> {
        self.inner.lock().state.result.clone()
    }

    /// Start a new analysis, superseding any run still in flight.
    ///
    /// Input errors settle the state as failed without starting any work.
    /// A superseded run returns `CoreError::Aborted` and leaves the state alone.
    pub async fn run(
        &self,
        items: Vec<PortfolioItem>,
        strategy: Option<AnalysisStrategy>,
    ) -> Result<Arc<ExecutiveAnalysisResult>, CoreError> {
        let (run_id, token) = {
            let mut inner = self.inner.lock();
            if let Some(previous) = inner.cancel_in_flight() {
                info!(run_id = previous, "superseding in-flight analysis");
            }

            let input_error = if items.is_empty() {
                Some(CoreError::EmptyPortfolio)
            } else if strategy.is_none() {
                Some(CoreError::MissingStrategy)
            } else {
                None
            };
            if let Some(err) = input_error {
                warn!(error = %err, "analysis input rejected");
                inner.state.phase = AnalysisPhase::Failed;
                inner.state.loading = false;
                inner.state.error = Some(err.to_string());
                return Err(err);
            }

            let run_id = inner.next_run_id;
            inner.next_run_id += 1;
            let (handle, token) = cancellation_pair();
            inner.in_flight = Some(InFlight { run_id, handle });
            inner.state.phase = AnalysisPhase::Running;
            inner.state.loading = true;
            inner.state.error = None;
            (run_id, token)
        };

        debug!(run_id, holdings = items.len(), "analysis started");
        let mut guard = RunGuard {
            coordinator: self,
            run_id,
            armed: true,
        };

        let outcome = self
            .simulator
            .analyze(&items, strategy.as_ref(), &token)
            .await;
        guard.armed = false;

        let mut inner = self.inner.lock();
        if !inner.is_current(run_id) {
            debug!(run_id, "discarding outcome of superseded analysis");
            return Err(CoreError::Aborted);
        }
        inner.in_flight = None;
        inner.state.loading = false;

        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                inner.state.phase = AnalysisPhase::Succeeded;
                inner.state.last_updated = Some(result.last_updated);
                inner.state.result = Some(Arc::clone(&result));
                inner.state.error = None;
                info!(
                    run_id,
                    risk = %result.overall_risk,
                    diversification = result.diversification_score,
                    "analysis settled"
                );
                Ok(result)
            }
            Err(CoreError::Aborted) => {
                // The handle vanished without going through cancel/clear.
                let phase = inner.settled_phase();
                inner.state.phase = phase;
                Err(CoreError::Aborted)
            }
            Err(err) => {
                error!(run_id, error = %err, "analysis failed");
                inner.state.phase = AnalysisPhase::Failed;
                inner.state.error = Some(if err.is_input_error() {
                    err.to_string()
                } else {
                    UNEXPECTED_ERROR_MESSAGE.to_string()
                });
                Err(err)
            }
        }
    }

    /// User-initiated cancellation. Only acts while a run is in flight.
    /// Returns whether anything was cancelled.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.cancel_in_flight() {
            Some(run_id) => {
                info!(run_id, "analysis cancelled by user");
                inner.state.phase = AnalysisPhase::Failed;
                inner.state.loading = false;
                inner.state.error = Some(CANCELLED_BY_USER_MESSAGE.to_string());
                true
            }
            None => false,
        }
    }

    /// Cancel anything in flight and return to idle with no data.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        if let Some(run_id) = inner.cancel_in_flight() {
            debug!(run_id, "analysis cleared while in flight");
        }
        inner.state = AnalysisState::default();
    }

    /// Drop the error message, keeping any previously settled result.
    pub fn clear_error(&self) {
        let mut inner = self.inner.lock();
        if inner.state.error.take().is_none() {
            return;
        }
        if inner.in_flight.is_none() {
            let phase = inner.settled_phase();
            inner.state.phase = phase;
        }
    }

    /// Whether the settled data is older than the configured threshold.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now(), self.stale_after)
    }

    #[must_use]
    pub fn is_stale_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.inner.lock().state.is_stale_at(now, max_age)
    }

    /// Cancel any in-flight run without touching the visible state.
    /// Called automatically when the coordinator is dropped.
    pub fn shutdown(&self) {
        if let Some(run_id) = self.inner.lock().cancel_in_flight() {
            debug!(run_id, "analysis cancelled on shutdown");
        }
    }
}

impl Drop for AnalysisCoordinator {
    fn drop(&mut self) {
        if let Some(in_flight) = self.inner.get_mut().in_flight.take() {
            in_flight.handle.cancel();
        }
    }
}

impl std::fmt::Debug for AnalysisCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("AnalysisCoordinator")
            .field("phase", &inner.state.phase)
            .field("in_flight", &inner.in_flight.as_ref().map(|i| i.run_id))
            .field("stale_after", &self.stale_after)
            .finish()
    }
}

/// Keeps the state consistent if the caller drops a `run` future mid-flight.
struct RunGuard<'a> {
    coordinator: &'a AnalysisCoordinator,
    run_id: u64,
    armed: bool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.coordinator.inner.lock();
        if inner.is_current(self.run_id) {
            inner.cancel_in_flight();
            inner.state.loading = false;
            let phase = inner.settled_phase();
            inner.state.phase = phase;
            debug!(run_id = self.run_id, "analysis future dropped before completion");
        }
    }
}
