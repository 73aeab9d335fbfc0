use thiserror::Error;

/// Unified error type for the entire wealth-advisor-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Analysis ────────────────────────────────────────────────────
    #[error("Portfolio is empty: add at least one holding before running an analysis")]
    EmptyPortfolio,

    #[error("No analysis strategy selected")]
    MissingStrategy,

    /// The run observed its cancellation token and produced no result.
    #[error("Analysis aborted")]
    Aborted,

    #[error("Analysis failed: {0}")]
    Analysis(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Insufficient balance: requested {amount:.2}, available {available:.2}")]
    InsufficientBalance { amount: f64, available: f64 },

    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    // ── Storage / File ──────────────────────────────────────────────
    #[error("Settings store error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// `true` for the cancellation outcome, which callers usually swallow.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, CoreError::Aborted)
    }

    /// `true` for caller-input errors that are reported before any work starts.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, CoreError::EmptyPortfolio | CoreError::MissingStrategy)
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
