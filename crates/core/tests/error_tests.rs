// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use wealth_advisor_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn empty_portfolio() {
        assert_eq!(
            CoreError::EmptyPortfolio.to_string(),
            "Portfolio is empty: add at least one holding before running an analysis"
        );
    }

    #[test]
    fn missing_strategy() {
        assert_eq!(
            CoreError::MissingStrategy.to_string(),
            "No analysis strategy selected"
        );
    }

    #[test]
    fn aborted() {
        assert_eq!(CoreError::Aborted.to_string(), "Analysis aborted");
    }

    #[test]
    fn analysis() {
        let err = CoreError::Analysis("non-finite weight".into());
        assert_eq!(err.to_string(), "Analysis failed: non-finite weight");
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("amount must be positive".into());
        assert_eq!(err.to_string(), "Validation failed: amount must be positive");
    }

    #[test]
    fn insufficient_balance_rounds_to_cents() {
        let err = CoreError::InsufficientBalance {
            amount: 1500.0,
            available: 1000.456,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: requested 1500.00, available 1000.46"
        );
    }

    #[test]
    fn plan_not_found() {
        let err = CoreError::PlanNotFound("abc".into());
        assert_eq!(err.to_string(), "Plan not found: abc");
    }

    #[test]
    fn storage() {
        let err = CoreError::Storage("corrupted".into());
        assert_eq!(err.to_string(), "Settings store error: corrupted");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }
}

// ── User-facing messages are distinct ───────────────────────────────

#[test]
fn input_errors_have_distinct_messages() {
    assert_ne!(
        CoreError::EmptyPortfolio.to_string(),
        CoreError::MissingStrategy.to_string()
    );
}

// ── Classification helpers ──────────────────────────────────────────

#[test]
fn only_aborted_is_aborted() {
    assert!(CoreError::Aborted.is_aborted());
    assert!(!CoreError::EmptyPortfolio.is_aborted());
    assert!(!CoreError::Analysis("x".into()).is_aborted());
}

#[test]
fn input_errors_are_flagged() {
    assert!(CoreError::EmptyPortfolio.is_input_error());
    assert!(CoreError::MissingStrategy.is_input_error());
    assert!(!CoreError::Aborted.is_input_error());
    assert!(!CoreError::ValidationError("x".into()).is_input_error());
}

// ── From impls ──────────────────────────────────────────────────────

#[test]
fn from_io_error() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
    let err: CoreError = io.into();
    assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("missing file")));
}

#[test]
fn from_serde_json_error() {
    let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
    let err: CoreError = json_err.into();
    assert!(matches!(err, CoreError::Deserialization(_)));
}

#[test]
fn error_is_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<CoreError>();
}
