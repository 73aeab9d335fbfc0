// ═══════════════════════════════════════════════════════════════════
// Calculator Tests — ProjectionService, LiquidityService,
// PerformanceService, ContractService
// ═══════════════════════════════════════════════════════════════════

use approx::assert_relative_eq;
use chrono::NaiveDate;
use proptest::prelude::*;

use wealth_advisor_core::errors::CoreError;
use wealth_advisor_core::models::liquidity::LiquidityAccount;
use wealth_advisor_core::models::plan::ContributionPlan;
use wealth_advisor_core::models::portfolio::Holding;
use wealth_advisor_core::models::settings::{Settings, ZeroRatePolicy};
use wealth_advisor_core::services::contract_service::ContractService;
use wealth_advisor_core::services::liquidity_service::LiquidityService;
use wealth_advisor_core::services::performance_service::PerformanceService;
use wealth_advisor_core::services::projection_service::ProjectionService;

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// ProjectionService
// ═══════════════════════════════════════════════════════════════════

mod projection {
    use super::*;

    #[test]
    fn one_year_at_eighteen_and_a_half_percent() {
        let svc = ProjectionService::new();
        let p = svc.future_value(5000.0, 0.185, 1).unwrap();
        let r: f64 = 0.185 / 12.0;
        let expected = 5000.0 * ((1.0 + r).powi(12) - 1.0) / r;
        assert_relative_eq!(p.future_value, expected, max_relative = 1e-12);
        // Roughly 65.3k
        assert_relative_eq!(p.future_value, 65_235.0, max_relative = 5e-3);
        assert_eq!(p.payments, 12);
        assert_eq!(p.total_contributed, 60_000.0);
        assert_relative_eq!(p.interest_earned, expected - 60_000.0, max_relative = 1e-12);
    }

    #[test]
    fn zero_rate_is_linear_by_default() {
        let svc = ProjectionService::new();
        let p = svc.future_value(1000.0, 0.0, 2).unwrap();
        assert_eq!(p.future_value, 24_000.0);
        assert_eq!(p.interest_earned, 0.0);
    }

    #[test]
    fn zero_rate_legacy_policy_returns_zero() {
        let svc = ProjectionService::with_policy(ZeroRatePolicy::Zero);
        let p = svc.future_value(1000.0, 0.0, 2).unwrap();
        assert_eq!(p.future_value, 0.0);
        assert_eq!(p.total_contributed, 24_000.0);
        assert_eq!(p.interest_earned, -24_000.0);
    }

    #[test]
    fn policy_comes_from_settings() {
        let settings = Settings {
            zero_rate_policy: ZeroRatePolicy::Zero,
            ..Settings::default()
        };
        let svc = ProjectionService::from_settings(&settings);
        assert_eq!(svc.zero_rate_policy(), ZeroRatePolicy::Zero);
    }

    #[test]
    fn zero_term_has_no_value() {
        let svc = ProjectionService::new();
        let p = svc.future_value(1000.0, 0.1, 0).unwrap();
        assert_eq!(p.future_value, 0.0);
        assert_eq!(p.total_contributed, 0.0);
    }

    #[test]
    fn negative_rate_rejected() {
        let svc = ProjectionService::new();
        assert!(matches!(
            svc.future_value(1000.0, -0.01, 1),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn negative_contribution_rejected() {
        let svc = ProjectionService::new();
        assert!(svc.future_value(-1.0, 0.1, 1).is_err());
        assert!(svc.future_value(f64::NAN, 0.1, 1).is_err());
    }

    #[test]
    fn plan_projection_uses_years_and_months() {
        let svc = ProjectionService::new();
        let plan = ContributionPlan::new("Car", 1000.0, 0.12, 1, make_date(2025, 1, 1))
            .with_term_months(6);
        let p = svc.project_plan(&plan).unwrap();
        let expected = svc.future_value_for_payments(1000.0, 0.12, 18).unwrap();
        assert_eq!(p, expected);
    }

    #[test]
    fn plan_progress_is_clamped() {
        let svc = ProjectionService::new();
        let plan = ContributionPlan::new("Trip", 1000.0, 0.0, 1, make_date(2025, 1, 1))
            .with_current_amount(6000.0);
        assert_relative_eq!(svc.plan_progress(&plan).unwrap(), 50.0);
        let done = plan.clone().with_current_amount(50_000.0);
        assert_eq!(svc.plan_progress(&done).unwrap(), 100.0);
    }

    #[test]
    fn plan_progress_zero_future_value() {
        let svc = ProjectionService::with_policy(ZeroRatePolicy::Zero);
        let plan = ContributionPlan::new("Trip", 1000.0, 0.0, 1, make_date(2025, 1, 1))
            .with_current_amount(500.0);
        assert_eq!(svc.plan_progress(&plan).unwrap(), 0.0);
    }

    #[test]
    fn plan_time_progress() {
        let svc = ProjectionService::new();
        let plan = ContributionPlan::new("Fund", 100.0, 0.1, 1, make_date(2025, 1, 1));
        assert_eq!(svc.plan_time_progress(&plan, make_date(2024, 12, 1)), 0.0);
        assert_relative_eq!(
            svc.plan_time_progress(&plan, make_date(2025, 7, 2)),
            182.0 / 365.0 * 100.0,
            max_relative = 1e-12
        );
        assert_eq!(svc.plan_time_progress(&plan, make_date(2027, 1, 1)), 100.0);
    }

    #[test]
    fn validate_plan_rules() {
        let svc = ProjectionService::new();
        let ok = ContributionPlan::new("Fund", 100.0, 0.1, 1, make_date(2025, 1, 1));
        assert!(svc.validate_plan(&ok).is_ok());

        let mut untitled = ok.clone();
        untitled.title = "  ".into();
        assert!(svc.validate_plan(&untitled).is_err());

        let no_term = ContributionPlan::new("Fund", 100.0, 0.1, 0, make_date(2025, 1, 1));
        assert!(svc.validate_plan(&no_term).is_err());

        let negative = ok.clone().with_current_amount(-5.0);
        assert!(svc.validate_plan(&negative).is_err());
    }

    #[test]
    fn overflowing_plan_term_is_a_validation_error() {
        let svc = ProjectionService::new();
        let plan = ContributionPlan::new("Fund", 100.0, 0.1, 400_000_000, make_date(2025, 1, 1));
        assert!(matches!(svc.validate_plan(&plan), Err(CoreError::ValidationError(_))));
        assert!(matches!(svc.project_plan(&plan), Err(CoreError::ValidationError(_))));
        assert!(matches!(svc.plan_progress(&plan), Err(CoreError::ValidationError(_))));
        assert_eq!(svc.plan_time_progress(&plan, make_date(2030, 1, 1)), 0.0);
    }

    proptest! {
        #[test]
        fn matches_closed_form(p in 1.0f64..100_000.0, annual in 0.001f64..0.5, years in 1u32..40) {
            let svc = ProjectionService::new();
            let proj = svc.future_value(p, annual, years).unwrap();
            let r = annual / 12.0;
            let n = (years * 12) as f64;
            let expected = p * ((1.0 + r).powf(n) - 1.0) / r;
            prop_assert!((proj.future_value - expected).abs() <= expected * 1e-12);
        }

        #[test]
        fn positive_rate_beats_principal(p in 1.0f64..100_000.0, annual in 0.001f64..0.5, years in 1u32..40) {
            let svc = ProjectionService::new();
            let proj = svc.future_value(p, annual, years).unwrap();
            prop_assert!(proj.future_value > proj.total_contributed);
            prop_assert!(proj.interest_earned > 0.0);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// LiquidityService
// ═══════════════════════════════════════════════════════════════════

mod liquidity {
    use super::*;

    #[test]
    fn allowance_is_ten_percent() {
        let svc = LiquidityService::new();
        assert_relative_eq!(svc.liquidity_allowance(250_000.0), 25_000.0);
        assert_eq!(svc.liquidity_allowance(0.0), 0.0);
    }

    #[test]
    fn allowance_follows_settings() {
        let settings = Settings {
            liquidity_ratio: 0.25,
            ..Settings::default()
        };
        let svc = LiquidityService::from_settings(&settings);
        assert_relative_eq!(svc.liquidity_allowance(1000.0), 250.0);
    }

    #[test]
    fn quote_applies_four_percent_fee() {
        let svc = LiquidityService::new();
        let q = svc.quote_withdrawal(1000.0, 5000.0).unwrap();
        assert_relative_eq!(q.fee, 40.0);
        assert_relative_eq!(q.net, 960.0);
        assert_eq!(q.amount, 1000.0);
    }

    #[test]
    fn exact_balance_is_allowed() {
        let svc = LiquidityService::new();
        assert!(svc.quote_withdrawal(5000.0, 5000.0).is_ok());
    }

    #[test]
    fn over_balance_is_rejected() {
        let svc = LiquidityService::new();
        let err = svc.quote_withdrawal(5000.01, 5000.0).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientBalance { .. }));
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let svc = LiquidityService::new();
        assert!(matches!(
            svc.quote_withdrawal(0.0, 100.0),
            Err(CoreError::ValidationError(_))
        ));
        assert!(svc.quote_withdrawal(-10.0, 100.0).is_err());
        assert!(svc.quote_withdrawal(f64::NAN, 100.0).is_err());
    }

    #[test]
    fn non_finite_balance_is_rejected() {
        let svc = LiquidityService::new();
        assert!(matches!(
            svc.quote_withdrawal(100.0, f64::NAN),
            Err(CoreError::ValidationError(_))
        ));
        assert!(svc.quote_withdrawal(100.0, f64::INFINITY).is_err());

        let mut account = LiquidityAccount::new(f64::NAN);
        assert!(svc.withdraw(&mut account, 100.0).is_err());
        assert!(account.balance.is_nan());
    }

    #[test]
    fn withdraw_debits_account() {
        let svc = LiquidityService::new();
        let mut account = LiquidityAccount::new(2000.0);
        let q = svc.withdraw(&mut account, 500.0).unwrap();
        assert_eq!(account.balance, 1500.0);
        assert_relative_eq!(q.net, 480.0);
    }

    #[test]
    fn failed_withdraw_leaves_balance() {
        let svc = LiquidityService::new();
        let mut account = LiquidityAccount::new(100.0);
        assert!(svc.withdraw(&mut account, 100.5).is_err());
        assert_eq!(account.balance, 100.0);
        assert!(svc.withdraw(&mut account, 0.0).is_err());
        assert_eq!(account.balance, 100.0);
    }

    proptest! {
        #[test]
        fn net_is_ninety_six_percent(balance in 1.0f64..1e9, frac in 0.0001f64..=1.0) {
            let svc = LiquidityService::new();
            let amount = balance * frac;
            let q = svc.quote_withdrawal(amount, balance).unwrap();
            prop_assert!((q.net - amount * 0.96).abs() <= amount * 1e-12);
        }

        #[test]
        fn overdraw_never_mutates(balance in 0.0f64..1e9, extra in 0.01f64..1e6) {
            let svc = LiquidityService::new();
            let mut account = LiquidityAccount::new(balance);
            prop_assert!(svc.withdraw(&mut account, balance + extra).is_err());
            prop_assert_eq!(account.balance, balance);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PerformanceService
// ═══════════════════════════════════════════════════════════════════

mod performance {
    use super::*;

    #[test]
    fn totals_and_percent() {
        let svc = PerformanceService::new();
        let holdings = vec![
            Holding::new("AAA", 10.0, 100.0, 120.0),
            Holding::new("BBB", 5.0, 200.0, 180.0),
        ];
        let s = svc.summarize(&holdings);
        assert_relative_eq!(s.current_total, 2100.0);
        assert_relative_eq!(s.cost_total, 2000.0);
        assert_relative_eq!(s.gain_loss, 100.0);
        assert_relative_eq!(s.gain_loss_percent, 5.0);
    }

    #[test]
    fn breakdown_sorted_by_allocation() {
        let svc = PerformanceService::new();
        let holdings = vec![
            Holding::new("SMALL", 1.0, 10.0, 10.0),
            Holding::new("BIG", 9.0, 10.0, 10.0),
        ];
        let s = svc.summarize(&holdings);
        assert_eq!(s.holdings[0].symbol, "BIG");
        assert_relative_eq!(s.holdings[0].allocation_pct, 90.0);
        assert_relative_eq!(s.holdings[1].allocation_pct, 10.0);
        let total: f64 = s.holdings.iter().map(|h| h.allocation_pct).sum();
        assert_relative_eq!(total, 100.0);
    }

    #[test]
    fn per_holding_return() {
        let svc = PerformanceService::new();
        let s = svc.summarize(&[Holding::new("LOSS", 4.0, 50.0, 40.0)]);
        assert_relative_eq!(s.holdings[0].gain_loss, -40.0);
        assert_relative_eq!(s.holdings[0].return_pct, -20.0);
    }

    #[test]
    fn zero_cost_reports_zero_percent() {
        let svc = PerformanceService::new();
        let s = svc.summarize(&[Holding::new("GIFT", 10.0, 0.0, 5.0)]);
        assert_eq!(s.cost_total, 0.0);
        assert_eq!(s.gain_loss, 50.0);
        assert_eq!(s.gain_loss_percent, 0.0);
        assert_eq!(s.holdings[0].return_pct, 0.0);
    }

    #[test]
    fn empty_holdings() {
        let svc = PerformanceService::default();
        let s = svc.summarize(&[]);
        assert_eq!(s.current_total, 0.0);
        assert_eq!(s.gain_loss_percent, 0.0);
        assert!(s.holdings.is_empty());
    }

    #[test]
    fn zero_value_allocations() {
        let svc = PerformanceService::new();
        let s = svc.summarize(&[Holding::new("DEAD", 10.0, 5.0, 0.0)]);
        assert_eq!(s.holdings[0].allocation_pct, 0.0);
        assert_eq!(svc.allocations(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn allocations_of_values() {
        let svc = PerformanceService::new();
        let a = svc.allocations(&[25.0, 75.0]);
        assert_relative_eq!(a[0], 25.0);
        assert_relative_eq!(a[1], 75.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// ContractService
// ═══════════════════════════════════════════════════════════════════

mod contract {
    use super::*;

    #[test]
    fn halfway_through_one_year() {
        let svc = ContractService::new();
        let p = svc
            .progress(make_date(2025, 1, 1), 1, make_date(2025, 7, 2))
            .unwrap();
        assert_eq!(p.expiry_date, make_date(2026, 1, 1));
        assert_eq!(p.total_days, 365);
        assert_eq!(p.elapsed_days, 182);
        assert_relative_eq!(p.progress_percent, 182.0 / 365.0 * 100.0);
        assert!(!p.expiring_soon);
        assert!(!p.is_expired());
    }

    #[test]
    fn before_start_clamps_to_zero() {
        let svc = ContractService::new();
        let p = svc
            .progress(make_date(2025, 6, 1), 2, make_date(2025, 1, 1))
            .unwrap();
        assert_eq!(p.progress_percent, 0.0);
        assert!(p.elapsed_days < 0);
    }

    #[test]
    fn after_expiry_clamps_to_hundred() {
        let svc = ContractService::new();
        let p = svc
            .progress(make_date(2020, 1, 1), 1, make_date(2025, 1, 1))
            .unwrap();
        assert_eq!(p.progress_percent, 100.0);
        assert!(p.is_expired());
        assert!(!p.expiring_soon);
    }

    #[test]
    fn expiring_soon_window() {
        let svc = ContractService::new();
        let start = make_date(2025, 1, 1);
        // 30 days before expiry: flagged
        let p = svc.progress(start, 1, make_date(2025, 12, 2)).unwrap();
        assert_eq!(p.days_until_expiry, 30);
        assert!(p.expiring_soon);
        // 31 days before: not yet
        let p = svc.progress(start, 1, make_date(2025, 12, 1)).unwrap();
        assert_eq!(p.days_until_expiry, 31);
        assert!(!p.expiring_soon);
        // Expiry day itself: expired, not "soon"
        let p = svc.progress(start, 1, make_date(2026, 1, 1)).unwrap();
        assert_eq!(p.days_until_expiry, 0);
        assert!(!p.expiring_soon);
    }

    #[test]
    fn custom_window() {
        let svc = ContractService::with_expiring_soon_days(60);
        let p = svc
            .progress(make_date(2025, 1, 1), 1, make_date(2025, 11, 15))
            .unwrap();
        assert!(p.expiring_soon);
    }

    #[test]
    fn zero_term_is_complete() {
        let svc = ContractService::new();
        let start = make_date(2025, 1, 1);
        let p = svc.progress(start, 0, start).unwrap();
        assert_eq!(p.total_days, 0);
        assert_eq!(p.progress_percent, 100.0);
        let p = svc.progress(start, 0, make_date(2024, 12, 31)).unwrap();
        assert_eq!(p.progress_percent, 0.0);
    }

    #[test]
    fn absurd_term_rejected() {
        let svc = ContractService::new();
        assert!(svc
            .progress(make_date(2025, 1, 1), u32::MAX, make_date(2025, 1, 1))
            .is_err());
    }
}
