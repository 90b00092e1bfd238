use super::config::{MIN_COMPOUNDING_MONTHLY_RATE, MONTHS_PER_YEAR};
use super::types::{Amortization, AmortizationPoint, LoanParams};

/// Level payment that repays `principal` over `months` at `annual_rate_pct`.
/// Rates too small to compound fall back to straight division.
pub fn monthly_payment(principal: f64, annual_rate_pct: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let rate = annual_rate_pct / 100.0 / 12.0;
    if rate < MIN_COMPOUNDING_MONTHLY_RATE {
        return principal / f64::from(months);
    }
    let growth = (1.0 + rate).powi(i32::try_from(months).unwrap_or(i32::MAX));
    if !growth.is_finite() {
        return principal * rate;
    }
    principal * rate * growth / (growth - 1.0)
}

pub(crate) fn term_months(term_years: u32) -> u32 {
    term_years.saturating_mul(MONTHS_PER_YEAR)
}

pub fn compute_amortization(
    principal: f64,
    annual_rate_pct: f64,
    term_years: u32,
) -> Amortization {
    let params = LoanParams {
        principal,
        annual_rate_pct,
        term_years,
    };
    let months = term_months(term_years);
    let payment = monthly_payment(principal, annual_rate_pct, months);
    let total_payment = payment * f64::from(months);

    log::trace!(
        "amortizing {} over {} years at {}%: payment {payment:.2}",
        params.principal,
        params.term_years,
        params.annual_rate_pct
    );

    Amortization {
        monthly_payment: payment,
        total_payment,
        total_interest: total_payment - principal,
        schedule: yearly_schedule(params, payment),
    }
}

fn yearly_schedule(params: LoanParams, payment: f64) -> Vec<AmortizationPoint> {
    let rate = params.annual_rate_pct / 100.0 / 12.0;
    let mut schedule = Vec::with_capacity(params.term_years as usize + 1);
    schedule.push(AmortizationPoint {
        year: 0,
        balance: params.principal,
        interest_paid_this_year: 0.0,
        principal_paid_this_year: 0.0,
        cumulative_interest: 0.0,
    });

    let mut balance = params.principal;
    let mut cumulative_interest = 0.0;

    for year in 1..=params.term_years {
        let mut interest_this_year = 0.0;
        let mut principal_this_year = 0.0;

        for _ in 0..MONTHS_PER_YEAR {
            if balance <= 0.0 {
                break;
            }
            let interest = balance * rate;
            let principal = payment - interest;
            balance -= principal;
            interest_this_year += interest;
            principal_this_year += principal;
        }

        cumulative_interest += interest_this_year;
        schedule.push(AmortizationPoint {
            year,
            balance: balance.max(0.0).round(),
            interest_paid_this_year: interest_this_year.round(),
            principal_paid_this_year: principal_this_year.round(),
            cumulative_interest: cumulative_interest.round(),
        });
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn reference_thirty_year_mortgage() {
        let loan = compute_amortization(1_000_000.0, 4.5, 30);
        assert_approx_tol(loan.monthly_payment, 5066.85, 0.01);
        assert_approx_tol(loan.total_interest, 824_067.12, 0.01);
        assert_approx_tol(loan.total_interest + 1_000_000.0, loan.total_payment, 1e-6);
    }

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let loan = compute_amortization(120_000.0, 0.0, 10);
        assert_eq!(loan.monthly_payment, 120_000.0 / 120.0);
        assert_eq!(loan.total_interest, 0.0);
        assert_eq!(loan.schedule[1].balance, 108_000.0);
        assert_eq!(loan.schedule[1].principal_paid_this_year, 12_000.0);
        assert_eq!(loan.schedule[10].balance, 0.0);
    }

    #[test]
    fn schedule_has_synthetic_year_zero() {
        let loan = compute_amortization(250_000.0, 6.0, 15);
        assert_eq!(loan.schedule.len(), 16);
        assert_eq!(
            loan.schedule[0],
            AmortizationPoint {
                year: 0,
                balance: 250_000.0,
                interest_paid_this_year: 0.0,
                principal_paid_this_year: 0.0,
                cumulative_interest: 0.0,
            }
        );
    }

    #[test]
    fn yearly_figures_are_rounded_and_consistent() {
        let loan = compute_amortization(300_000.0, 5.0, 20);
        for point in &loan.schedule {
            assert_eq!(point.balance, point.balance.round());
            assert_eq!(point.interest_paid_this_year, point.interest_paid_this_year.round());
            assert_eq!(point.cumulative_interest, point.cumulative_interest.round());
        }
        let summed: f64 = loan.schedule.iter().map(|p| p.interest_paid_this_year).sum();
        let last = loan.schedule.last().expect("final year");
        assert_approx_tol(summed, last.cumulative_interest, 20.0);
        assert_approx_tol(last.cumulative_interest, loan.total_interest, 1.0);

        let first = loan.schedule[1];
        assert_approx_tol(
            first.interest_paid_this_year + first.principal_paid_this_year,
            loan.monthly_payment * 12.0,
            1.0,
        );
        assert_approx_tol(300_000.0 - first.principal_paid_this_year, first.balance, 1.0);
    }

    #[test]
    fn rate_too_small_to_compound_pays_like_zero_rate() {
        let flat = compute_amortization(100_000.0, 0.0, 30);
        for rate_pct in [1e-15, 1e-12, 1e-10, 1e-8] {
            let loan = compute_amortization(100_000.0, rate_pct, 30);
            assert!(loan.monthly_payment.is_finite(), "rate {rate_pct}");
            assert!(loan.total_interest.is_finite(), "rate {rate_pct}");
            assert_approx_tol(loan.monthly_payment, flat.monthly_payment, 1e-3);
            assert_eq!(loan.schedule[1].balance, flat.schedule[1].balance);
            assert_eq!(loan.schedule[30].balance, 0.0);
        }
    }

    #[test]
    fn term_in_months_saturates() {
        assert_eq!(term_months(30), 360);
        assert_eq!(term_months(u32::MAX), u32::MAX);
        assert_approx_tol(monthly_payment(1_200.0, 5.0, u32::MAX), 5.0, 1e-9);
    }

    #[test]
    fn zero_term_produces_only_initial_state() {
        let loan = compute_amortization(50_000.0, 5.0, 0);
        assert_eq!(loan.monthly_payment, 0.0);
        assert_eq!(loan.schedule.len(), 1);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_loan_is_fully_repaid_at_term(
            principal in 1_000u32..5_000_000,
            rate_bp in 0u32..1_500,
            term_years in 1u32..41
        ) {
            let rate_pct = rate_bp as f64 / 100.0;
            let loan = compute_amortization(principal as f64, rate_pct, term_years);
            let last = loan.schedule.last().copied();
            prop_assert!(last.map(|p| p.year) == Some(term_years));
            prop_assert!(last.map(|p| p.balance) == Some(0.0));
            let identity_gap = loan.total_interest + principal as f64 - loan.total_payment;
            prop_assert!(identity_gap.abs() < 1e-6);
            for pair in loan.schedule.windows(2) {
                prop_assert!(pair[1].balance <= pair[0].balance);
            }
        }
    }
}
