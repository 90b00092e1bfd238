use super::amortization::{monthly_payment, term_months};
use super::config::MIN_COMPOUNDING_MONTHLY_RATE;
use super::types::{AmortizationPoint, PrepaymentPenalty, VariableRateImpact};

struct RemainingLoan {
    balance: f64,
    months: u32,
}

// Exact lookup at the rounded year; a missing or settled year is `None`.
fn remaining_loan(
    schedule: &[AmortizationPoint],
    term_years: u32,
    year: f64,
) -> Option<RemainingLoan> {
    let year = year.round();
    if !(0.0..=f64::from(term_years)).contains(&year) {
        return None;
    }
    let year = year as u32;
    let balance = schedule
        .iter()
        .find(|p| p.year == year)
        .map(|p| p.balance)
        .unwrap_or(0.0);
    if balance <= 0.0 {
        return None;
    }
    Some(RemainingLoan {
        balance,
        months: term_months(term_years - year),
    })
}

/// Present value of the remaining payments at the market rate, less the
/// outstanding balance, floored at zero.
pub fn compute_prepayment_penalty(
    schedule: &[AmortizationPoint],
    monthly_payment: f64,
    term_years: u32,
    prepayment_year: f64,
    market_rate_pct: f64,
) -> PrepaymentPenalty {
    let Some(remaining) = remaining_loan(schedule, term_years, prepayment_year) else {
        return PrepaymentPenalty::default();
    };

    let months = f64::from(remaining.months);
    let market_rate = market_rate_pct / 100.0 / 12.0;
    let present_value = if market_rate < MIN_COMPOUNDING_MONTHLY_RATE {
        monthly_payment * months
    } else {
        monthly_payment * (1.0 - (1.0 + market_rate).powf(-months)) / market_rate
    };

    let penalty = (present_value - remaining.balance).max(0.0);
    log::trace!(
        "prepayment at year {prepayment_year}: pv {present_value:.2}, balance {}, \
         penalty {penalty:.2}",
        remaining.balance
    );

    PrepaymentPenalty {
        penalty,
        remaining_balance: remaining.balance,
        undiscounted_savings: monthly_payment * months - remaining.balance,
    }
}

pub fn compute_variable_rate_impact(
    schedule: &[AmortizationPoint],
    monthly_payment_at_original_rate: f64,
    term_years: u32,
    update_year: f64,
    new_rate_pct: f64,
) -> VariableRateImpact {
    let Some(remaining) = remaining_loan(schedule, term_years, update_year) else {
        return VariableRateImpact::default();
    };

    let months = f64::from(remaining.months);
    let new_monthly_payment = monthly_payment(remaining.balance, new_rate_pct, remaining.months);
    let new_total = new_monthly_payment * months;
    let old_total = monthly_payment_at_original_rate * months;

    VariableRateImpact {
        balance: remaining.balance,
        new_monthly_payment,
        new_total,
        old_total,
        diff: new_total - old_total,
    }
}
