mod amortization;
pub mod config;
mod currency;
mod rates;
mod risk;
mod savings;
mod scenarios;
mod types;

pub use amortization::{compute_amortization, monthly_payment};
pub use currency::Currency;
pub use rates::{
    FIXED_RATE_HISTORY, FixedRateWindow, PRIME_RATE_HISTORY, PrimeRateWindow, RateRange,
    suggest_market_rate,
};
pub use risk::{compute_prepayment_penalty, compute_variable_rate_impact};
pub use savings::{monthly_allowance, project_savings, simulate_scenario};
pub use scenarios::{ContributionUpdate, ScenarioBook, ScenarioError, ScenarioUpdate};
pub use types::{
    Amortization, AmortizationPoint, ChartDataPoint, Contribution, LoanParams, MilestoneRow,
    MilestoneValue, PrepaymentPenalty, SavingsProjection, Scenario, VariableRateImpact,
};
