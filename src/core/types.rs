use std::collections::BTreeMap;

use serde::Serialize;

use super::config::{
    DEFAULT_CONTRIBUTION_TO_AGE, DEFAULT_CONTRIBUTION_USD, DEFAULT_INITIAL_AMOUNT_USD,
    DEFAULT_INTEREST_RATE_PCT, DEFAULT_START_AGE,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub from_age: u32,
    pub to_age: u32,
    pub amount_usd: f64,
}

impl Contribution {
    pub fn covers(&self, age: u32) -> bool {
        age >= self.from_age && age < self.to_age
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub initial_amount_usd: f64,
    pub start_age: u32,
    pub annual_interest_rate_pct: f64,
    pub contributions: Vec<Contribution>,
}

impl Scenario {
    pub fn with_defaults(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            initial_amount_usd: DEFAULT_INITIAL_AMOUNT_USD,
            start_age: DEFAULT_START_AGE,
            annual_interest_rate_pct: DEFAULT_INTEREST_RATE_PCT,
            contributions: vec![Contribution {
                from_age: DEFAULT_START_AGE,
                to_age: DEFAULT_CONTRIBUTION_TO_AGE,
                amount_usd: DEFAULT_CONTRIBUTION_USD,
            }],
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_interest_rate_pct / 100.0 / 12.0
    }

    pub fn monthly_contribution_at(&self, age: u32) -> f64 {
        self.contributions
            .iter()
            .filter(|c| c.covers(age))
            .map(|c| c.amount_usd)
            .sum()
    }
}

/// One row of the merged savings chart. Serializes flat, as
/// `{ "age": 30, "scenario-1": 1234.5, "scenario-2": null }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataPoint {
    pub age: u32,
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<f64>>,
}

impl ChartDataPoint {
    pub fn value(&self, scenario_id: &str) -> Option<f64> {
        self.values.get(scenario_id).copied().flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MilestoneValue {
    pub total: Option<f64>,
    pub allowance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneRow {
    pub age: u32,
    pub values: BTreeMap<String, MilestoneValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProjection {
    pub chart_series: Vec<ChartDataPoint>,
    pub milestones: Vec<MilestoneRow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanParams {
    pub principal: f64,
    pub annual_rate_pct: f64,
    pub term_years: u32,
}

/// Loan state at the end of `year`. Money fields are rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationPoint {
    pub year: u32,
    pub balance: f64,
    pub interest_paid_this_year: f64,
    pub principal_paid_this_year: f64,
    pub cumulative_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Amortization {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub schedule: Vec<AmortizationPoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaymentPenalty {
    pub penalty: f64,
    pub remaining_balance: f64,
    pub undiscounted_savings: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRateImpact {
    pub balance: f64,
    pub new_monthly_payment: f64,
    pub new_total: f64,
    pub old_total: f64,
    pub diff: f64,
}
