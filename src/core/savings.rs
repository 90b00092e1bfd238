use std::collections::BTreeMap;

use super::config::{ALLOWANCE_INCOME_TAX_RATE, MILESTONE_AGES, MONTHS_PER_YEAR};
use super::types::{ChartDataPoint, MilestoneRow, MilestoneValue, SavingsProjection, Scenario};

pub fn simulate_scenario(scenario: &Scenario, horizon_age: u32) -> Vec<(u32, f64)> {
    if scenario.start_age >= horizon_age {
        return Vec::new();
    }

    let monthly_rate = scenario.monthly_rate();
    let mut balance = scenario.initial_amount_usd;
    let mut points = Vec::with_capacity((horizon_age - scenario.start_age + 1) as usize);
    points.push((scenario.start_age, balance));

    for age in scenario.start_age..horizon_age {
        let contribution = scenario.monthly_contribution_at(age);
        for _ in 0..MONTHS_PER_YEAR {
            balance = (balance + contribution) * (1.0 + monthly_rate);
        }
        points.push((age + 1, balance));
    }

    points
}

pub fn monthly_allowance(total: Option<f64>, annual_interest_rate_pct: f64) -> Option<f64> {
    let monthly_rate = annual_interest_rate_pct / 100.0 / 12.0;
    total.map(|total| total * monthly_rate * (1.0 - ALLOWANCE_INCOME_TAX_RATE))
}

pub fn project_savings(scenarios: &[Scenario], horizon_age: u32) -> SavingsProjection {
    let chart_series = merge_series(scenarios, horizon_age);
    let milestones = extract_milestones(scenarios, &chart_series);
    log::debug!(
        "projected {} scenario(s) over {} age(s)",
        scenarios.len(),
        chart_series.len()
    );
    SavingsProjection {
        chart_series,
        milestones,
    }
}

fn merge_series(scenarios: &[Scenario], horizon_age: u32) -> Vec<ChartDataPoint> {
    let Some(min_start_age) = scenarios.iter().map(|s| s.start_age).min() else {
        return Vec::new();
    };

    let simulated: Vec<BTreeMap<u32, f64>> = scenarios
        .iter()
        .map(|s| simulate_scenario(s, horizon_age).into_iter().collect())
        .collect();

    let mut last_values: Vec<Option<f64>> = vec![None; scenarios.len()];
    let mut rows = Vec::new();

    for age in min_start_age..=horizon_age {
        let mut values = BTreeMap::new();
        for (idx, scenario) in scenarios.iter().enumerate() {
            let value = if age < scenario.start_age {
                None
            } else {
                if let Some(&balance) = simulated[idx].get(&age) {
                    last_values[idx] = Some(balance);
                }
                last_values[idx]
            };
            values.insert(scenario.id.clone(), value);
        }
        rows.push(ChartDataPoint { age, values });
    }

    rows
}

fn extract_milestones(
    scenarios: &[Scenario],
    chart_series: &[ChartDataPoint],
) -> Vec<MilestoneRow> {
    MILESTONE_AGES
        .iter()
        .map(|&age| {
            let point = chart_series.iter().find(|p| p.age == age);
            let values = scenarios
                .iter()
                .map(|s| {
                    let total = point.and_then(|p| p.value(&s.id));
                    let allowance = monthly_allowance(total, s.annual_interest_rate_pct);
                    (s.id.clone(), MilestoneValue { total, allowance })
                })
                .collect();
            MilestoneRow { age, values }
        })
        .collect()
}
