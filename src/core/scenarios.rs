use thiserror::Error;

use super::config::{DEFAULT_CONTRIBUTION_SPAN_YEARS, DEFAULT_CONTRIBUTION_USD};
use super::types::{Contribution, Scenario};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("unknown scenario id: {0}")]
    UnknownScenario(String),
    #[error("at least one scenario must remain")]
    LastScenario,
    #[error("scenario {scenario} has no contribution at index {index}")]
    UnknownContribution { scenario: String, index: usize },
    #[error("scenario {0} must keep at least one contribution")]
    LastContribution(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioUpdate {
    InitialAmount(f64),
    StartAge(u32),
    InterestRate(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContributionUpdate {
    FromAge(u32),
    ToAge(u32),
    Amount(f64),
}

/// Editable list of savings scenarios. Always holds at least one scenario,
/// and every scenario keeps at least one contribution period.
#[derive(Debug, Clone)]
pub struct ScenarioBook {
    scenarios: Vec<Scenario>,
    next_id: u64,
}

impl Default for ScenarioBook {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBook {
    pub fn new() -> Self {
        let mut book = Self {
            scenarios: Vec::new(),
            next_id: 1,
        };
        book.add_scenario();
        book
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Scenario, ScenarioError> {
        self.scenarios
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ScenarioError::UnknownScenario(id.to_string()))
    }

    pub fn add_scenario(&mut self) -> String {
        let id = format!("scenario-{}", self.next_id);
        self.next_id += 1;
        let name = format!("Scenario {}", self.scenarios.len() + 1);
        self.scenarios.push(Scenario::with_defaults(id.clone(), name));
        id
    }

    pub fn remove_scenario(&mut self, id: &str) -> Result<Scenario, ScenarioError> {
        let index = self
            .scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ScenarioError::UnknownScenario(id.to_string()))?;
        if self.scenarios.len() <= 1 {
            return Err(ScenarioError::LastScenario);
        }
        Ok(self.scenarios.remove(index))
    }

    pub fn rename_scenario(
        &mut self,
        id: &str,
        name: impl Into<String>,
    ) -> Result<(), ScenarioError> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn update_scenario(
        &mut self,
        id: &str,
        update: ScenarioUpdate,
    ) -> Result<(), ScenarioError> {
        let scenario = self.get_mut(id)?;
        match update {
            ScenarioUpdate::InitialAmount(amount) => scenario.initial_amount_usd = amount,
            ScenarioUpdate::StartAge(age) => scenario.start_age = age,
            ScenarioUpdate::InterestRate(rate) => scenario.annual_interest_rate_pct = rate,
        }
        Ok(())
    }

    pub fn add_contribution(&mut self, id: &str) -> Result<usize, ScenarioError> {
        let scenario = self.get_mut(id)?;
        let from_age = scenario
            .contributions
            .last()
            .map_or(scenario.start_age, |c| c.to_age);
        scenario.contributions.push(Contribution {
            from_age,
            to_age: from_age.saturating_add(DEFAULT_CONTRIBUTION_SPAN_YEARS),
            amount_usd: DEFAULT_CONTRIBUTION_USD,
        });
        Ok(scenario.contributions.len() - 1)
    }

    pub fn update_contribution(
        &mut self,
        id: &str,
        index: usize,
        update: ContributionUpdate,
    ) -> Result<(), ScenarioError> {
        let scenario = self.get_mut(id)?;
        let contribution = scenario.contributions.get_mut(index).ok_or_else(|| {
            ScenarioError::UnknownContribution {
                scenario: id.to_string(),
                index,
            }
        })?;
        match update {
            ContributionUpdate::FromAge(age) => contribution.from_age = age,
            ContributionUpdate::ToAge(age) => contribution.to_age = age,
            ContributionUpdate::Amount(amount) => contribution.amount_usd = amount,
        }
        Ok(())
    }

    pub fn remove_contribution(
        &mut self,
        id: &str,
        index: usize,
    ) -> Result<Contribution, ScenarioError> {
        let scenario = self.get_mut(id)?;
        if index >= scenario.contributions.len() {
            return Err(ScenarioError::UnknownContribution {
                scenario: id.to_string(),
                index,
            });
        }
        if scenario.contributions.len() <= 1 {
            return Err(ScenarioError::LastContribution(id.to_string()));
        }
        Ok(scenario.contributions.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::HORIZON_AGE;
    use crate::core::project_savings;

    #[test]
    fn new_book_has_one_default_scenario() {
        let book = ScenarioBook::new();
        let scenarios = book.scenarios();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "Scenario 1");
        assert_eq!(scenarios[0].start_age, 20);
        assert_eq!(scenarios[0].contributions.len(), 1);
        assert_eq!(scenarios[0].contributions[0].to_age, 65);
    }

    #[test]
    fn last_scenario_cannot_be_removed() {
        let mut book = ScenarioBook::new();
        let id = book.scenarios()[0].id.clone();
        assert_eq!(book.remove_scenario(&id), Err(ScenarioError::LastScenario));
        assert_eq!(
            book.remove_scenario("missing"),
            Err(ScenarioError::UnknownScenario("missing".to_string()))
        );
    }

    #[test]
    fn ids_stay_unique_after_removal() {
        let mut book = ScenarioBook::new();
        let second = book.add_scenario();
        book.remove_scenario(&second).expect("two scenarios present");
        let third = book.add_scenario();
        assert_ne!(second, third);
        assert_eq!(book.scenarios()[1].name, "Scenario 2");
    }

    #[test]
    fn typed_updates_change_only_their_field() {
        let mut book = ScenarioBook::new();
        let id = book.scenarios()[0].id.clone();
        book.update_scenario(&id, ScenarioUpdate::InterestRate(7.5))
            .expect("known scenario");
        book.update_scenario(&id, ScenarioUpdate::StartAge(25))
            .expect("known scenario");
        book.update_scenario(&id, ScenarioUpdate::InitialAmount(5000.0))
            .expect("known scenario");
        book.rename_scenario(&id, "Aggressive").expect("known scenario");

        let scenario = book.get(&id).expect("scenario present");
        assert_eq!(scenario.annual_interest_rate_pct, 7.5);
        assert_eq!(scenario.start_age, 25);
        assert_eq!(scenario.initial_amount_usd, 5000.0);
        assert_eq!(scenario.name, "Aggressive");
        assert_eq!(scenario.contributions[0].from_age, 20);
    }

    #[test]
    fn new_contribution_continues_from_last_period() {
        let mut book = ScenarioBook::new();
        let id = book.scenarios()[0].id.clone();
        let index = book.add_contribution(&id).expect("known scenario");
        assert_eq!(index, 1);
        let added = &book.get(&id).expect("scenario present").contributions[1];
        assert_eq!((added.from_age, added.to_age, added.amount_usd), (65, 75, 500.0));
    }

    #[test]
    fn new_contribution_after_maximal_age_saturates() {
        let mut book = ScenarioBook::new();
        let id = book.scenarios()[0].id.clone();
        book.update_contribution(&id, 0, ContributionUpdate::ToAge(u32::MAX - 3))
            .expect("index 0 exists");
        let index = book.add_contribution(&id).expect("known scenario");
        let added = &book.get(&id).expect("scenario present").contributions[index];
        assert_eq!((added.from_age, added.to_age), (u32::MAX - 3, u32::MAX));
    }

    #[test]
    fn contribution_edits_and_removal_keep_one_period() {
        let mut book = ScenarioBook::new();
        let id = book.scenarios()[0].id.clone();
        book.add_contribution(&id).expect("known scenario");
        book.update_contribution(&id, 1, ContributionUpdate::Amount(250.0))
            .expect("index 1 exists");
        book.update_contribution(&id, 1, ContributionUpdate::FromAge(30))
            .expect("index 1 exists");
        book.update_contribution(&id, 1, ContributionUpdate::ToAge(40))
            .expect("index 1 exists");
        assert_eq!(
            book.update_contribution(&id, 5, ContributionUpdate::Amount(1.0)),
            Err(ScenarioError::UnknownContribution {
                scenario: id.clone(),
                index: 5
            })
        );

        let removed = book.remove_contribution(&id, 0).expect("two periods present");
        assert_eq!(removed.to_age, 65);
        let remaining = &book.get(&id).expect("scenario present").contributions;
        assert_eq!(remaining.len(), 1);
        assert_eq!((remaining[0].from_age, remaining[0].to_age), (30, 40));
        assert_eq!(
            book.remove_contribution(&id, 0),
            Err(ScenarioError::LastContribution(id.clone()))
        );
    }

    #[test]
    fn book_feeds_projection() {
        let mut book = ScenarioBook::new();
        let second = book.add_scenario();
        book.update_scenario(&second, ScenarioUpdate::InterestRate(0.0))
            .expect("known scenario");
        let projection = project_savings(book.scenarios(), HORIZON_AGE);
        let at_thirty = projection
            .chart_series
            .iter()
            .find(|p| p.age == 30)
            .expect("row at 30");
        let compounded = at_thirty.value("scenario-1").expect("started");
        let flat = at_thirty.value(&second).expect("started");
        assert_eq!(flat, 1000.0 + 500.0 * 120.0);
        assert!(compounded > flat);
    }
}
