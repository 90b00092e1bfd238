use serde::{Deserialize, Serialize};

use super::config::ILS_CONVERSION_RATE;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[serde(alias = "usd")]
    Usd,
    #[default]
    #[serde(alias = "ils")]
    Ils,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Ils => "₪",
        }
    }

    fn rate(self) -> f64 {
        match self {
            Currency::Usd => 1.0,
            Currency::Ils => ILS_CONVERSION_RATE,
        }
    }

    pub fn to_display(self, amount_usd: f64) -> f64 {
        amount_usd * self.rate()
    }

    pub fn from_display(self, amount: f64) -> f64 {
        amount / self.rate()
    }
}
