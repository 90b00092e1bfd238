
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedRateWindow {
    pub label: &'static str,
    pub t10: RateRange,
    pub t20: RateRange,
    pub t30: RateRange,
}

impl FixedRateWindow {
    /// Column matching a loan term: up to 15 years reads the 10-year column,
    /// up to 25 the 20-year column, anything longer the 30-year column.
    pub fn for_term(&self, term_years: u32) -> RateRange {
        if term_years <= 15 {
            self.t10
        } else if term_years <= 25 {
            self.t20
        } else {
            self.t30
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimeRateWindow {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

const fn range(min: f64, max: f64) -> RateRange {
    RateRange { min, max }
}

pub const FIXED_RATE_HISTORY: [FixedRateWindow; 5] = [
    FixedRateWindow {
        label: "Past 1 Year",
        t10: range(4.2, 5.6),
        t20: range(4.7, 5.9),
        t30: range(4.9, 6.2),
    },
    FixedRateWindow {
        label: "Past 5 Years",
        t10: range(2.0, 5.6),
        t20: range(3.5, 5.9),
        t30: range(3.8, 6.2),
    },
    FixedRateWindow {
        label: "Past 10 Years",
        t10: range(1.8, 5.6),
        t20: range(2.8, 5.9),
        t30: range(3.2, 6.2),
    },
    FixedRateWindow {
        label: "Past 20 Years",
        t10: range(1.8, 6.5),
        t20: range(2.8, 7.2),
        t30: range(3.2, 7.8),
    },
    FixedRateWindow {
        label: "Past 30 Years",
        t10: range(1.8, 8.5),
        t20: range(2.8, 9.5),
        t30: range(3.2, 11.5),
    },
];

pub const PRIME_RATE_HISTORY: [PrimeRateWindow; 5] = [
    PrimeRateWindow {
        label: "Past 1 Year",
        min: 6.0,
        max: 6.25,
    },
    PrimeRateWindow {
        label: "Past 5 Years",
        min: 1.6,
        max: 6.25,
    },
    PrimeRateWindow {
        label: "Past 10 Years",
        min: 1.6,
        max: 6.25,
    },
    PrimeRateWindow {
        label: "Past 20 Years",
        min: 1.6,
        max: 6.5,
    },
    PrimeRateWindow {
        label: "Past 30 Years",
        min: 1.6,
        max: 12.0,
    },
];

fn lookback_window(prepayment_year: f64) -> &'static FixedRateWindow {
    let index = if prepayment_year <= 1.0 {
        0
    } else if prepayment_year <= 5.0 {
        1
    } else if prepayment_year <= 10.0 {
        2
    } else if prepayment_year <= 20.0 {
        3
    } else {
        4
    };
    &FIXED_RATE_HISTORY[index]
}

pub fn suggest_market_rate(prepayment_year: f64, term_years: u32) -> f64 {
    lookback_window(prepayment_year).for_term(term_years).min
}
