pub const HORIZON_AGE: u32 = 70;

pub const MILESTONE_AGES: [u32; 5] = [30, 40, 50, 60, 70];

pub const ALLOWANCE_INCOME_TAX_RATE: f64 = 0.28;

/// ILS per USD.
pub const ILS_CONVERSION_RATE: f64 = 3.7;

pub const DEFAULT_INITIAL_AMOUNT_USD: f64 = 1000.0;
pub const DEFAULT_START_AGE: u32 = 20;
pub const DEFAULT_INTEREST_RATE_PCT: f64 = 10.0;
pub const DEFAULT_CONTRIBUTION_USD: f64 = 500.0;
pub const DEFAULT_CONTRIBUTION_TO_AGE: u32 = 65;
pub const DEFAULT_CONTRIBUTION_SPAN_YEARS: u32 = 10;

pub const DEFAULT_LOAN_PRINCIPAL: f64 = 1_000_000.0;
pub const DEFAULT_LOAN_RATE_PCT: f64 = 4.5;
pub const DEFAULT_LOAN_TERM_YEARS: u32 = 30;
pub const DEFAULT_PREPAYMENT_YEAR: f64 = 5.0;
pub const DEFAULT_RATE_UPDATE_YEAR: f64 = 5.0;
pub const DEFAULT_NEW_RATE_PCT: f64 = 6.0;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Monthly rates below this are treated as zero: `1 + rate` no longer
/// differs from 1 closely enough for the annuity formulas.
pub const MIN_COMPOUNDING_MONTHLY_RATE: f64 = 1e-12;
