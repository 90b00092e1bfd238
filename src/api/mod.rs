use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::config::{
    DEFAULT_CONTRIBUTION_TO_AGE, DEFAULT_CONTRIBUTION_USD, DEFAULT_LOAN_PRINCIPAL,
    DEFAULT_LOAN_RATE_PCT, DEFAULT_LOAN_TERM_YEARS, DEFAULT_NEW_RATE_PCT, DEFAULT_PREPAYMENT_YEAR,
    DEFAULT_RATE_UPDATE_YEAR, HORIZON_AGE,
};
use crate::core::{
    AmortizationPoint, ChartDataPoint, Contribution, Currency, FIXED_RATE_HISTORY,
    FixedRateWindow, MilestoneRow, MilestoneValue, PRIME_RATE_HISTORY, PrimeRateWindow, Scenario,
    compute_amortization, compute_prepayment_penalty, compute_variable_rate_impact,
    project_savings, suggest_market_rate,
};

const MAX_HORIZON_AGE: u32 = 150;
const MAX_SCENARIOS: usize = 16;
const MAX_TERM_YEARS: u32 = 100;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} must be a finite number >= 0")]
    NegativeOrNonFinite { field: &'static str },
    #[error("termYears must be between 1 and {max}", max = MAX_TERM_YEARS)]
    InvalidTerm,
    #[error("horizonAge must be <= {max}", max = MAX_HORIZON_AGE)]
    HorizonTooLarge,
    #[error("at most {max} scenarios are supported", max = MAX_SCENARIOS)]
    TooManyScenarios,
    #[error("scenario id {0} is used more than once")]
    DuplicateScenarioId(String),
    #[error("{field} must be between 0 and termYears ({term_years})")]
    YearOutOfRange {
        field: &'static str,
        term_years: u32,
    },
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InputError::NegativeOrNonFinite { field })
    }
}

fn loan_year(field: &'static str, value: f64, term_years: u32) -> Result<f64, InputError> {
    if value.is_finite() && (0.0..=f64::from(term_years)).contains(&value) {
        Ok(value)
    } else {
        Err(InputError::YearOutOfRange { field, term_years })
    }
}

fn display_amount(currency: Currency, amount_usd: f64) -> f64 {
    currency.to_display(amount_usd).round()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContributionPayload {
    pub from_age: Option<u32>,
    pub to_age: Option<u32>,
    pub amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScenarioPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub initial_amount: Option<f64>,
    pub start_age: Option<u32>,
    pub interest_rate: Option<f64>,
    pub contributions: Option<Vec<ContributionPayload>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SavingsPayload {
    pub scenarios: Option<Vec<ScenarioPayload>>,
    pub horizon_age: Option<u32>,
    pub currency: Option<Currency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MortgagePayload {
    pub principal: Option<f64>,
    pub annual_rate_pct: Option<f64>,
    pub term_years: Option<u32>,
    pub currency: Option<Currency>,
    pub prepayment_year: Option<f64>,
    pub market_rate_pct: Option<f64>,
    pub update_year: Option<f64>,
    pub new_rate_pct: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SuggestedRateQuery {
    prepayment_year: Option<f64>,
    term_years: Option<u32>,
}

#[derive(Debug)]
struct SavingsRequest {
    scenarios: Vec<Scenario>,
    horizon_age: u32,
    currency: Currency,
}

#[derive(Debug)]
struct MortgageRequest {
    principal_usd: f64,
    annual_rate_pct: f64,
    term_years: u32,
    currency: Currency,
    prepayment_year: f64,
    market_rate_pct: Option<f64>,
    update_year: f64,
    new_rate_pct: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsResponse {
    currency: Currency,
    currency_symbol: &'static str,
    horizon_age: u32,
    chart_series: Vec<ChartDataPoint>,
    milestones: Vec<MilestoneRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrepaymentResponse {
    prepayment_year: f64,
    market_rate_pct: f64,
    suggested_market_rate_pct: f64,
    penalty: f64,
    remaining_balance: f64,
    undiscounted_savings: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VariableRateResponse {
    update_year: f64,
    new_rate_pct: f64,
    balance: f64,
    new_monthly_payment: f64,
    new_total: f64,
    old_total: f64,
    diff: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageResponse {
    currency: Currency,
    currency_symbol: &'static str,
    principal: f64,
    annual_rate_pct: f64,
    term_years: u32,
    monthly_payment: f64,
    total_payment: f64,
    total_interest: f64,
    schedule: Vec<AmortizationPoint>,
    prepayment: PrepaymentResponse,
    variable_rate: VariableRateResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestedRateResponse {
    prepayment_year: f64,
    term_years: u32,
    suggested_rate_pct: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RateHistoryResponse {
    fixed: &'static [FixedRateWindow],
    prime: &'static [PrimeRateWindow],
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn contribution_from_payload(
    payload: ContributionPayload,
    start_age: u32,
    currency: Currency,
) -> Result<Contribution, InputError> {
    let amount = match payload.amount {
        Some(v) => currency.from_display(non_negative("contributions.amount", v)?),
        None => DEFAULT_CONTRIBUTION_USD,
    };
    Ok(Contribution {
        from_age: payload.from_age.unwrap_or(start_age),
        to_age: payload.to_age.unwrap_or(DEFAULT_CONTRIBUTION_TO_AGE),
        amount_usd: amount,
    })
}

fn scenario_from_payload(
    payload: ScenarioPayload,
    position: usize,
    currency: Currency,
) -> Result<Scenario, InputError> {
    let mut scenario = Scenario::with_defaults(
        payload
            .id
            .unwrap_or_else(|| format!("scenario-{}", position + 1)),
        payload
            .name
            .unwrap_or_else(|| format!("Scenario {}", position + 1)),
    );

    if let Some(v) = payload.initial_amount {
        scenario.initial_amount_usd = currency.from_display(non_negative("initialAmount", v)?);
    }
    if let Some(v) = payload.start_age {
        scenario.start_age = v;
    }
    if let Some(v) = payload.interest_rate {
        scenario.annual_interest_rate_pct = non_negative("interestRate", v)?;
    }
    if let Some(contributions) = payload.contributions {
        scenario.contributions = contributions
            .into_iter()
            .map(|c| contribution_from_payload(c, scenario.start_age, currency))
            .collect::<Result<_, _>>()?;
    }

    Ok(scenario)
}

fn savings_request_from_payload(payload: SavingsPayload) -> Result<SavingsRequest, InputError> {
    let currency = payload.currency.unwrap_or_default();
    let horizon_age = payload.horizon_age.unwrap_or(HORIZON_AGE);
    if horizon_age > MAX_HORIZON_AGE {
        return Err(InputError::HorizonTooLarge);
    }

    let scenarios = match payload.scenarios {
        Some(list) => {
            if list.len() > MAX_SCENARIOS {
                return Err(InputError::TooManyScenarios);
            }
            let scenarios = list
                .into_iter()
                .enumerate()
                .map(|(idx, s)| scenario_from_payload(s, idx, currency))
                .collect::<Result<Vec<_>, _>>()?;
            for (idx, scenario) in scenarios.iter().enumerate() {
                if scenarios[..idx].iter().any(|s| s.id == scenario.id) {
                    return Err(InputError::DuplicateScenarioId(scenario.id.clone()));
                }
            }
            scenarios
        }
        None => vec![Scenario::with_defaults("scenario-1", "Scenario 1")],
    };

    Ok(SavingsRequest {
        scenarios,
        horizon_age,
        currency,
    })
}

fn mortgage_request_from_payload(
    payload: MortgagePayload,
) -> Result<MortgageRequest, InputError> {
    let currency = payload.currency.unwrap_or_default();
    let term_years = payload.term_years.unwrap_or(DEFAULT_LOAN_TERM_YEARS);
    if term_years == 0 || term_years > MAX_TERM_YEARS {
        return Err(InputError::InvalidTerm);
    }

    let principal_usd = match payload.principal {
        Some(v) => currency.from_display(non_negative("principal", v)?),
        None => DEFAULT_LOAN_PRINCIPAL,
    };
    let annual_rate_pct = non_negative(
        "annualRatePct",
        payload.annual_rate_pct.unwrap_or(DEFAULT_LOAN_RATE_PCT),
    )?;
    let prepayment_year = loan_year(
        "prepaymentYear",
        payload.prepayment_year.unwrap_or(DEFAULT_PREPAYMENT_YEAR),
        term_years,
    )?;
    let market_rate_pct = payload
        .market_rate_pct
        .map(|v| non_negative("marketRatePct", v))
        .transpose()?;
    let update_year = loan_year(
        "updateYear",
        payload.update_year.unwrap_or(DEFAULT_RATE_UPDATE_YEAR),
        term_years,
    )?;
    let new_rate_pct = non_negative(
        "newRatePct",
        payload.new_rate_pct.unwrap_or(DEFAULT_NEW_RATE_PCT),
    )?;

    Ok(MortgageRequest {
        principal_usd,
        annual_rate_pct,
        term_years,
        currency,
        prepayment_year,
        market_rate_pct,
        update_year,
        new_rate_pct,
    })
}

fn build_savings_response(request: SavingsRequest) -> SavingsResponse {
    let currency = request.currency;
    let projection = project_savings(&request.scenarios, request.horizon_age);

    let chart_series = projection
        .chart_series
        .into_iter()
        .map(|point| ChartDataPoint {
            age: point.age,
            values: point
                .values
                .into_iter()
                .map(|(id, v)| (id, v.map(|v| display_amount(currency, v))))
                .collect(),
        })
        .collect();

    let milestones = projection
        .milestones
        .into_iter()
        .map(|row| MilestoneRow {
            age: row.age,
            values: row
                .values
                .into_iter()
                .map(|(id, v)| {
                    let value = MilestoneValue {
                        total: v.total.map(|t| display_amount(currency, t)),
                        allowance: v.allowance.map(|a| display_amount(currency, a)),
                    };
                    (id, value)
                })
                .collect(),
        })
        .collect();

    SavingsResponse {
        currency,
        currency_symbol: currency.symbol(),
        horizon_age: request.horizon_age,
        chart_series,
        milestones,
    }
}

fn build_mortgage_response(request: MortgageRequest) -> MortgageResponse {
    let currency = request.currency;
    let loan = compute_amortization(
        request.principal_usd,
        request.annual_rate_pct,
        request.term_years,
    );

    let suggested_market_rate_pct =
        suggest_market_rate(request.prepayment_year, request.term_years);
    let market_rate_pct = request.market_rate_pct.unwrap_or(suggested_market_rate_pct);
    let prepayment = compute_prepayment_penalty(
        &loan.schedule,
        loan.monthly_payment,
        request.term_years,
        request.prepayment_year,
        market_rate_pct,
    );
    let variable = compute_variable_rate_impact(
        &loan.schedule,
        loan.monthly_payment,
        request.term_years,
        request.update_year,
        request.new_rate_pct,
    );

    let schedule = loan
        .schedule
        .iter()
        .map(|p| AmortizationPoint {
            year: p.year,
            balance: display_amount(currency, p.balance),
            interest_paid_this_year: display_amount(currency, p.interest_paid_this_year),
            principal_paid_this_year: display_amount(currency, p.principal_paid_this_year),
            cumulative_interest: display_amount(currency, p.cumulative_interest),
        })
        .collect();

    MortgageResponse {
        currency,
        currency_symbol: currency.symbol(),
        principal: currency.to_display(request.principal_usd),
        annual_rate_pct: request.annual_rate_pct,
        term_years: request.term_years,
        monthly_payment: currency.to_display(loan.monthly_payment),
        total_payment: currency.to_display(loan.total_payment),
        total_interest: currency.to_display(loan.total_interest),
        schedule,
        prepayment: PrepaymentResponse {
            prepayment_year: request.prepayment_year,
            market_rate_pct,
            suggested_market_rate_pct,
            penalty: currency.to_display(prepayment.penalty),
            remaining_balance: currency.to_display(prepayment.remaining_balance),
            undiscounted_savings: currency.to_display(prepayment.undiscounted_savings),
        },
        variable_rate: VariableRateResponse {
            update_year: request.update_year,
            new_rate_pct: request.new_rate_pct,
            balance: currency.to_display(variable.balance),
            new_monthly_payment: currency.to_display(variable.new_monthly_payment),
            new_total: currency.to_display(variable.new_total),
            old_total: currency.to_display(variable.old_total),
            diff: currency.to_display(variable.diff),
        },
    }
}

pub fn savings_response_from_payload(
    payload: SavingsPayload,
) -> Result<SavingsResponse, InputError> {
    savings_request_from_payload(payload).map(build_savings_response)
}

pub fn mortgage_response_from_payload(
    payload: MortgagePayload,
) -> Result<MortgageResponse, InputError> {
    mortgage_request_from_payload(payload).map(build_mortgage_response)
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/savings", post(savings_post_handler))
        .route(
            "/api/mortgage",
            get(mortgage_get_handler).post(mortgage_post_handler),
        )
        .route("/api/rates/suggested", get(suggested_rate_handler))
        .route("/api/rates/history", get(rate_history_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("nestegg HTTP API listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{}/", addr.port());

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn savings_post_handler(Json(payload): Json<SavingsPayload>) -> Response {
    log::debug!("savings request: {payload:?}");
    match savings_response_from_payload(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => rejected(err),
    }
}

async fn mortgage_get_handler(Query(payload): Query<MortgagePayload>) -> Response {
    mortgage_handler_impl(payload).await
}

async fn mortgage_post_handler(Json(payload): Json<MortgagePayload>) -> Response {
    mortgage_handler_impl(payload).await
}

async fn mortgage_handler_impl(payload: MortgagePayload) -> Response {
    log::debug!("mortgage request: {payload:?}");
    match mortgage_response_from_payload(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => rejected(err),
    }
}

async fn suggested_rate_handler(Query(query): Query<SuggestedRateQuery>) -> Response {
    let prepayment_year = query.prepayment_year.unwrap_or(DEFAULT_PREPAYMENT_YEAR);
    let term_years = query.term_years.unwrap_or(DEFAULT_LOAN_TERM_YEARS);
    if !prepayment_year.is_finite() {
        return rejected(InputError::NegativeOrNonFinite {
            field: "prepaymentYear",
        });
    }
    json_response(
        StatusCode::OK,
        SuggestedRateResponse {
            prepayment_year,
            term_years,
            suggested_rate_pct: suggest_market_rate(prepayment_year, term_years),
        },
    )
}

async fn rate_history_handler() -> Response {
    json_response(
        StatusCode::OK,
        RateHistoryResponse {
            fixed: &FIXED_RATE_HISTORY,
            prime: &PRIME_RATE_HISTORY,
        },
    )
}

fn rejected(err: InputError) -> Response {
    log::warn!("rejected request: {err}");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
